use std::collections::BinaryHeap;

use bitvec::vec::BitVec;

/// Periodic toggles ordered by their next trigger time.
#[derive(Default)]
pub struct OscillatorGroup {
    priority_queue: BinaryHeap<Oscillator>,
}

#[derive(Eq, PartialEq)]
pub struct Oscillator {
    signal_name: String,
    half_period: u64,
    next_state: State,
    next_trigger_time: u64,
    low_state_value: BitVec<u32>,
    high_state_value: BitVec<u32>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum State {
    Low,
    High,
}

/// A toggle that became due.
#[derive(Debug, PartialEq, Eq)]
pub struct Trip {
    pub signal_name: String,
    pub value: BitVec<u32>,
    pub state: State,
}

impl OscillatorGroup {
    pub fn insert(&mut self, oscillator: Oscillator) {
        self.remove(&oscillator.signal_name);
        self.priority_queue.push(oscillator);
    }

    pub fn remove(&mut self, signal_name: &str) {
        self.priority_queue.retain(|e| e.signal_name != signal_name);
    }

    pub fn contains(&self, signal_name: &str) -> bool {
        self.priority_queue
            .iter()
            .any(|e| e.signal_name == signal_name)
    }

    pub fn next_trigger_time(&self) -> Option<u64> {
        self.priority_queue.peek().map(|e| e.next_trigger_time)
    }

    /// Pops the earliest toggle if it is due at or before `current_time`.
    pub fn try_pop(&mut self, current_time: u64) -> Option<Trip> {
        let due = self
            .priority_queue
            .peek()
            .is_some_and(|e| e.next_trigger_time <= current_time);
        if !due {
            return None;
        }
        let mut oscillator = self.priority_queue.pop()?;
        let trip = oscillator.trip();
        self.priority_queue.push(oscillator);
        Some(trip)
    }
}

impl Oscillator {
    /// Starts low at `current_time`; the first toggle (to high) is due
    /// `half_period` later.
    pub fn new(
        signal_name: String,
        half_period: u64,
        current_time: u64,
        low_state_value: BitVec<u32>,
        high_state_value: BitVec<u32>,
    ) -> Self {
        Self {
            signal_name,
            half_period,
            next_state: State::High,
            next_trigger_time: current_time + half_period,
            low_state_value,
            high_state_value,
        }
    }

    pub fn low_state_value(&self) -> &BitVec<u32> {
        &self.low_state_value
    }

    fn trip(&mut self) -> Trip {
        let state = self.next_state;
        let value = match state {
            State::Low => self.low_state_value.clone(),
            State::High => self.high_state_value.clone(),
        };
        self.next_trigger_time += self.half_period;
        self.next_state = match state {
            State::Low => State::High,
            State::High => State::Low,
        };
        Trip {
            signal_name: self.signal_name.clone(),
            value,
            state,
        }
    }
}

impl Ord for Oscillator {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .next_trigger_time
            .cmp(&self.next_trigger_time)
            .then_with(|| other.signal_name.cmp(&self.signal_name))
    }
}

impl PartialOrd for Oscillator {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod test {
    use bitvec::prelude::*;

    use super::{Oscillator, OscillatorGroup, State};

    fn oscillator(name: &str, half_period: u64) -> Oscillator {
        Oscillator::new(
            name.to_string(),
            half_period,
            0,
            bitvec![u32, Lsb0; 0],
            bitvec![u32, Lsb0; 1],
        )
    }

    #[test]
    fn test_alternating_states() {
        let mut group = OscillatorGroup::default();
        group.insert(oscillator("clk", 5));

        assert_eq!(group.next_trigger_time(), Some(5));
        assert!(group.try_pop(4).is_none());

        let trip = group.try_pop(5).unwrap();
        assert_eq!(trip.signal_name, "clk");
        assert_eq!(trip.state, State::High);
        assert!(trip.value.any());

        assert_eq!(group.next_trigger_time(), Some(10));
        let trip = group.try_pop(10).unwrap();
        assert_eq!(trip.state, State::Low);
        assert!(trip.value.not_any());
    }

    #[test]
    fn test_earliest_trigger_first() {
        let mut group = OscillatorGroup::default();
        group.insert(oscillator("slow", 7));
        group.insert(oscillator("fast", 3));

        assert_eq!(group.next_trigger_time(), Some(3));
        assert_eq!(group.try_pop(3).unwrap().signal_name, "fast");
        assert_eq!(group.next_trigger_time(), Some(6));
        assert_eq!(group.try_pop(6).unwrap().signal_name, "fast");
        assert_eq!(group.next_trigger_time(), Some(7));
        assert_eq!(group.try_pop(7).unwrap().signal_name, "slow");
    }

    #[test]
    fn test_simultaneous_triggers_are_ordered_by_name() {
        let mut group = OscillatorGroup::default();
        group.insert(oscillator("b_clk", 2));
        group.insert(oscillator("a_clk", 2));

        assert_eq!(group.try_pop(2).unwrap().signal_name, "a_clk");
        assert_eq!(group.try_pop(2).unwrap().signal_name, "b_clk");
        assert!(group.try_pop(2).is_none());
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut group = OscillatorGroup::default();
        group.insert(oscillator("clk", 10));
        group.insert(oscillator("clk", 4));

        assert!(group.contains("clk"));
        assert_eq!(group.next_trigger_time(), Some(4));

        group.remove("clk");
        assert!(!group.contains("clk"));
        assert_eq!(group.next_trigger_time(), None);
    }
}
