use async_trait::async_trait;
use bitvec::prelude::*;
use tokio::sync::RwLock;

use crate::{
    backend::DutBackend,
    error::{Error, SimResult},
    oscillator::{Oscillator, OscillatorGroup, State},
    Clock, Signal, Simulator,
};

/// An event-driven engine that owns a DUT model and the clocks driving it.
pub struct LocalSimulator<D: DutBackend> {
    dut: D,
    state: RwLock<EngineState>,
}

#[derive(Default)]
struct EngineState {
    current_time: u64,
    oscillators: OscillatorGroup,
}

#[async_trait]
impl<D: DutBackend> Simulator for LocalSimulator<D> {
    async fn signals(&self) -> SimResult<Vec<Signal>> {
        let _state = self.state.read().await;
        Ok(self.dut.query()?)
    }

    async fn start_clock(&self, clock: Clock) -> SimResult<()> {
        let half_period = clock.half_period_ps()?;
        let hz = clock.frequency_hz()?;
        let mut state = self.state.write().await;
        let oscillator = Oscillator::new(
            clock.signal_name.clone(),
            half_period,
            state.current_time,
            bitvec![u32, Lsb0; 0],
            bitvec![u32, Lsb0; 1],
        );
        self.dut
            .set(&clock.signal_name, oscillator.low_state_value())?;
        state.oscillators.insert(oscillator);
        tracing::debug!(%clock, hz, time = state.current_time, "clock started");
        Ok(())
    }

    async fn clock_cycles(&self, signal_name: &str, cycles: u64) -> SimResult<u64> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        if cycles == 0 {
            return Ok(state.current_time);
        }
        if !state.oscillators.contains(signal_name) {
            return Err(Error::NoClock(signal_name.to_string()));
        }

        let mut rising_edges = 0;
        while rising_edges < cycles {
            let next_trigger_time = state
                .oscillators
                .next_trigger_time()
                .ok_or_else(|| Error::NoClock(signal_name.to_string()))?;
            self.run_until(state, next_trigger_time)?;
            while let Some(trip) = state.oscillators.try_pop(state.current_time) {
                self.dut.set(&trip.signal_name, &trip.value)?;
                if trip.signal_name == signal_name && trip.state == State::High {
                    rising_edges += 1;
                }
            }
        }
        Ok(state.current_time)
    }

    async fn set(&self, signal_name: &str, value: &BitVec<u32>) -> SimResult<()> {
        let _state = self.state.write().await;
        Ok(self.dut.set(signal_name, value)?)
    }

    async fn get(&self, signal_name: &str) -> SimResult<BitVec<u32>> {
        let _state = self.state.read().await;
        Ok(self.dut.get(signal_name)?)
    }

    async fn current_time(&self) -> u64 {
        self.state.read().await.current_time
    }
}

impl<D: DutBackend> LocalSimulator<D> {
    pub fn new(dut: D) -> Self {
        Self {
            dut,
            state: RwLock::new(EngineState::default()),
        }
    }

    pub fn dut(&self) -> &D {
        &self.dut
    }

    fn run_until(&self, state: &mut EngineState, target_time: u64) -> SimResult<()> {
        while state.current_time < target_time {
            let curr_time = self.dut.run(target_time - state.current_time)?;
            if curr_time <= state.current_time {
                return Err(Error::Stalled(state.current_time));
            }
            state.current_time = curr_time;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use bitvec::prelude::*;

    use snd_rs::{dut, Signal, SndResult};

    use super::LocalSimulator;
    use crate::{backend::DutBackend, Clock, Error, Simulator, TimeUnit};

    /// Records every write so tests can inspect the toggle history.
    #[derive(Default)]
    struct RecordingDut {
        max_step: Option<u64>,
        inner: Mutex<RecordingState>,
    }

    #[derive(Default)]
    struct RecordingState {
        time: u64,
        values: HashMap<String, BitVec<u32>>,
        writes: Vec<(u64, String, bool)>,
    }

    impl RecordingDut {
        fn with_max_step(max_step: u64) -> Self {
            Self {
                max_step: Some(max_step),
                ..Default::default()
            }
        }

        fn writes(&self) -> Vec<(u64, String, bool)> {
            self.inner.lock().unwrap().writes.clone()
        }
    }

    impl DutBackend for RecordingDut {
        fn query(&self) -> SndResult<Vec<Signal>> {
            Ok(vec![Signal::new("clk", 1, false, true)])
        }

        fn run(&self, duration: u64) -> SndResult<u64> {
            let mut inner = self.inner.lock().unwrap();
            inner.time += self.max_step.map_or(duration, |m| m.min(duration));
            Ok(inner.time)
        }

        fn set(&self, signal_name: &str, value: &BitVec<u32>) -> SndResult<()> {
            let mut inner = self.inner.lock().unwrap();
            let time = inner.time;
            inner
                .writes
                .push((time, signal_name.to_string(), value.any()));
            inner.values.insert(signal_name.to_string(), value.clone());
            Ok(())
        }

        fn get(&self, signal_name: &str) -> SndResult<BitVec<u32>> {
            let inner = self.inner.lock().unwrap();
            match inner.values.get(signal_name) {
                Some(value) => Ok(value.clone()),
                None => Err(dut::Error::Get(signal_name.to_string()).into()),
            }
        }
    }

    /// Never advances time.
    struct StuckDut;

    impl DutBackend for StuckDut {
        fn query(&self) -> SndResult<Vec<Signal>> {
            Ok(vec![])
        }

        fn run(&self, _duration: u64) -> SndResult<u64> {
            Ok(0)
        }

        fn set(&self, _signal_name: &str, _value: &BitVec<u32>) -> SndResult<()> {
            Ok(())
        }

        fn get(&self, signal_name: &str) -> SndResult<BitVec<u32>> {
            Err(dut::Error::Get(signal_name.to_string()).into())
        }
    }

    #[tokio::test]
    async fn test_rising_edges_on_half_periods() {
        let simulator = LocalSimulator::new(RecordingDut::default());
        simulator
            .start_clock(Clock::new("clk", 1, TimeUnit::Us))
            .await
            .unwrap();

        let time = simulator.clock_cycles("clk", 3).await.unwrap();
        assert_eq!(time, 2_500_000);
        assert_eq!(simulator.current_time().await, 2_500_000);

        let writes = simulator.dut().writes();
        assert_eq!(
            writes,
            vec![
                (0, "clk".to_string(), false),
                (500_000, "clk".to_string(), true),
                (1_000_000, "clk".to_string(), false),
                (1_500_000, "clk".to_string(), true),
                (2_000_000, "clk".to_string(), false),
                (2_500_000, "clk".to_string(), true),
            ]
        );
        assert!(simulator.get("clk").await.unwrap().any());
    }

    #[tokio::test]
    async fn test_consecutive_waits_resume_where_they_left_off() {
        let simulator = LocalSimulator::new(RecordingDut::default());
        simulator
            .start_clock(Clock::new("clk", 10, TimeUnit::Ns))
            .await
            .unwrap();

        assert_eq!(simulator.clock_cycles("clk", 1).await.unwrap(), 5_000);
        assert_eq!(simulator.clock_cycles("clk", 1).await.unwrap(), 15_000);
        assert_eq!(simulator.clock_cycles("clk", 10).await.unwrap(), 115_000);
    }

    #[tokio::test]
    async fn test_zero_cycles_does_not_advance() {
        let simulator = LocalSimulator::new(RecordingDut::default());
        simulator
            .start_clock(Clock::new("clk", 2, TimeUnit::Ps))
            .await
            .unwrap();
        assert_eq!(simulator.clock_cycles("clk", 0).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_partial_runs_are_resumed() {
        let simulator = LocalSimulator::new(RecordingDut::with_max_step(7));
        simulator
            .start_clock(Clock::new("clk", 100, TimeUnit::Ps))
            .await
            .unwrap();

        // The model never runs more than 7 ps per call.
        assert_eq!(simulator.clock_cycles("clk", 1).await.unwrap(), 50);
        assert_eq!(simulator.clock_cycles("clk", 2).await.unwrap(), 250);
    }

    #[tokio::test]
    async fn test_waiting_on_undriven_signal() {
        let simulator = LocalSimulator::new(RecordingDut::default());
        let result = simulator.clock_cycles("clk", 1).await;
        assert!(matches!(result, Err(Error::NoClock(name)) if name == "clk"));
    }

    #[tokio::test]
    async fn test_invalid_clock_period() {
        let simulator = LocalSimulator::new(RecordingDut::default());
        let result = simulator
            .start_clock(Clock::new("clk", 1, TimeUnit::Ps))
            .await;
        assert!(matches!(result, Err(Error::InvalidClockPeriod(1))));
    }

    #[tokio::test]
    async fn test_stalled_dut() {
        let simulator = LocalSimulator::new(StuckDut);
        simulator
            .start_clock(Clock::new("clk", 2, TimeUnit::Ns))
            .await
            .unwrap();
        let result = simulator.clock_cycles("clk", 1).await;
        assert!(matches!(result, Err(Error::Stalled(0))));
    }

    #[tokio::test]
    async fn test_get_unknown_signal() {
        let simulator = LocalSimulator::new(RecordingDut::default());
        assert!(matches!(
            simulator.get("snd_out").await,
            Err(Error::Dut(snd_rs::Error::Dut(dut::Error::Get(_))))
        ));
    }
}
