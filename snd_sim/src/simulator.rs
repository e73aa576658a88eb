use async_trait::async_trait;
use bitvec::vec::BitVec;

use crate::{Clock, SimResult, Signal};

/// The simulation engine as seen by a testbench.
///
/// All time values are in picoseconds.
#[async_trait]
pub trait Simulator: Send + Sync {
    async fn signals(&self) -> SimResult<Vec<Signal>>;

    /// Starts toggling `clock` for as long as the simulator lives. The line is
    /// driven low immediately; the first rising edge is half a period later.
    async fn start_clock(&self, clock: Clock) -> SimResult<()>;

    /// Suspends until `cycles` rising edges of `signal_name` have occurred and
    /// returns the simulation time of the last one.
    async fn clock_cycles(&self, signal_name: &str, cycles: u64) -> SimResult<u64>;

    async fn set(&self, signal_name: &str, value: &BitVec<u32>) -> SimResult<()>;
    async fn get(&self, signal_name: &str) -> SimResult<BitVec<u32>>;
    async fn current_time(&self) -> u64;
}
