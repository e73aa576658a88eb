use bitvec::vec::BitVec;

use snd_rs::{Dut, Signal, SndResult};

/// Synchronous access to an evaluated DUT model.
///
/// `run` advances the model by `duration` time steps (picoseconds) and
/// returns the absolute time the model stopped at, which may be earlier than
/// requested; callers keep running until they reach their target.
pub trait DutBackend: Send + Sync {
    fn query(&self) -> SndResult<Vec<Signal>>;
    fn run(&self, duration: u64) -> SndResult<u64>;
    fn set(&self, signal_name: &str, value: &BitVec<u32>) -> SndResult<()>;
    fn get(&self, signal_name: &str) -> SndResult<BitVec<u32>>;
}

impl DutBackend for Dut {
    fn query(&self) -> SndResult<Vec<Signal>> {
        Dut::query(self)
    }

    fn run(&self, duration: u64) -> SndResult<u64> {
        Dut::run(self, duration)
    }

    fn set(&self, signal_name: &str, value: &BitVec<u32>) -> SndResult<()> {
        Dut::set(self, signal_name, value)
    }

    fn get(&self, signal_name: &str) -> SndResult<BitVec<u32>> {
        Dut::get(self, signal_name)
    }
}
