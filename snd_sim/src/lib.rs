pub mod backend;
mod clock;
pub mod error;
mod local_simulator;
pub mod log;
mod oscillator;
mod simulator;

pub use backend::DutBackend;
pub use clock::{Clock, TimeUnit};
pub use error::{Error, SimResult};
pub use local_simulator::LocalSimulator;
pub use log::{LogSink, TracingLog};
pub use simulator::Simulator;

pub use snd_rs::{Dut, Signal};
