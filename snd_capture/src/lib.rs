//! Testbench that clocks the `logistic_snd` design and records its
//! single-bit sound output as 8-bit mono PCM, one sample per clock cycle.

pub mod buffer;
pub mod config;
pub mod driver;
pub mod error;
pub mod sink;
pub mod vcd;

pub use config::{CaptureConfig, Ports};
pub use driver::{CaptureDriver, CaptureReport, Phase, SmokeReport};
pub use error::{CaptureResult, Error};
pub use sink::{MemorySink, SampleSink, WavSink};
