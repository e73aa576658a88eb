//! Binding to a compiled design-under-test.
//!
//! The DUT is a shared library (typically a Verilator model wrapped in a thin
//! C shim) exporting `sim_query`, `sim_run`, `sim_set` and `sim_get`.

pub mod dut;
pub mod error;

pub use dut::{Dut, Signal};
pub use error::{Error, SndResult};
