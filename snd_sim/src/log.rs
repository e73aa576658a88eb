/// Where a testbench reports what it is doing.
pub trait LogSink: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Forwards testbench messages to `tracing`, tagged with the DUT name.
pub struct TracingLog {
    dut_name: String,
}

impl TracingLog {
    pub fn new(dut_name: &str) -> Self {
        Self {
            dut_name: dut_name.to_string(),
        }
    }
}

impl LogSink for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!(dut = %self.dut_name, "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(dut = %self.dut_name, "{message}");
    }
}
