//! Rebuilds a capture from a value-change dump of an earlier simulation run.
//!
//! `snd_out` is sampled on every falling edge of `clk`, so a dump of a
//! clocked run turns into the same one-byte-per-cycle stream the live
//! capture produces.

use std::io::BufRead;

use vcd::{Command, Value};

use crate::{
    buffer::SampleBuffer,
    config::{Ports, FLUSH_THRESHOLD},
    error::{CaptureResult, Error},
    sink::SampleSink,
};

const PROGRESS_INTERVAL: u64 = 1 << 20;

#[derive(Debug, Clone)]
pub struct VcdOptions {
    pub scope: Vec<String>,
    pub ports: Ports,
    pub flush_threshold: usize,
}

impl Default for VcdOptions {
    fn default() -> Self {
        Self {
            scope: vec!["TOP".to_string(), "tb".to_string()],
            ports: Ports::default(),
            flush_threshold: FLUSH_THRESHOLD,
        }
    }
}

impl VcdOptions {
    /// Parses a dotted scope path such as `TOP.tb`.
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = scope
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    fn var_path(&self, name: &str) -> Vec<String> {
        let mut path = self.scope.clone();
        path.push(name.to_string());
        path
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    pub samples: u64,
    pub flushes: u64,
    pub clock_transitions: u64,
}

pub fn convert<R: BufRead, K: SampleSink + ?Sized>(
    reader: R,
    options: &VcdOptions,
    sink: &mut K,
) -> CaptureResult<ConvertReport> {
    let mut parser = vcd::Parser::new(reader);
    let header = parser
        .parse_header()
        .map_err(|e| Error::Vcd(format!("error parsing header: {e}")))?;

    let find_code = |name: &str| {
        let path = options.var_path(name);
        header
            .find_var(&path[..])
            .map(|var| var.code)
            .ok_or_else(|| Error::VcdVarNotFound(path.join(".")))
    };
    let clk = find_code(&options.ports.clock)?;
    let snd_out = find_code(&options.ports.sound)?;

    let mut clk_val = Value::X;
    let mut snd_val = Value::X;
    let mut buffer = SampleBuffer::with_threshold(options.flush_threshold);
    let mut report = ConvertReport::default();

    for command in parser {
        let command = command.map_err(|e| Error::Vcd(format!("error reading command: {e}")))?;
        match command {
            Command::ChangeScalar(code, value) if code == clk => {
                if clk_val == Value::V1 && value == Value::V0 {
                    report.samples += 1;
                    if buffer.push(snd_val == Value::V1) {
                        flush(&mut buffer, sink, &mut report)?;
                    }
                }
                clk_val = value;

                report.clock_transitions += 1;
                if report.clock_transitions % PROGRESS_INTERVAL == 0 {
                    tracing::debug!(
                        transitions = report.clock_transitions,
                        samples = report.samples,
                        "reading VCD"
                    );
                }
            }
            Command::ChangeScalar(code, value) if code == snd_out => {
                snd_val = value;
            }
            _ => {}
        }
    }
    if !buffer.is_empty() {
        flush(&mut buffer, sink, &mut report)?;
    }
    Ok(report)
}

fn flush<K: SampleSink + ?Sized>(
    buffer: &mut SampleBuffer,
    sink: &mut K,
    report: &mut ConvertReport,
) -> CaptureResult<()> {
    sink.write_chunk(buffer.as_slice())?;
    buffer.clear();
    report.flushes += 1;
    Ok(())
}
