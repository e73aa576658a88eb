use std::{
    io::{Seek, Write},
    sync::Arc,
};

use bitvec::prelude::*;
use snd_sim::{LogSink, Simulator};

use crate::{
    buffer::SampleBuffer,
    config::CaptureConfig,
    error::{CaptureResult, Error},
    sink::{SampleSink, WavSink},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Resetting,
    Capturing,
    Done,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    pub samples: u64,
    pub flushes: u64,
    pub bytes_written: u64,
    pub progress_lines: u64,
    pub end_time: u64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SmokeReport {
    pub iterations: u64,
    pub cycles: u64,
    pub end_time: u64,
}

/// Drives clock and reset on the DUT and records its sound output.
pub struct CaptureDriver<S: Simulator + ?Sized> {
    simulator: Arc<S>,
    log: Arc<dyn LogSink>,
    config: CaptureConfig,
    phase: Phase,
}

impl<S: Simulator + ?Sized> CaptureDriver<S> {
    pub fn new(
        simulator: Arc<S>,
        log: Arc<dyn LogSink>,
        config: CaptureConfig,
    ) -> CaptureResult<Self> {
        config.validate()?;
        Ok(Self {
            simulator,
            log,
            config,
            phase: Phase::Idle,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Samples the sound output once per clock cycle for the configured
    /// duration and writes the samples to `sink`.
    ///
    /// The sink receives chunks of exactly `flush_threshold` bytes, followed
    /// by one shorter chunk when the sample count is not a multiple of it.
    pub async fn capture<K: SampleSink + ?Sized>(
        &mut self,
        sink: &mut K,
    ) -> CaptureResult<CaptureReport> {
        self.start(&self.config.ports.names()).await?;
        self.reset().await?;

        self.log.info("Capture audio");
        self.phase = Phase::Capturing;
        let total_cycles = self.config.total_cycles()?;
        let mut buffer = SampleBuffer::with_threshold(self.config.flush_threshold);
        let mut report = CaptureReport::default();

        for _ in 0..total_cycles {
            self.simulator
                .clock_cycles(&self.config.ports.clock, 1)
                .await?;
            let level = self.simulator.get(&self.config.ports.sound).await?.any();
            report.samples += 1;
            if buffer.push(level) {
                self.flush(&mut buffer, sink, &mut report, total_cycles)?;
            }
        }
        if !buffer.is_empty() {
            self.flush(&mut buffer, sink, &mut report, total_cycles)?;
        }

        report.end_time = self.simulator.current_time().await;
        self.phase = Phase::Done;
        self.log.info(&format!(
            "Captured {} samples in {} flushes",
            report.samples, report.flushes
        ));
        Ok(report)
    }

    /// Runs [`capture`](Self::capture) into a WAV file and finalizes it,
    /// also when the capture fails part way.
    pub async fn capture_to_wav<W: Write + Seek>(
        &mut self,
        mut sink: WavSink<W>,
    ) -> CaptureResult<CaptureReport> {
        let result = self.capture(&mut sink).await;
        let frames = sink.finalize()?;
        let expected = self.config.total_cycles()?;
        if frames != expected {
            self.log.warn(&format!(
                "WAV file holds {frames} of {expected} declared frames"
            ));
        }
        result
    }

    /// Exercises the DUT for the configured duration without recording it,
    /// waiting one second's worth of cycles at a time.
    pub async fn smoke(&mut self) -> CaptureResult<SmokeReport> {
        self.start(&self.config.ports.driven()).await?;
        self.reset().await?;

        self.log.info("Run design");
        self.phase = Phase::Capturing;
        let mut report = SmokeReport::default();
        for _ in 0..self.config.duration {
            self.simulator
                .clock_cycles(&self.config.ports.clock, self.config.clock_rate)
                .await?;
            report.iterations += 1;
            report.cycles += self.config.clock_rate;
            self.log.info("...");
        }

        report.end_time = self.simulator.current_time().await;
        self.phase = Phase::Done;
        Ok(report)
    }

    async fn start(&self, required: &[&str]) -> CaptureResult<()> {
        if self.phase != Phase::Idle {
            return Err(Error::AlreadyRan);
        }
        self.log.info("Start");
        self.check_ports(required).await?;
        self.simulator.start_clock(self.config.clock()).await?;
        Ok(())
    }

    async fn check_ports(&self, required: &[&str]) -> CaptureResult<()> {
        let signals = self.simulator.signals().await?;
        for &name in required {
            if !signals.iter().any(|s| s.name == name) {
                return Err(Error::MissingSignal(name.to_string()));
            }
        }
        Ok(())
    }

    async fn reset(&mut self) -> CaptureResult<()> {
        self.phase = Phase::Resetting;
        self.log.info("Reset");
        let ports = &self.config.ports;
        self.simulator
            .set(&ports.reset, &bitvec![u32, Lsb0; 0])
            .await?;
        self.simulator
            .clock_cycles(&ports.clock, self.config.reset_cycles)
            .await?;
        self.simulator
            .set(&ports.reset, &bitvec![u32, Lsb0; 1])
            .await?;
        Ok(())
    }

    fn flush<K: SampleSink + ?Sized>(
        &self,
        buffer: &mut SampleBuffer,
        sink: &mut K,
        report: &mut CaptureReport,
        total_cycles: u64,
    ) -> CaptureResult<()> {
        sink.write_chunk(buffer.as_slice())?;
        report.bytes_written += buffer.len() as u64;
        report.flushes += 1;
        buffer.clear();
        tracing::debug!(flushes = report.flushes, bytes = report.bytes_written, "flushed");

        if report.flushes % self.config.flushes_per_progress_line == 0 {
            report.progress_lines += 1;
            self.log.info(&format!(
                "Progress: {}/{} samples ({:.1}%)",
                report.samples,
                total_cycles,
                report.samples as f64 * 100.0 / total_cycles as f64
            ));
        }
        Ok(())
    }
}
