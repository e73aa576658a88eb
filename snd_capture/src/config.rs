use std::path::PathBuf;

use snd_sim::{Clock, TimeUnit};

use crate::error::{CaptureResult, Error};

/// Rate at which the design is meant to be clocked; one sample per cycle.
pub const CLOCK_RATE: u64 = 25_200_000;
/// Seconds of audio to capture.
pub const DURATION: u64 = 120;
pub const FLUSH_THRESHOLD: usize = 2 * 1024 * 1024;
pub const FLUSHES_PER_PROGRESS_LINE: u64 = 12;
pub const RESET_CYCLES: u64 = 10;
pub const OUTPUT_FILE: &str = "logistic_snd.wav";
/// Largest 8-bit mono frame count whose RIFF size (data bytes + 36) fits a `u32`.
pub const MAX_WAV_FRAMES: u64 = u32::MAX as u64 - 36;

/// Names of the DUT ports the harness touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ports {
    pub clock: String,
    pub reset: String,
    pub sound: String,
}

impl Default for Ports {
    fn default() -> Self {
        Self {
            clock: "clk".to_string(),
            reset: "rst_n".to_string(),
            sound: "snd_out".to_string(),
        }
    }
}

impl Ports {
    pub fn names(&self) -> [&str; 3] {
        [&self.clock, &self.reset, &self.sound].map(String::as_str)
    }

    /// Inputs the harness drives; a run that records nothing needs only these.
    pub fn driven(&self) -> [&str; 2] {
        [&self.clock, &self.reset].map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub clock_rate: u64,
    pub duration: u64,
    /// Toggle period requested from the simulator. Independent of
    /// `clock_rate`, which only sizes the capture and the file header.
    pub clock_period: u64,
    pub clock_unit: TimeUnit,
    pub reset_cycles: u64,
    pub flush_threshold: usize,
    pub flushes_per_progress_line: u64,
    pub ports: Ports,
    pub output: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            clock_rate: CLOCK_RATE,
            duration: DURATION,
            clock_period: 1,
            clock_unit: TimeUnit::Us,
            reset_cycles: RESET_CYCLES,
            flush_threshold: FLUSH_THRESHOLD,
            flushes_per_progress_line: FLUSHES_PER_PROGRESS_LINE,
            ports: Ports::default(),
            output: PathBuf::from(OUTPUT_FILE),
        }
    }
}

impl CaptureConfig {
    pub fn clock(&self) -> Clock {
        Clock::new(&self.ports.clock, self.clock_period, self.clock_unit)
    }

    /// Number of cycles sampled, which is also the number of frames in the file.
    pub fn total_cycles(&self) -> CaptureResult<u64> {
        self.clock_rate
            .checked_mul(self.duration)
            .ok_or_else(|| Error::Config("clock_rate * duration overflows".to_string()))
    }

    pub fn sample_rate(&self) -> CaptureResult<u32> {
        u32::try_from(self.clock_rate).map_err(|_| {
            Error::Config(format!(
                "clock rate {} does not fit a WAV header",
                self.clock_rate
            ))
        })
    }

    pub fn wav_spec(&self) -> CaptureResult<hound::WavSpec> {
        Ok(hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate()?,
            bits_per_sample: 8,
            sample_format: hound::SampleFormat::Int,
        })
    }

    pub fn validate(&self) -> CaptureResult<()> {
        if self.clock_rate == 0 {
            return Err(Error::Config("clock rate must be non-zero".to_string()));
        }
        if self.duration == 0 {
            return Err(Error::Config("duration must be non-zero".to_string()));
        }
        if self.flush_threshold == 0 {
            return Err(Error::Config("flush threshold must be non-zero".to_string()));
        }
        if self.flushes_per_progress_line == 0 {
            return Err(Error::Config(
                "flushes per progress line must be non-zero".to_string(),
            ));
        }
        self.sample_rate()?;
        let total_cycles = self.total_cycles()?;
        if total_cycles > MAX_WAV_FRAMES {
            return Err(Error::Config(format!(
                "{total_cycles} frames do not fit a WAV data chunk"
            )));
        }
        self.clock().half_period_ps()?;
        Ok(())
    }
}
