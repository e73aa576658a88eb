use std::{
    fs::File,
    io::{BufWriter, Seek, Write},
    path::Path,
};

use crate::error::CaptureResult;

/// Destination for flushed sample chunks.
pub trait SampleSink {
    fn write_chunk(&mut self, samples: &[u8]) -> CaptureResult<()>;
}

/// Unsigned 8-bit mono PCM written with `hound`.
pub struct WavSink<W: Write + Seek> {
    writer: hound::WavWriter<W>,
}

impl WavSink<BufWriter<File>> {
    pub fn create(path: &Path, spec: hound::WavSpec) -> CaptureResult<Self> {
        Self::new(BufWriter::new(File::create(path)?), spec)
    }
}

impl<W: Write + Seek> WavSink<W> {
    pub fn new(writer: W, spec: hound::WavSpec) -> CaptureResult<Self> {
        Ok(Self {
            writer: hound::WavWriter::new(writer, spec)?,
        })
    }

    pub fn frames_written(&self) -> u64 {
        u64::from(self.writer.duration())
    }

    /// Rewrites the header and closes the file, returning the frame count.
    pub fn finalize(self) -> CaptureResult<u64> {
        let frames = self.frames_written();
        self.writer.finalize()?;
        Ok(frames)
    }
}

impl<W: Write + Seek> SampleSink for WavSink<W> {
    fn write_chunk(&mut self, samples: &[u8]) -> CaptureResult<()> {
        // hound takes 8-bit samples as i8 and stores them offset by 128.
        for &sample in samples {
            self.writer.write_sample((sample ^ 0x80) as i8)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every chunk in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub chunks: Vec<Vec<u8>>,
}

impl MemorySink {
    pub fn bytes(&self) -> Vec<u8> {
        self.chunks.concat()
    }

    pub fn chunk_sizes(&self) -> Vec<usize> {
        self.chunks.iter().map(Vec::len).collect()
    }
}

impl SampleSink for MemorySink {
    fn write_chunk(&mut self, samples: &[u8]) -> CaptureResult<()> {
        self.chunks.push(samples.to_vec());
        Ok(())
    }
}
