pub const HIGH: u8 = 255;
pub const LOW: u8 = 0;

/// Per-cycle output levels waiting to be written out.
pub struct SampleBuffer {
    samples: Vec<u8>,
    threshold: usize,
}

impl SampleBuffer {
    pub fn with_threshold(threshold: usize) -> Self {
        Self {
            samples: Vec::with_capacity(threshold),
            threshold,
        }
    }

    /// Appends one sample and returns `true` once the buffer is due for a flush.
    pub fn push(&mut self, level: bool) -> bool {
        self.samples.push(if level { HIGH } else { LOW });
        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.threshold
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.samples
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
