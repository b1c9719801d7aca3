//! Fixed-capacity circular history of pulse samples.

use super::PulseSample;

/// Circular buffer of recent pulse samples for display and diagnostics.
///
/// Once full, each push overwrites the oldest slot. The write index is
/// exposed so a renderer can draw the waveform in capture order.
#[derive(Debug, Clone)]
pub struct PulseHistory {
    samples: Vec<PulseSample>,
    capacity: usize,
    write_index: usize,
}

impl PulseHistory {
    /// Creates an empty history with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
            write_index: 0,
        }
    }

    /// Appends a sample, overwriting the oldest once at capacity.
    pub fn push(&mut self, sample: PulseSample) {
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.write_index] = sample;
        }
        self.write_index = (self.write_index + 1) % self.capacity;
    }

    /// Returns the stored samples in slot order (not capture order).
    #[inline]
    pub fn samples(&self) -> &[PulseSample] {
        &self.samples
    }

    /// Returns the slot the next push will write to.
    #[inline]
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Returns the buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of stored samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if no samples are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the most recently pushed sample.
    pub fn latest(&self) -> Option<&PulseSample> {
        if self.samples.is_empty() {
            return None;
        }
        let index = (self.write_index + self.capacity - 1) % self.capacity;
        self.samples.get(index)
    }

    /// Removes all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.write_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(value: f64, timestamp: f64) -> PulseSample {
        PulseSample { value, timestamp }
    }

    #[test]
    fn test_fills_then_wraps() {
        let mut history = PulseHistory::new(3);
        history.push(sample(1.0, 0.0));
        history.push(sample(2.0, 0.1));
        history.push(sample(3.0, 0.2));
        assert_eq!(history.len(), 3);
        assert_eq!(history.write_index(), 0);

        // Fourth push overwrites the oldest slot.
        history.push(sample(4.0, 0.3));
        assert_eq!(history.len(), 3);
        assert_eq!(history.samples()[0].value, 4.0);
        assert_eq!(history.samples()[1].value, 2.0);
    }

    #[test]
    fn test_latest() {
        let mut history = PulseHistory::new(3);
        assert!(history.latest().is_none());

        history.push(sample(1.0, 0.0));
        assert_eq!(history.latest().unwrap().value, 1.0);

        history.push(sample(2.0, 0.1));
        history.push(sample(3.0, 0.2));
        history.push(sample(4.0, 0.3));
        assert_eq!(history.latest().unwrap().value, 4.0);
    }

    #[test]
    fn test_clear() {
        let mut history = PulseHistory::new(2);
        history.push(sample(1.0, 0.0));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.write_index(), 0);
    }
}
