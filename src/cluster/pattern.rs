//! A single BPM hypothesis built from matching inter-beat intervals.

/// One cluster of similar inter-beat intervals.
///
/// Named by the rounded BPM it had at creation. Member intervals are
/// kept in arrival order; the mean, estimated BPM, and variability are
/// recomputed on every absorption.
#[derive(Debug, Clone)]
pub struct Pattern {
    name: String,
    intervals: Vec<f64>,
    mean_ibi: f64,
    bpm: u32,
    variability: f64,
}

impl Pattern {
    /// Creates a single-member pattern from its first interval.
    pub fn new(ibi: f64) -> Self {
        let bpm = (60.0 / ibi).round() as u32;
        Self {
            name: format!("{} BPM", bpm),
            intervals: vec![ibi],
            mean_ibi: ibi,
            bpm,
            variability: 0.0,
        }
    }

    /// Adds an interval and recomputes the derived fields.
    pub fn absorb(&mut self, ibi: f64) {
        self.intervals.push(ibi);
        self.mean_ibi = self.intervals.iter().sum::<f64>() / self.intervals.len() as f64;
        self.bpm = (60.0 / self.mean_ibi).round() as u32;

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &interval in &self.intervals {
            min = min.min(interval);
            max = max.max(interval);
        }
        // Spread, not statistical variance.
        self.variability = max - min;
    }

    /// Returns the pattern name (the rounded BPM at creation).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the member intervals in arrival order.
    pub fn intervals(&self) -> &[f64] {
        &self.intervals
    }

    /// Returns the number of member intervals.
    pub fn count(&self) -> usize {
        self.intervals.len()
    }

    /// Returns the mean inter-beat interval in seconds.
    pub fn mean_ibi(&self) -> f64 {
        self.mean_ibi
    }

    /// Returns the estimated BPM, `round(60 / mean_ibi)`.
    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Returns the interval spread (max - min) in seconds.
    pub fn variability(&self) -> f64 {
        self.variability
    }
}
