//! Tolerance-based interval clustering with count-ranked matching.

use super::{Pattern, IBI_MAX, IBI_MIN};
use crate::capture::PulseConfig;

/// Confidence tier of a BPM report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// The top pattern is locked: enough beats, low variability.
    High,
    /// Some support but not yet locked.
    Medium,
    /// Weak support; carries the raw beat count.
    Low(usize),
}

/// The currently reported pulse rate.
#[derive(Debug, Clone, PartialEq)]
pub struct BpmReport {
    /// Estimated beats per minute of the top pattern.
    pub bpm: u32,
    /// Confidence tier.
    pub confidence: Confidence,
    /// Member count of the top pattern.
    pub count: usize,
    /// Interval spread of the top pattern in seconds.
    pub variability: f64,
}

impl std::fmt::Display for BpmReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.confidence {
            Confidence::High => write!(f, "{} BPM", self.bpm),
            Confidence::Medium => write!(f, "{} BPM (settling)", self.bpm),
            Confidence::Low(count) => write!(f, "{} BPM? ({} beats)", self.bpm, count),
        }
    }
}

/// Clusters inter-beat intervals into competing BPM hypotheses.
///
/// Matching is first-match-wins over the pattern list, and the list is
/// re-sorted by member count (descending, stable) after every update.
/// The re-sort deliberately couples future matching to historical
/// update order: the strongest hypothesis gets first claim on each new
/// interval.
pub struct PatternClusterer {
    patterns: Vec<Pattern>,
    tolerance_percent: f64,
    min_beats_for_lock: u32,
    max_allowed_variability: f64,
}

impl PatternClusterer {
    /// Creates a clusterer with the given tuning.
    pub fn new(config: &PulseConfig) -> Self {
        Self {
            patterns: Vec::new(),
            tolerance_percent: config.tolerance_percent,
            min_beats_for_lock: config.min_beats_for_lock,
            max_allowed_variability: config.max_allowed_variability,
        }
    }

    /// Adds one inter-beat interval.
    ///
    /// Intervals outside the plausible `[0.375, 1.0]` second range are
    /// silently discarded.
    pub fn add_interval(&mut self, ibi: f64) {
        if !(IBI_MIN..=IBI_MAX).contains(&ibi) {
            return;
        }

        let tolerance = ibi * self.tolerance_percent / 100.0;
        match self
            .patterns
            .iter_mut()
            .find(|p| (p.mean_ibi() - ibi).abs() <= tolerance)
        {
            Some(pattern) => {
                pattern.absorb(ibi);
                tracing::trace!(
                    pattern = pattern.name(),
                    count = pattern.count(),
                    "interval absorbed"
                );
            }
            None => {
                let pattern = Pattern::new(ibi);
                tracing::debug!(pattern = pattern.name(), "new pattern");
                self.patterns.push(pattern);
            }
        }

        // Strongest hypothesis first; stable so ties keep their order.
        self.patterns.sort_by(|a, b| b.count().cmp(&a.count()));
    }

    /// Returns the patterns ranked by member count.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Returns the current BPM report, or `None` before any valid
    /// interval arrived.
    pub fn report(&self) -> Option<BpmReport> {
        let top = self.patterns.first()?;
        let count = top.count();
        let steady = top.variability() <= self.max_allowed_variability;

        let confidence = if steady && count >= self.min_beats_for_lock as usize {
            Confidence::High
        } else if steady && count >= 4 {
            Confidence::Medium
        } else {
            Confidence::Low(count)
        };

        Some(BpmReport {
            bpm: top.bpm(),
            confidence,
            count,
            variability: top.variability(),
        })
    }

    /// Discards all patterns.
    pub fn reset(&mut self) {
        self.patterns.clear();
    }
}
