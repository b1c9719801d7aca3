//! Inter-beat interval clustering and BPM reporting.
//!
//! Successive inter-beat intervals are grouped into competing BPM
//! hypotheses ("patterns") by relative tolerance; the best-supported
//! pattern is the reported pulse rate.

mod clusterer;
mod pattern;

pub use clusterer::{BpmReport, Confidence, PatternClusterer};
pub use pattern::Pattern;

/// Shortest plausible inter-beat interval in seconds (160 BPM).
pub const IBI_MIN: f64 = 0.375;
/// Longest plausible inter-beat interval in seconds (60 BPM).
pub const IBI_MAX: f64 = 1.0;
