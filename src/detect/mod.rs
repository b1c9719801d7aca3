//! Beat detection from the smoothed pulse signal.
//!
//! A two-state machine with adaptive envelopes, hysteresis thresholds,
//! and a refractory period turns the continuous pulse scalar into
//! discrete beat timestamps.

mod detector;

pub use detector::{BeatDetector, BeatEvent, DetectorState, SampleRejection};
