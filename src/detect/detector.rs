//! Adaptive beat detection state machine.

use crate::capture::PulseConfig;
use crate::signal::lerp;

/// Per-sample decay of the peak envelope toward the signal.
const PEAK_DECAY: f64 = 0.99;
/// Per-sample expansion of the trough envelope toward the signal.
const TROUGH_EXPAND: f64 = 1.01;
/// The lower hysteresis threshold sits closer to the baseline than the
/// upper one: troughs only confirm a beat already flagged by a rise.
const LOWER_THRESHOLD_FACTOR: f64 = 0.85;
/// Floor for the peak-trough range to keep thresholds well-defined on a
/// flat signal.
const RANGE_EPSILON: f64 = 1e-9;

/// Detector states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Waiting for the signal to rise above the upper threshold.
    Ready,
    /// A rise was flagged; waiting for the confirming dip.
    WaitingForTrough,
}

/// Reasons a sample or candidate beat was rejected.
///
/// Rejection is pipeline policy, not a fault; the most recent reason is
/// retained for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SampleRejection {
    /// Sample above the plausible range (sensor saturation).
    #[error("TOO LOUD")]
    TooLoud,
    /// Sample below the plausible range (no signal).
    #[error("TOO QUIET")]
    TooQuiet,
    /// Candidate beat arrived inside the refractory window.
    #[error("REFRACTORY")]
    Refractory,
}

/// A confirmed heartbeat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatEvent {
    /// Timestamp of the confirming sample, in seconds.
    pub timestamp: f64,
    /// Interval since the previous confirmed beat, if one exists.
    pub interval: Option<f64>,
}

/// Detects heartbeats in the smoothed pulse signal.
///
/// Maintains a slow-tracking baseline plus decaying peak/trough
/// envelopes, derives asymmetric hysteresis thresholds from them, and
/// enforces a refractory period between confirmed beats. A refractory
/// violation discards the candidate outright rather than merging it
/// into the previous interval.
pub struct BeatDetector {
    state: DetectorState,
    baseline: f64,
    peak: f64,
    trough: f64,
    /// True once the envelopes were seeded by an accepted sample.
    primed: bool,
    last_beat: Option<f64>,
    /// Confirmed beat timestamps, append-only until reset.
    beats: Vec<f64>,
    last_rejection: Option<SampleRejection>,
    min_plausible: f64,
    max_plausible: f64,
    relative_threshold: f64,
    min_time_between_beats: f64,
    auto_center_speed: f64,
}

impl BeatDetector {
    /// Creates a detector with the given tuning.
    pub fn new(config: &PulseConfig) -> Self {
        Self {
            state: DetectorState::Ready,
            baseline: 0.0,
            peak: 0.0,
            trough: 0.0,
            primed: false,
            last_beat: None,
            beats: Vec::new(),
            last_rejection: None,
            min_plausible: config.min_plausible_pulse,
            max_plausible: config.max_plausible_pulse,
            relative_threshold: config.relative_threshold,
            min_time_between_beats: config.min_time_between_beats,
            auto_center_speed: config.auto_center_speed,
        }
    }

    /// Registers one pulse sample; returns a beat event if this sample
    /// confirmed one.
    ///
    /// Implausible samples are rejected without touching the envelopes.
    pub fn register(&mut self, value: f64, timestamp: f64) -> Option<BeatEvent> {
        if value > self.max_plausible {
            self.last_rejection = Some(SampleRejection::TooLoud);
            return None;
        }
        if value < self.min_plausible {
            self.last_rejection = Some(SampleRejection::TooQuiet);
            return None;
        }
        self.last_rejection = None;

        if self.primed {
            self.baseline = lerp(self.baseline, value, self.auto_center_speed);
            self.peak = (self.peak * PEAK_DECAY).max(value);
            self.trough = (self.trough * TROUGH_EXPAND).min(value);
        } else {
            // First accepted sample seeds the envelopes.
            self.baseline = value;
            self.peak = value;
            self.trough = value;
            self.primed = true;
        }

        let range = (self.peak - self.trough).max(RANGE_EPSILON);
        let upper = self.baseline + range * self.relative_threshold;
        let lower =
            self.baseline - range * self.relative_threshold * LOWER_THRESHOLD_FACTOR;

        match self.state {
            DetectorState::Ready => {
                if value > upper {
                    self.state = DetectorState::WaitingForTrough;
                }
                None
            }
            DetectorState::WaitingForTrough => {
                if value >= lower {
                    return None;
                }
                self.state = DetectorState::Ready;

                if let Some(last) = self.last_beat {
                    if timestamp - last < self.min_time_between_beats {
                        // Inside the refractory window: the candidate is
                        // dropped, not merged into the previous interval.
                        self.last_rejection = Some(SampleRejection::Refractory);
                        tracing::trace!(timestamp, "candidate beat in refractory window");
                        return None;
                    }
                }

                let interval = self.last_beat.map(|last| timestamp - last);
                self.last_beat = Some(timestamp);
                self.beats.push(timestamp);
                tracing::debug!(timestamp, ?interval, "beat confirmed");
                Some(BeatEvent {
                    timestamp,
                    interval,
                })
            }
        }
    }

    /// Returns the current detector state.
    pub fn state(&self) -> DetectorState {
        self.state
    }

    /// Returns `(baseline, peak, trough)` for diagnostics and display.
    pub fn envelope(&self) -> (f64, f64, f64) {
        (self.baseline, self.peak, self.trough)
    }

    /// Returns all confirmed beat timestamps this session.
    pub fn beats(&self) -> &[f64] {
        &self.beats
    }

    /// Returns the timestamp of the last confirmed beat.
    pub fn last_beat(&self) -> Option<f64> {
        self.last_beat
    }

    /// Returns the most recent rejection, if the last sample or
    /// candidate was rejected.
    pub fn last_rejection(&self) -> Option<SampleRejection> {
        self.last_rejection
    }

    /// Clears envelopes, state, and beat history.
    pub fn reset(&mut self) {
        self.state = DetectorState::Ready;
        self.baseline = 0.0;
        self.peak = 0.0;
        self.trough = 0.0;
        self.primed = false;
        self.last_beat = None;
        self.beats.clear();
        self.last_rejection = None;
    }
}
