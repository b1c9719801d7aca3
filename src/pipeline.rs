//! Frame-driven pulse pipeline.
//!
//! One [`PulsePipeline::tick`] per video frame runs the whole chain in
//! strict sequence: differencing and accumulation, reduction to the
//! smoothed pulse scalar, beat detection, and interval clustering. All
//! state is session-scoped and mutated only inside a tick, so a
//! presentation layer can read safely between ticks.

use crate::capture::{CaptureConfig, ConfigError, FrameBuffer, PulseConfig};
use crate::cluster::{BpmReport, Pattern, PatternClusterer};
use crate::detect::{BeatDetector, BeatEvent, SampleRejection};
use crate::motion::{AccumulationMap, MotionAccumulator};
use crate::signal::{PulseHistory, PulseReducer, PulseSample};

/// The most recent sample, annotated for waveform display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameAnnotation {
    /// Smoothed pulse value of the latest frame.
    pub value: f64,
    /// Timestamp of the latest frame, in seconds.
    pub timestamp: f64,
    /// True if the latest frame confirmed a beat.
    pub beat: bool,
}

/// Result of processing one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickResult {
    /// The smoothed pulse sample produced this frame.
    pub sample: PulseSample,
    /// The beat confirmed this frame, if any.
    pub beat: Option<BeatEvent>,
}

/// The complete motion-gated pulse extraction pipeline for one session.
///
/// Owns all four stages plus the display history. Buffers are sized for
/// the session resolution at construction; a resolution change requires
/// a new pipeline.
pub struct PulsePipeline {
    accumulator: MotionAccumulator,
    reducer: PulseReducer,
    history: PulseHistory,
    detector: BeatDetector,
    clusterer: PatternClusterer,
    latest: Option<FrameAnnotation>,
    last_energy: f64,
    frames_processed: u64,
}

impl PulsePipeline {
    /// Creates a pipeline for the given capture resolution and tuning.
    pub fn new(capture: &CaptureConfig, config: &PulseConfig) -> Result<Self, ConfigError> {
        capture.validate()?;
        config.validate()?;
        Ok(Self {
            accumulator: MotionAccumulator::new(capture.resolution, config),
            reducer: PulseReducer::new(capture.resolution, config),
            history: PulseHistory::new(config.history_len),
            detector: BeatDetector::new(config),
            clusterer: PatternClusterer::new(config),
            latest: None,
            last_energy: 0.0,
            frames_processed: 0,
        })
    }

    /// Processes one frame through the whole chain.
    pub fn tick(&mut self, frame: FrameBuffer) -> TickResult {
        let timestamp = frame.timestamp();

        let energy = self.accumulator.tick(frame);
        let sample = self.reducer.reduce(energy, timestamp);
        self.history.push(sample);

        let beat = self.detector.register(sample.value, sample.timestamp);
        if let Some(event) = beat {
            if let Some(interval) = event.interval {
                self.clusterer.add_interval(interval);
            }
        }

        self.latest = Some(FrameAnnotation {
            value: sample.value,
            timestamp: sample.timestamp,
            beat: beat.is_some(),
        });
        self.last_energy = energy;
        self.frames_processed += 1;

        TickResult { sample, beat }
    }

    /// Returns the accumulation map for visualization.
    pub fn accumulation_map(&self) -> &AccumulationMap {
        self.accumulator.map()
    }

    /// Returns the circular pulse history for waveform display.
    pub fn history(&self) -> &PulseHistory {
        &self.history
    }

    /// Returns the latest annotated sample.
    pub fn latest(&self) -> Option<FrameAnnotation> {
        self.latest
    }

    /// Returns the BPM patterns ranked by support.
    pub fn patterns(&self) -> &[Pattern] {
        self.clusterer.patterns()
    }

    /// Returns the current BPM report, if any beats clustered yet.
    pub fn report(&self) -> Option<BpmReport> {
        self.clusterer.report()
    }

    /// Returns all confirmed beat timestamps this session.
    pub fn beats(&self) -> &[f64] {
        self.detector.beats()
    }

    /// Returns the most recent sample/candidate rejection, if any.
    pub fn last_rejection(&self) -> Option<SampleRejection> {
        self.detector.last_rejection()
    }

    /// Returns the motion energy of the last processed frame.
    pub fn motion_energy(&self) -> f64 {
        self.last_energy
    }

    /// Returns the number of frames processed this session.
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Resets the whole session atomically: accumulation map, pulse
    /// history, detector envelopes and beats, and all patterns.
    pub fn reset(&mut self) {
        self.accumulator.reset();
        self.reducer.reset();
        self.history.clear();
        self.detector.reset();
        self.clusterer.reset();
        self.latest = None;
        self.last_energy = 0.0;
        self.frames_processed = 0;
        tracing::info!("pulse pipeline reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{FrameSource, MockFaceCamera};
    use crate::cluster::Confidence;

    fn pipeline() -> PulsePipeline {
        PulsePipeline::new(&CaptureConfig::default(), &PulseConfig::default()).unwrap()
    }

    fn run_mock(pipeline: &mut PulsePipeline, bpm: f64, frames: usize) {
        let mut camera = MockFaceCamera::with_bpm(bpm);
        camera.open(&CaptureConfig::default()).unwrap();
        for _ in 0..frames {
            pipeline.tick(camera.capture().unwrap());
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PulseConfig::default();
        config.relative_threshold = 0.9;
        assert!(PulsePipeline::new(&CaptureConfig::default(), &config).is_err());
    }

    #[test]
    fn test_end_to_end_75_bpm() {
        let mut p = pipeline();
        // 20 seconds of synthetic 75 BPM footage at 30 fps. The adaptive
        // baseline needs a few seconds to settle before beats confirm.
        run_mock(&mut p, 75.0, 600);

        assert!(p.beats().len() >= 6, "beats = {}", p.beats().len());

        let report = p.report().expect("expected a BPM report");
        assert!(
            (74..=76).contains(&report.bpm),
            "reported {} BPM",
            report.bpm
        );
        assert_eq!(report.confidence, Confidence::High);
        assert!(report.variability <= 0.1);
    }

    #[test]
    fn test_refractory_holds_end_to_end() {
        let mut p = pipeline();
        run_mock(&mut p, 75.0, 600);

        for pair in p.beats().windows(2) {
            assert!(pair[1] - pair[0] >= 0.375);
        }
    }

    #[test]
    fn test_patterns_only_hold_valid_intervals() {
        let mut p = pipeline();
        run_mock(&mut p, 75.0, 600);

        for pattern in p.patterns() {
            for &ibi in pattern.intervals() {
                assert!((0.375..=1.0).contains(&ibi), "ibi = {ibi}");
            }
        }
    }

    #[test]
    fn test_presentation_surface_populated() {
        let mut p = pipeline();
        run_mock(&mut p, 75.0, 60);

        assert!(p.accumulation_map().total_intensity() > 0);
        assert!(!p.history().is_empty());
        let latest = p.latest().unwrap();
        assert!(latest.value >= 0.0);
        assert_eq!(p.frames_processed(), 60);
    }

    #[test]
    fn test_reset_completeness() {
        let mut p = pipeline();
        run_mock(&mut p, 75.0, 600);
        assert!(p.report().is_some());

        p.reset();

        assert!(p.report().is_none(), "BPM must revert to no-data");
        assert!(p.patterns().is_empty());
        assert!(p.beats().is_empty());
        assert!(p.history().is_empty());
        assert!(p.latest().is_none());
        assert_eq!(p.accumulation_map().total_intensity(), 0);
        assert_eq!(p.frames_processed(), 0);
    }

    #[test]
    fn test_reset_allows_fresh_session() {
        let mut p = pipeline();
        run_mock(&mut p, 75.0, 600);
        p.reset();

        // A new drive after reset behaves like a fresh session.
        run_mock(&mut p, 75.0, 600);
        assert!(p.beats().len() >= 6);
    }
}
