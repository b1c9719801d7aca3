//! Metrics collection and registry.

use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

use crate::cluster::Confidence;
use crate::pipeline::PulsePipeline;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Registration or encoding failed inside the prometheus crate.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of pipeline state for a metrics update.
#[derive(Debug, Clone, Default)]
pub struct PulseSnapshot {
    /// Frames processed this session.
    pub frames_processed: u64,
    /// Beats confirmed this session.
    pub beat_count: u64,
    /// Motion energy of the last frame.
    pub motion_energy: f64,
    /// Smoothed pulse value of the last frame.
    pub pulse_value: f64,
    /// Number of competing BPM patterns.
    pub pattern_count: usize,
    /// Reported BPM of the top pattern, if any.
    pub bpm: Option<u32>,
    /// Confidence tier of the report, if any.
    pub confidence: Option<Confidence>,
    /// Interval spread of the top pattern, if any.
    pub variability: Option<f64>,
}

impl PulseSnapshot {
    /// Captures the current state of a pipeline.
    pub fn from_pipeline(pipeline: &PulsePipeline) -> Self {
        let report = pipeline.report();
        Self {
            frames_processed: pipeline.frames_processed(),
            beat_count: pipeline.beats().len() as u64,
            motion_energy: pipeline.motion_energy(),
            pulse_value: pipeline.latest().map(|l| l.value).unwrap_or(0.0),
            pattern_count: pipeline.patterns().len(),
            bpm: report.as_ref().map(|r| r.bpm),
            confidence: report.as_ref().map(|r| r.confidence),
            variability: report.as_ref().map(|r| r.variability),
        }
    }
}

/// Numeric encoding of the confidence tier for the gauge.
fn confidence_tier(confidence: Option<Confidence>) -> i64 {
    match confidence {
        None => 0,
        Some(Confidence::Low(_)) => 1,
        Some(Confidence::Medium) => 2,
        Some(Confidence::High) => 3,
    }
}

/// Prometheus metrics registry for pulse monitoring.
pub struct MetricsRegistry {
    registry: Registry,

    frames_total: IntCounter,
    beats_total: IntCounter,
    motion_energy: Gauge,
    pulse_value: Gauge,
    pattern_count: IntGauge,
    reported_bpm: IntGauge,
    confidence_tier: IntGauge,
    variability_seconds: Gauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all pulse metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let frames_total = IntCounter::new(
            "face_pulse_frames_total",
            "Total frames processed this session",
        )?;
        let beats_total = IntCounter::new(
            "face_pulse_beats_total",
            "Total beats confirmed this session",
        )?;
        let motion_energy = Gauge::new(
            "face_pulse_motion_energy",
            "Motion energy contributed by the last frame",
        )?;
        let pulse_value = Gauge::new(
            "face_pulse_value",
            "Smoothed normalized pulse value of the last frame",
        )?;
        let pattern_count = IntGauge::new(
            "face_pulse_pattern_count",
            "Number of competing BPM hypothesis patterns",
        )?;
        let reported_bpm = IntGauge::new(
            "face_pulse_reported_bpm",
            "BPM of the best-supported pattern (0 = no data)",
        )?;
        let confidence_tier = IntGauge::new(
            "face_pulse_confidence_tier",
            "Report confidence (0 none, 1 low, 2 medium, 3 high)",
        )?;
        let variability_seconds = Gauge::new(
            "face_pulse_variability_seconds",
            "Interval spread (max - min) of the top pattern",
        )?;

        registry.register(Box::new(frames_total.clone()))?;
        registry.register(Box::new(beats_total.clone()))?;
        registry.register(Box::new(motion_energy.clone()))?;
        registry.register(Box::new(pulse_value.clone()))?;
        registry.register(Box::new(pattern_count.clone()))?;
        registry.register(Box::new(reported_bpm.clone()))?;
        registry.register(Box::new(confidence_tier.clone()))?;
        registry.register(Box::new(variability_seconds.clone()))?;

        Ok(Self {
            registry,
            frames_total,
            beats_total,
            motion_energy,
            pulse_value,
            pattern_count,
            reported_bpm,
            confidence_tier,
            variability_seconds,
        })
    }

    /// Updates all metrics from a pipeline snapshot.
    pub fn update(&self, snapshot: &PulseSnapshot) {
        // Counters advance by the difference from the last snapshot.
        let seen_frames = self.frames_total.get();
        if snapshot.frames_processed > seen_frames {
            self.frames_total.inc_by(snapshot.frames_processed - seen_frames);
        }
        let seen_beats = self.beats_total.get();
        if snapshot.beat_count > seen_beats {
            self.beats_total.inc_by(snapshot.beat_count - seen_beats);
        }

        self.motion_energy.set(snapshot.motion_energy);
        self.pulse_value.set(snapshot.pulse_value);
        self.pattern_count.set(snapshot.pattern_count as i64);
        self.reported_bpm
            .set(snapshot.bpm.map(i64::from).unwrap_or(0));
        self.confidence_tier.set(confidence_tier(snapshot.confidence));
        self.variability_seconds
            .set(snapshot.variability.unwrap_or(0.0));
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
