//! Prometheus metrics exporter for pulse pipeline monitoring.
//!
//! Exposes the pipeline's operating state in Prometheus format. The
//! collector is always available; the HTTP endpoint is behind the
//! `metrics` cargo feature.
//!
//! # Metrics Exposed
//!
//! - `face_pulse_frames_total` - Frames processed this session
//! - `face_pulse_beats_total` - Beats confirmed this session
//! - `face_pulse_motion_energy` - Motion energy of the last frame
//! - `face_pulse_value` - Smoothed pulse scalar of the last frame
//! - `face_pulse_pattern_count` - Number of competing BPM hypotheses
//! - `face_pulse_reported_bpm` - BPM of the top pattern (0 = no data)
//! - `face_pulse_confidence_tier` - 0 none, 1 low, 2 medium, 3 high
//! - `face_pulse_variability_seconds` - Interval spread of the top pattern

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, PulseSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig};
