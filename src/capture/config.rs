//! Pipeline and capture configuration.
//!
//! Every tuning constant of the pulse pipeline is a named, documented
//! field rather than an embedded magic number. Defaults preserve the
//! behavior the pipeline was tuned with; validation enforces the
//! documented ranges.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning parameters for the pulse extraction pipeline.
///
/// All fields are externally settable. Ranges are enforced by
/// [`PulseConfig::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseConfig {
    /// Per-pixel difference threshold for a pixel to count as moving (1-100).
    pub motion_sensitivity: u32,
    /// Percentage of moving pixels above which the frame is treated as
    /// global motion and suppressed (5-50).
    pub max_moving_percent: f64,
    /// Fade factor applied to every accumulation cell on a suppressed
    /// frame (0.05-0.5).
    pub big_move_fade: f64,
    /// Slow per-frame fade factor for the accumulation trail.
    pub trail_fade: f64,
    /// First-order low-pass constant for the pulse scalar; higher values
    /// smooth more (0 keeps the raw signal).
    pub pulse_smoothing: f64,
    /// Lerp rate at which the detector baseline tracks the signal midline.
    pub auto_center_speed: f64,
    /// Brightness threshold consumed by the external sensitivity
    /// auto-tune collaborator (1-255). Carried here so one config file
    /// covers the whole surface; the core never reads it.
    pub white_threshold: u8,
    /// Upper plausibility bound for a pulse sample (0.05-0.15); samples
    /// above are rejected as saturation.
    pub max_plausible_pulse: f64,
    /// Lower plausibility bound for a pulse sample (0.0005-0.002); samples
    /// below are rejected as no-signal.
    pub min_plausible_pulse: f64,
    /// Hysteresis threshold as a fraction of the peak-trough range (0.3-0.6).
    pub relative_threshold: f64,
    /// Refractory period between confirmed beats in seconds (0.35-0.45).
    pub min_time_between_beats: f64,
    /// Clustering tolerance as a percentage of the incoming interval (15-30).
    pub tolerance_percent: f64,
    /// Beats required in a pattern for a high-confidence lock (4-10).
    pub min_beats_for_lock: u32,
    /// Maximum interval spread (max - min, seconds) for a pattern to be
    /// trusted (0.15-0.35).
    pub max_allowed_variability: f64,
    /// Capacity of the circular pulse history kept for display.
    pub history_len: usize,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            motion_sensitivity: 20,
            max_moving_percent: 20.0,
            big_move_fade: 0.2,
            trail_fade: 0.02,
            pulse_smoothing: 0.9,
            auto_center_speed: 0.008,
            white_threshold: 200,
            max_plausible_pulse: 0.1,
            min_plausible_pulse: 0.001,
            relative_threshold: 0.45,
            min_time_between_beats: 0.375,
            tolerance_percent: 20.0,
            min_beats_for_lock: 6,
            max_allowed_variability: 0.25,
            history_len: 256,
        }
    }
}

impl PulseConfig {
    /// Validates all fields against their documented ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.motion_sensitivity) {
            return Err(ConfigError::OutOfRange("motion_sensitivity"));
        }
        if !(5.0..=50.0).contains(&self.max_moving_percent) {
            return Err(ConfigError::OutOfRange("max_moving_percent"));
        }
        if !(0.05..=0.5).contains(&self.big_move_fade) {
            return Err(ConfigError::OutOfRange("big_move_fade"));
        }
        if !(0.0..1.0).contains(&self.trail_fade) {
            return Err(ConfigError::OutOfRange("trail_fade"));
        }
        if !(0.0..1.0).contains(&self.pulse_smoothing) {
            return Err(ConfigError::OutOfRange("pulse_smoothing"));
        }
        if !(0.0..1.0).contains(&self.auto_center_speed) {
            return Err(ConfigError::OutOfRange("auto_center_speed"));
        }
        if self.white_threshold == 0 {
            return Err(ConfigError::OutOfRange("white_threshold"));
        }
        if !(0.05..=0.15).contains(&self.max_plausible_pulse) {
            return Err(ConfigError::OutOfRange("max_plausible_pulse"));
        }
        if !(0.0005..=0.002).contains(&self.min_plausible_pulse) {
            return Err(ConfigError::OutOfRange("min_plausible_pulse"));
        }
        if !(0.3..=0.6).contains(&self.relative_threshold) {
            return Err(ConfigError::OutOfRange("relative_threshold"));
        }
        if !(0.35..=0.45).contains(&self.min_time_between_beats) {
            return Err(ConfigError::OutOfRange("min_time_between_beats"));
        }
        if !(15.0..=30.0).contains(&self.tolerance_percent) {
            return Err(ConfigError::OutOfRange("tolerance_percent"));
        }
        if !(4..=10).contains(&self.min_beats_for_lock) {
            return Err(ConfigError::OutOfRange("min_beats_for_lock"));
        }
        if !(0.15..=0.35).contains(&self.max_allowed_variability) {
            return Err(ConfigError::OutOfRange("max_allowed_variability"));
        }
        if self.history_len == 0 {
            return Err(ConfigError::OutOfRange("history_len"));
        }
        Ok(())
    }
}

/// Configuration for the frame source.
///
/// The face-cropping collaborator delivers square frames at a fixed
/// resolution for the whole session; resolution changes require a
/// session restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Camera device index or identifier.
    pub device_id: u32,
    /// Edge length of the cropped square face region in pixels.
    pub resolution: u32,
    /// Target frames per second.
    pub fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            resolution: 64,
            fps: 30,
        }
    }
}

impl CaptureConfig {
    /// Validates the capture parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution == 0 {
            return Err(ConfigError::InvalidResolution);
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// A tuning field is outside its documented range.
    #[error("configuration field out of range: {0}")]
    OutOfRange(&'static str),
    /// The frame resolution is zero.
    #[error("invalid frame resolution")]
    InvalidResolution,
    /// The frame rate is zero or implausibly high.
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    /// Reading the config file from disk failed.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Pipeline tuning parameters.
    #[serde(default)]
    pub pulse: PulseConfig,
    /// Frame source parameters.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Demo binary output behavior.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration for the demo binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Run continuously (true) or process a fixed number of frames (false).
    pub continuous: bool,
    /// Number of frames to process if not continuous.
    pub frame_count: u32,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            frame_count: 300,
            metrics_port: 9090,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.pulse.validate()?;
        config.capture.validate()?;
        Ok(config)
    }
}
