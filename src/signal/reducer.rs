//! Reduction of motion energy to a smoothed scalar pulse signal.

use super::{lerp, PulseSample};
use crate::capture::PulseConfig;

/// Reduces per-frame motion energy to one normalized, smoothed scalar.
///
/// Normalization divides by the maximum possible map intensity
/// (`R * R * 255`) so the output lives in roughly `[0, 1]` regardless
/// of resolution. A first-order low-pass then suppresses frame-level
/// jitter before beat detection.
pub struct PulseReducer {
    smoothed: f64,
    normalization: f64,
    smoothing: f64,
}

impl PulseReducer {
    /// Creates a reducer for the given square resolution.
    pub fn new(resolution: u32, config: &PulseConfig) -> Self {
        let pixel_count = f64::from(resolution) * f64::from(resolution);
        Self {
            smoothed: 0.0,
            normalization: 1.0 / (pixel_count * 255.0),
            smoothing: config.pulse_smoothing,
        }
    }

    /// Folds one frame's motion energy into the smoothed pulse signal.
    pub fn reduce(&mut self, motion_energy: f64, timestamp: f64) -> PulseSample {
        let raw = motion_energy * self.normalization;
        self.smoothed = lerp(self.smoothed, raw, 1.0 - self.smoothing);
        PulseSample {
            value: self.smoothed,
            timestamp,
        }
    }

    /// Returns the current smoothed value.
    pub fn value(&self) -> f64 {
        self.smoothed
    }

    /// Resets the smoothed signal to zero.
    pub fn reset(&mut self) {
        self.smoothed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reducer() -> PulseReducer {
        PulseReducer::new(64, &PulseConfig::default())
    }

    #[test]
    fn test_zero_energy_stays_zero() {
        let mut r = reducer();
        let sample = r.reduce(0.0, 0.0);
        assert_eq!(sample.value, 0.0);
    }

    #[test]
    fn test_full_energy_normalizes_toward_one() {
        let mut r = reducer();
        let max_energy = 64.0 * 64.0 * 255.0;
        // Constant max input converges on 1.0 through the low-pass.
        let mut value = 0.0;
        for i in 0..200 {
            value = r.reduce(max_energy, i as f64 / 30.0).value;
        }
        assert!(value > 0.99 && value <= 1.0);
    }

    #[test]
    fn test_smoothing_limits_step_response() {
        let mut r = reducer();
        let max_energy = 64.0 * 64.0 * 255.0;
        let sample = r.reduce(max_energy, 0.0);
        // One step only moves (1 - pulse_smoothing) of the way.
        let expected = 1.0 - PulseConfig::default().pulse_smoothing;
        assert!((sample.value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_value_never_negative() {
        let mut r = reducer();
        r.reduce(1000.0, 0.0);
        for i in 1..500 {
            let sample = r.reduce(0.0, i as f64 / 30.0);
            assert!(sample.value >= 0.0);
        }
    }

    #[test]
    fn test_reset() {
        let mut r = reducer();
        r.reduce(1000.0, 0.0);
        assert!(r.value() > 0.0);
        r.reset();
        assert_eq!(r.value(), 0.0);
    }
}
