//! Pulse signal reduction and history.
//!
//! Collapses the per-frame motion energy into a single smoothed scalar
//! and keeps a fixed-capacity history of recent samples for display.

mod history;
mod reducer;

pub use history::PulseHistory;
pub use reducer::PulseReducer;

/// Linear interpolation between `a` and `b`.
#[inline]
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// One normalized pulse measurement.
///
/// `value` is a normalized motion-intensity sum and is therefore always
/// non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseSample {
    /// Smoothed, normalized pulse value.
    pub value: f64,
    /// Capture timestamp of the originating frame, in seconds.
    pub timestamp: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }
}
