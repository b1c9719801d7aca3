//! Motion-gated frame differencing and trail accumulation.
//!
//! Each tick compares the current frame against the previous one and
//! folds the per-pixel differences into a decaying intensity map. Small
//! localized changes (blood-volume pulsation) leave a trailing glow;
//! frames where too much of the region moved at once are treated as
//! gross motion and suppressed entirely.

use super::AccumulationMap;
use crate::capture::{FrameBuffer, PulseConfig};

/// Weight applied to the green channel difference.
///
/// Green is the most sensitive channel to blood-volume absorption, so
/// it dominates the per-pixel difference score.
const GREEN_WEIGHT: u32 = 4;

/// Builds the decaying motion accumulation map and reports per-frame
/// motion energy.
///
/// Owns both frame buffers; each tick moves the incoming frame into the
/// `previous` slot rather than copying it.
pub struct MotionAccumulator {
    map: AccumulationMap,
    previous: Option<FrameBuffer>,
    /// Per-pixel difference scores, reused across ticks.
    diff_scratch: Vec<u16>,
    motion_sensitivity: u32,
    max_moving_percent: f64,
    big_move_fade: f64,
    trail_fade: f64,
}

impl MotionAccumulator {
    /// Creates an accumulator for the given square resolution.
    pub fn new(resolution: u32, config: &PulseConfig) -> Self {
        let pixel_count = (resolution as usize) * (resolution as usize);
        Self {
            map: AccumulationMap::new(resolution),
            previous: None,
            diff_scratch: vec![0; pixel_count],
            motion_sensitivity: config.motion_sensitivity,
            max_moving_percent: config.max_moving_percent,
            big_move_fade: config.big_move_fade,
            trail_fade: config.trail_fade,
        }
    }

    /// Processes one frame and returns the motion energy it contributed.
    ///
    /// The first frame of a session only primes the differencer and
    /// contributes zero energy. Suppressed (big-motion) frames also
    /// contribute exactly zero.
    pub fn tick(&mut self, frame: FrameBuffer) -> f64 {
        let prev = match self.previous.take() {
            Some(prev) => prev,
            None => {
                self.previous = Some(frame);
                return 0.0;
            }
        };

        let pixel_count = frame.pixel_count();
        let mut moving_count = 0usize;

        for i in 0..pixel_count {
            let (cr, cg, cb) = frame.rgb(i);
            let (pr, pg, pb) = prev.rgb(i);
            let diff = GREEN_WEIGHT * u32::from(cg.abs_diff(pg))
                + u32::from(cr.abs_diff(pr))
                + u32::from(cb.abs_diff(pb));
            self.diff_scratch[i] = diff as u16;
            if diff > self.motion_sensitivity {
                moving_count += 1;
            }
        }

        let moving_percent = moving_count as f64 / pixel_count as f64 * 100.0;

        let energy = if moving_percent > self.max_moving_percent {
            // Global motion (head turn, camera shake): fade hard and add
            // nothing, so artifacts never enter the pulse signal.
            self.map.fade(self.big_move_fade);
            tracing::debug!(
                moving_percent = format!("{:.1}", moving_percent),
                "big motion suppressed"
            );
            0.0
        } else {
            self.map.fade(self.trail_fade);
            let mut energy = 0.0;
            for (i, &diff) in self.diff_scratch.iter().enumerate() {
                let diff = u32::from(diff);
                if diff > self.motion_sensitivity {
                    let boost = (diff * self.motion_sensitivity / 5).min(255) as u8;
                    // The cell keeps the brighter of trail and boost,
                    // giving a glow that trails rather than saturates.
                    self.map.raise(i, boost);
                    energy += f64::from(boost);
                }
            }
            energy
        };

        self.previous = Some(frame);
        energy
    }

    /// Returns a read-only view of the accumulation map.
    pub fn map(&self) -> &AccumulationMap {
        &self.map
    }

    /// Returns true once a previous frame is held.
    pub fn is_primed(&self) -> bool {
        self.previous.is_some()
    }

    /// Clears the map and forgets the previous frame.
    pub fn reset(&mut self) {
        self.map.clear();
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RES: u32 = 16;

    fn config() -> PulseConfig {
        PulseConfig::default()
    }

    fn flat_frame(level: u8, seq: u64) -> FrameBuffer {
        FrameBuffer::new(
            vec![level; (RES * RES * 3) as usize],
            RES,
            seq as f64 / 30.0,
            seq,
        )
    }

    /// Frame where the first `n` pixels have a brighter green channel.
    fn frame_with_motion(n: usize, delta: u8, seq: u64) -> FrameBuffer {
        let mut pixels = vec![100u8; (RES * RES * 3) as usize];
        for i in 0..n {
            pixels[i * 3 + 1] = 100 + delta;
        }
        FrameBuffer::new(pixels, RES, seq as f64 / 30.0, seq)
    }

    #[test]
    fn test_first_frame_contributes_nothing() {
        let mut acc = MotionAccumulator::new(RES, &config());
        assert!(!acc.is_primed());

        let energy = acc.tick(flat_frame(100, 0));
        assert_eq!(energy, 0.0);
        assert!(acc.is_primed());
        assert_eq!(acc.map().total_intensity(), 0);
    }

    #[test]
    fn test_identical_frames_zero_energy() {
        let mut acc = MotionAccumulator::new(RES, &config());
        acc.tick(flat_frame(100, 0));
        let energy = acc.tick(flat_frame(100, 1));
        assert_eq!(energy, 0.0);
    }

    #[test]
    fn test_localized_motion_boosts_cells() {
        let mut acc = MotionAccumulator::new(RES, &config());
        // 16 of 256 pixels moving = 6.25%, below the 20% suppression cap.
        acc.tick(flat_frame(100, 0));
        let energy = acc.tick(frame_with_motion(16, 30, 1));

        // diff = 4*30 = 120, boost = min(120*20/5, 255) = 255.
        assert_eq!(energy, 16.0 * 255.0);
        assert_eq!(acc.map().get(0), 255);
        assert_eq!(acc.map().get(16), 0);
    }

    #[test]
    fn test_big_motion_suppressed() {
        let mut acc = MotionAccumulator::new(RES, &config());
        // Prime and deposit some trail first.
        acc.tick(flat_frame(100, 0));
        acc.tick(frame_with_motion(16, 30, 1));
        let before: Vec<u8> = acc.map().cells().to_vec();

        // Every pixel jumps: 100% moving, way past the cap.
        let energy = acc.tick(flat_frame(200, 2));
        assert_eq!(energy, 0.0);

        // Every non-zero cell strictly decreased.
        for (cell, prev) in acc.map().cells().iter().zip(before.iter()) {
            if *prev > 0 {
                assert!(cell < prev);
            } else {
                assert_eq!(*cell, 0);
            }
        }
    }

    #[test]
    fn test_zero_motion_decays_to_zero() {
        let mut acc = MotionAccumulator::new(RES, &config());
        acc.tick(flat_frame(100, 0));
        acc.tick(frame_with_motion(16, 30, 1));

        let mut last = acc.map().total_intensity();
        assert!(last > 0);

        // Repeating the same frame produces zero diffs from here on.
        let still = frame_with_motion(16, 30, 2);
        for _ in 0..600 {
            let energy = acc.tick(still.clone());
            assert_eq!(energy, 0.0);
            let total = acc.map().total_intensity();
            assert!(total <= last);
            last = total;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut acc = MotionAccumulator::new(RES, &config());
        acc.tick(flat_frame(100, 0));
        acc.tick(frame_with_motion(16, 30, 1));
        assert!(acc.map().total_intensity() > 0);

        acc.reset();
        assert!(!acc.is_primed());
        assert_eq!(acc.map().total_intensity(), 0);
    }

    proptest! {
        /// With constant input after a motion event, total map intensity
        /// never increases and eventually reaches zero.
        #[test]
        fn prop_decay_is_monotonic(delta in 10u8..120, moving in 1usize..32) {
            let mut acc = MotionAccumulator::new(RES, &config());
            acc.tick(flat_frame(100, 0));
            acc.tick(frame_with_motion(moving, delta, 1));

            let mut last = acc.map().total_intensity();
            let still = frame_with_motion(moving, delta, 2);
            for _ in 0..400 {
                let energy = acc.tick(still.clone());
                prop_assert_eq!(energy, 0.0);
                let total = acc.map().total_intensity();
                prop_assert!(total <= last);
                last = total;
            }
            prop_assert_eq!(last, 0);
        }
    }
}
