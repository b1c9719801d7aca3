//! Frame source abstraction.
//!
//! The camera and face-cropping stage live outside the core; this module
//! defines the boundary trait plus a synthetic source that emits a
//! pulsing face region for demos and tests.

use super::{CaptureConfig, FrameBuffer};
use thiserror::Error;

/// Errors that can occur while acquiring frames.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No capture device matched the configured identifier.
    #[error("capture device not found: {0}")]
    DeviceNotFound(String),
    /// The device exists but could not be opened.
    #[error("failed to open capture device: {0}")]
    OpenFailed(String),
    /// The device rejected the requested configuration.
    #[error("failed to configure capture device: {0}")]
    ConfigFailed(String),
    /// A frame read failed after the device was opened.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    /// `capture` was called before `open`.
    #[error("capture source not initialized")]
    NotInitialized,
}

/// Trait for sources of cropped face-region frames.
///
/// Implementations must deliver square frames at a constant resolution
/// with monotonically increasing timestamps for the whole session.
pub trait FrameSource {
    /// Opens and initializes the source with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CaptureError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<FrameBuffer, CaptureError>;

    /// Checks if the source is currently open.
    fn is_open(&self) -> bool;

    /// Closes the source and releases resources.
    fn close(&mut self);
}

/// Green-channel offsets applied at the start of each simulated beat.
/// Alternating the offset yields six consecutive high-difference frames
/// followed by a quiet rest, a sharp systolic burst the differencer
/// sees once per beat.
const BEAT_BURST: [i16; 5] = [40, 0, 40, 0, 40];

/// Synthetic frame source that renders a static skin-tone region with a
/// periodic green-channel burst in its center.
///
/// The burst repeats at a configurable heart rate and covers roughly a
/// ninth of the frame, so the differencer sees a localized motion event
/// once per beat rather than global motion.
#[derive(Debug)]
pub struct MockFaceCamera {
    config: Option<CaptureConfig>,
    sequence: u64,
    bpm: f64,
}

impl MockFaceCamera {
    /// Creates a source simulating the default 75 BPM heart rate.
    pub fn new() -> Self {
        Self::with_bpm(75.0)
    }

    /// Creates a source simulating the given heart rate.
    pub fn with_bpm(bpm: f64) -> Self {
        Self {
            config: None,
            sequence: 0,
            bpm,
        }
    }

    /// Green offset for the given frame index within the beat cycle.
    fn green_offset(&self, frame_index: u64, fps: u32) -> i16 {
        let cycle_frames = ((fps as f64) * 60.0 / self.bpm).round() as u64;
        let phase = (frame_index % cycle_frames.max(1)) as usize;
        BEAT_BURST.get(phase).copied().unwrap_or(0)
    }
}

impl Default for MockFaceCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for MockFaceCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CaptureError> {
        config
            .validate()
            .map_err(|e| CaptureError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!(bpm = self.bpm, "MockFaceCamera opened: {:?}", config);
        Ok(())
    }

    fn capture(&mut self) -> Result<FrameBuffer, CaptureError> {
        let config = self.config.as_ref().ok_or(CaptureError::NotInitialized)?;

        let res = config.resolution as usize;
        let offset = self.green_offset(self.sequence, config.fps);

        // Pulsing patch: centered square a third of the frame wide.
        let patch = res / 3;
        let patch_start = (res - patch) / 2;
        let patch_end = patch_start + patch;

        let mut pixels = Vec::with_capacity(res * res * 3);
        for y in 0..res {
            for x in 0..res {
                // Static skin tone with a fixed spatial texture so that
                // only the pulse patch produces temporal differences.
                let texture = ((x * 7 + y * 13) % 9) as u8;
                let in_patch =
                    x >= patch_start && x < patch_end && y >= patch_start && y < patch_end;
                let green = if in_patch {
                    (120i16 + texture as i16 + offset).clamp(0, 255) as u8
                } else {
                    120 + texture
                };
                pixels.push(180 + texture / 2);
                pixels.push(green);
                pixels.push(100 + texture);
            }
        }

        let timestamp = self.sequence as f64 / config.fps as f64;
        let frame = FrameBuffer::new(pixels, config.resolution, timestamp, self.sequence);
        self.sequence += 1;
        Ok(frame)
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("MockFaceCamera closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_camera_lifecycle() {
        let mut camera = MockFaceCamera::new();
        let config = CaptureConfig::default();

        assert!(!camera.is_open());

        camera.open(&config).unwrap();
        assert!(camera.is_open());

        let frame = camera.capture().unwrap();
        assert!(frame.is_valid());
        assert_eq!(frame.sequence(), 0);

        let frame2 = camera.capture().unwrap();
        assert_eq!(frame2.sequence(), 1);
        assert!(frame2.timestamp() > frame.timestamp());

        camera.close();
        assert!(!camera.is_open());
    }

    #[test]
    fn test_capture_without_open() {
        let mut camera = MockFaceCamera::new();
        assert!(matches!(
            camera.capture(),
            Err(CaptureError::NotInitialized)
        ));
    }

    #[test]
    fn test_burst_is_periodic() {
        let camera = MockFaceCamera::with_bpm(75.0);
        // 30 fps at 75 BPM = 24 frames per cycle.
        assert_eq!(camera.green_offset(0, 30), BEAT_BURST[0]);
        assert_eq!(camera.green_offset(24, 30), BEAT_BURST[0]);
        assert_eq!(camera.green_offset(12, 30), 0);
    }
}
