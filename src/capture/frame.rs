//! Frame buffer type for the cropped face region.

/// Number of bytes per RGB pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// A single cropped face-region frame.
///
/// Holds a fixed `R×R` grid of RGB triples plus the metadata the
/// pipeline needs for beat timing. The capture collaborator guarantees
/// a constant resolution and monotonic timestamps for the lifetime of
/// a session.
#[derive(Clone)]
pub struct FrameBuffer {
    /// Interleaved RGB pixel data, `3 * resolution * resolution` bytes.
    pixels: Vec<u8>,
    /// Edge length of the square frame in pixels.
    resolution: u32,
    /// Monotonic capture timestamp in seconds.
    timestamp: f64,
    /// Monotonic sequence number.
    sequence: u64,
}

impl FrameBuffer {
    /// Creates a new frame from interleaved RGB data.
    pub fn new(pixels: Vec<u8>, resolution: u32, timestamp: f64, sequence: u64) -> Self {
        Self {
            pixels,
            resolution,
            timestamp,
            sequence,
        }
    }

    /// Returns the interleaved RGB pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the edge length of the square frame.
    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Returns the capture timestamp in seconds.
    #[inline]
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (`resolution * resolution`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.resolution as usize) * (self.resolution as usize)
    }

    /// Returns the RGB triple at the given pixel index.
    #[inline]
    pub fn rgb(&self, index: usize) -> (u8, u8, u8) {
        let base = index * BYTES_PER_PIXEL;
        (
            self.pixels[base],
            self.pixels[base + 1],
            self.pixels[base + 2],
        )
    }

    /// Validates that the pixel buffer size matches the resolution.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == self.pixel_count() * BYTES_PER_PIXEL
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("resolution", &self.resolution)
            .field("timestamp", &self.timestamp)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let pixels = vec![0u8; 64 * 64 * 3];
        let frame = FrameBuffer::new(pixels, 64, 0.0, 1);

        assert_eq!(frame.resolution(), 64);
        assert_eq!(frame.sequence(), 1);
        assert_eq!(frame.pixel_count(), 4096);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_frame_invalid_size() {
        let pixels = vec![0u8; 100]; // Wrong size
        let frame = FrameBuffer::new(pixels, 64, 0.0, 1);

        assert!(!frame.is_valid());
    }

    #[test]
    fn test_rgb_accessor() {
        let mut pixels = vec![0u8; 4 * 4 * 3];
        pixels[3] = 10; // R of pixel 1
        pixels[4] = 20; // G of pixel 1
        pixels[5] = 30; // B of pixel 1
        let frame = FrameBuffer::new(pixels, 4, 0.0, 1);

        assert_eq!(frame.rgb(1), (10, 20, 30));
    }
}
