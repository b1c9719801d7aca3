//! Motion accumulation over the face region.
//!
//! This module turns raw frame-to-frame pixel differences into a
//! decaying intensity map. The map is the motion-gated proxy for
//! blood-volume pulsation that the rest of the pipeline reduces to a
//! scalar pulse signal.

mod accumulator;

pub use accumulator::MotionAccumulator;

/// Decaying single-channel intensity grid over the face region.
///
/// Cells brighten where recent motion exceeded the sensitivity
/// threshold and fade everywhere else. Exposed read-only to the
/// presentation layer for visualization.
#[derive(Debug, Clone)]
pub struct AccumulationMap {
    cells: Vec<u8>,
    resolution: u32,
}

impl AccumulationMap {
    /// Creates a zeroed map for the given square resolution.
    pub fn new(resolution: u32) -> Self {
        Self {
            cells: vec![0; (resolution as usize) * (resolution as usize)],
            resolution,
        }
    }

    /// Returns the intensity cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Returns the edge length of the square grid.
    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Returns the intensity at the given cell index.
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.cells[index]
    }

    /// Decays every cell by the given fade factor.
    ///
    /// Truncating the scaled value guarantees that a non-zero cell
    /// strictly decreases for any positive fade, so repeated fading
    /// always reaches zero.
    pub fn fade(&mut self, fade: f64) {
        let keep = 1.0 - fade;
        for cell in &mut self.cells {
            *cell = (f64::from(*cell) * keep) as u8;
        }
    }

    /// Raises a cell to the given value if it is brighter than the
    /// current (decayed) content.
    #[inline]
    pub fn raise(&mut self, index: usize, value: u8) {
        if value > self.cells[index] {
            self.cells[index] = value;
        }
    }

    /// Sum of all cell intensities.
    pub fn total_intensity(&self) -> u64 {
        self.cells.iter().map(|&c| u64::from(c)).sum()
    }

    /// Zeroes every cell.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}
