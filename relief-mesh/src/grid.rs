//! Immutable 2D intensity sample grid.

use crate::error::{ReliefError, ReliefResult};

/// A 2D grid of intensity samples (0-255), row-major.
///
/// This is the builder's input boundary: image decoding happens
/// upstream, and the decoded pixels arrive here as a plain grid.
/// The grid is immutable once constructed; processing steps
/// (resampling, tone collapse, padding) produce new grids.
///
/// # Example
///
/// ```
/// use relief_mesh::SampleGrid;
///
/// let grid = SampleGrid::from_samples(vec![0, 64, 128, 255], 2, 2).unwrap();
/// assert_eq!(grid.get(1, 1), 255);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGrid {
    /// Samples in row-major order: `samples[y * width + x]`.
    samples: Vec<u8>,
    width: usize,
    height: usize,
}

impl SampleGrid {
    /// Create a grid from row-major sample data.
    ///
    /// # Errors
    ///
    /// Returns [`ReliefError::GridShape`] when `samples.len()` does
    /// not equal `width * height`.
    pub fn from_samples(samples: Vec<u8>, width: usize, height: usize) -> ReliefResult<Self> {
        if samples.len() != width * height {
            return Err(ReliefError::GridShape {
                len: samples.len(),
                width,
                height,
            });
        }
        Ok(Self {
            samples,
            width,
            height,
        })
    }

    /// Create a grid filled with one value.
    #[must_use]
    pub fn filled(value: u8, width: usize, height: usize) -> Self {
        Self {
            samples: vec![value; width * height],
            width,
            height,
        }
    }

    /// Grid width in samples.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in samples.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// True when either dimension is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics when the coordinates are out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        assert!(x < self.width && y < self.height, "sample out of bounds");
        self.samples[y * self.width + x]
    }

    /// Raw samples in row-major order.
    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Nearest-neighbour resample to the given dimensions.
    ///
    /// Used by the scale-and-fit step; picking the nearest source
    /// sample keeps two-tone grids two-tone.
    ///
    /// # Example
    ///
    /// ```
    /// use relief_mesh::SampleGrid;
    ///
    /// let grid = SampleGrid::filled(80, 8, 8);
    /// let small = grid.resized(4, 2);
    /// assert_eq!(small.width(), 4);
    /// assert_eq!(small.height(), 2);
    /// assert_eq!(small.get(3, 1), 80);
    /// ```
    #[must_use]
    pub fn resized(&self, width: usize, height: usize) -> Self {
        if width == self.width && height == self.height {
            return self.clone();
        }
        if width == 0 || height == 0 || self.is_empty() {
            return Self::filled(0, width, height);
        }

        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            let src_y = y * self.height / height;
            for x in 0..width {
                let src_x = x * self.width / width;
                samples.push(self.samples[src_y * self.width + src_x]);
            }
        }
        Self {
            samples,
            width,
            height,
        }
    }

    /// Map every sample through `f`, producing a new grid.
    #[must_use]
    pub fn map(&self, f: impl Fn(u8) -> u8) -> Self {
        Self {
            samples: self.samples.iter().map(|&v| f(v)).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Pad the grid on all four sides with a constant value.
    #[must_use]
    pub fn padded(&self, border: usize, value: u8) -> Self {
        if border == 0 {
            return self.clone();
        }
        let width = self.width + 2 * border;
        let height = self.height + 2 * border;
        let mut samples = vec![value; width * height];
        for y in 0..self.height {
            let dst_start = (y + border) * width + border;
            let src_start = y * self.width;
            samples[dst_start..dst_start + self.width]
                .copy_from_slice(&self.samples[src_start..src_start + self.width]);
        }
        Self {
            samples,
            width,
            height,
        }
    }
}
