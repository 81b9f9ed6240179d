//! Image dimensions and size utilities

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height of an image
///
/// Arrays are indexed (row, col) = (y, x), so an array of shape
/// (height, width) has size `width x height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    /// Image width in pixels (FITS NAXIS1, array columns)
    pub width: usize,
    /// Image height in pixels (FITS NAXIS2, array rows)
    pub height: usize,
}

impl ImageSize {
    pub fn from_width_height(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Size of an existing array view
    pub fn of_view<T>(view: &ArrayView2<T>) -> Self {
        let (height, width) = view.dim();
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Geometric midpoint as (x, y) = (width * 0.5, height * 0.5)
    ///
    /// Radiative-transfer model images carry no reference pixel, so their disk
    /// center is taken here.
    pub fn midpoint(&self) -> (f64, f64) {
        (self.width as f64 * 0.5, self.height as f64 * 0.5)
    }

    /// True if the (row, col) index lies inside the image
    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
