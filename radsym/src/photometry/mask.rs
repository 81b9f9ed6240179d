//! Rasterization of elliptical annuli onto the pixel grid
//!
//! Pixel (row, col) has its center at x = col, y = row. A pixel belongs to an
//! annulus when its center lies inside or on the outer ellipse and strictly
//! outside the inner one. Pixels valued exactly zero or not finite are treated
//! as background and dropped.

use ndarray::ArrayView2;
use shared::ImageSize;

use super::aperture::AnnulusGeometry;

/// Distance from the major axis that still counts as on a collapsed ellipse
const LINE_TOLERANCE: f64 = 1e-9;

/// A pixel selected by an annulus mask
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskedPixel {
    pub row: usize,
    pub col: usize,
    /// Offset from the annulus center along the rows (y)
    pub dy: f64,
    /// Offset from the annulus center along the columns (x)
    pub dx: f64,
    pub value: f64,
}

/// Test whether (u, v), in the ellipse frame, lies inside or on the ellipse
/// with semi-axes `a` (along u) and `b` (along v).
///
/// A zero minor axis degenerates to the segment |u| <= a on the major axis.
fn inside_ellipse(u: f64, v: f64, a: f64, b: f64) -> bool {
    if a > 0.0 && b > 0.0 {
        (u / a).powi(2) + (v / b).powi(2) <= 1.0
    } else if a > 0.0 {
        v.abs() <= LINE_TOLERANCE && u.abs() <= a
    } else {
        u.abs() <= LINE_TOLERANCE && v.abs() <= LINE_TOLERANCE
    }
}

impl AnnulusGeometry {
    /// True if the offset (dx, dy) from the center is inside the annulus
    pub fn contains_offset(&self, dx: f64, dy: f64) -> bool {
        let (sin_t, cos_t) = self.theta.sin_cos();
        let u = dx * cos_t + dy * sin_t;
        let v = -dx * sin_t + dy * cos_t;
        inside_ellipse(u, v, self.a_out, self.b_out)
            && !inside_ellipse(u, v, self.a_in, self.b_in())
    }

    /// Row-major (row, col) indices of all pixels of `size` whose centers fall
    /// inside the annulus, regardless of their values.
    pub fn pixel_indices(&self, size: ImageSize) -> Vec<(usize, usize)> {
        if self.a_out <= self.a_in || size.pixel_count() == 0 {
            return Vec::new();
        }

        let (xc, yc) = self.center;
        let (x_ext, y_ext) = self.half_extents();
        let Some(cols) = clamped_span(xc - x_ext, xc + x_ext, size.width) else {
            return Vec::new();
        };
        let Some(rows) = clamped_span(yc - y_ext, yc + y_ext, size.height) else {
            return Vec::new();
        };

        let mut indices = Vec::new();
        for row in rows.0..=rows.1 {
            let dy = row as f64 - yc;
            for col in cols.0..=cols.1 {
                let dx = col as f64 - xc;
                if self.contains_offset(dx, dy) {
                    indices.push((row, col));
                }
            }
        }
        indices
    }
}

/// Inclusive pixel index span covering [low, high], clipped to `0..len`
fn clamped_span(low: f64, high: f64, len: usize) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let first = low.floor().max(0.0);
    let last = high.ceil().min((len - 1) as f64);
    // Also rejects NaN bounds
    if !(first <= last) {
        return None;
    }
    Some((first as usize, last as usize))
}

/// Select the non-background pixels of `image` inside `annulus`.
///
/// Returned pixels are in row-major order and carry their offsets from the
/// annulus center and their image values.
pub fn rasterize_annulus(image: &ArrayView2<f64>, annulus: &AnnulusGeometry) -> Vec<MaskedPixel> {
    let (xc, yc) = annulus.center;
    annulus
        .pixel_indices(ImageSize::of_view(image))
        .into_iter()
        .filter_map(|(row, col)| {
            let value = image[[row, col]];
            if value == 0.0 || !value.is_finite() {
                return None;
            }
            Some(MaskedPixel {
                row,
                col,
                dy: row as f64 - yc,
                dx: col as f64 - xc,
                value,
            })
        })
        .collect()
}
