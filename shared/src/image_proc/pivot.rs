//! Single-pixel lookups at a sky position relative to the image midpoint

use ndarray::ArrayView2;
use thiserror::Error;

use crate::image_size::ImageSize;
use crate::units::{au_to_pixels, deg_to_rad};

#[derive(Error, Debug, PartialEq)]
pub enum PivotError {
    #[error("Pivot position ({x:.2}, {y:.2}) lies outside the {size} image")]
    OutOfBounds { x: f64, y: f64, size: ImageSize },
}

/// Location and value of a pivot lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotSample {
    /// Column coordinate of the position
    pub x: f64,
    /// Row coordinate of the position
    pub y: f64,
    /// Image value at the nearest pixel
    pub value: f64,
}

/// Look up the pixel at radius `r_au` along position angle `pa_deg`.
///
/// The position is measured from the image midpoint (width/2, height/2) with the
/// position angle converted to an angle from the +x axis as PA + 90°. The
/// returned value is the one stored at the nearest pixel.
pub fn pivot(
    image: &ArrayView2<f64>,
    r_au: f64,
    pa_deg: f64,
    pixel_scale: f64,
    distance_pc: f64,
) -> Result<PivotSample, PivotError> {
    let size = ImageSize::of_view(image);
    let (xc, yc) = size.midpoint();

    let r_px = au_to_pixels(r_au, pixel_scale, distance_pc);
    let angle = deg_to_rad(pa_deg + 90.0);

    let x = r_px * angle.cos() + xc;
    let y = r_px * angle.sin() + yc;

    let row = y.round() as isize;
    let col = x.round() as isize;
    if !x.is_finite() || !y.is_finite() || !size.contains(row, col) {
        return Err(PivotError::OutOfBounds { x, y, size });
    }

    Ok(PivotSample {
        x,
        y,
        value: image[[row as usize, col as usize]],
    })
}
