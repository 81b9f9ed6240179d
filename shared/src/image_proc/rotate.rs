//! Image rotation about the array center

use ndarray::{Array2, ArrayView2, Zip};

use crate::units::deg_to_rad;

/// Bilinear sample of `image` at fractional (x, y); zero outside the array.
fn sample_bilinear(image: &ArrayView2<f64>, x: f64, y: f64) -> f64 {
    let (height, width) = image.dim();
    if x < 0.0 || y < 0.0 || x > (width - 1) as f64 || y > (height - 1) as f64 {
        return 0.0;
    }

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let top = image[[y0, x0]] * (1.0 - fx) + image[[y0, x1]] * fx;
    let bottom = image[[y1, x0]] * (1.0 - fx) + image[[y1, x1]] * fx;
    top * (1.0 - fy) + bottom * fy
}

/// Rotate an image by `angle_deg` about its center, keeping the input shape.
///
/// The rotation is counterclockwise in (x = column, y = row) coordinates: a
/// feature at offset (dx, dy) from the center moves to
/// (dx cos a - dy sin a, dx sin a + dy cos a). The center is at
/// ((width - 1) / 2, (height - 1) / 2). Output pixels that map outside the
/// source are zero; interior values are bilinearly interpolated.
pub fn rotate(image: &ArrayView2<f64>, angle_deg: f64) -> Array2<f64> {
    let (height, width) = image.dim();
    let mut rotated = Array2::<f64>::zeros((height, width));
    if height == 0 || width == 0 {
        return rotated;
    }

    let angle = deg_to_rad(angle_deg);
    let (sin_a, cos_a) = angle.sin_cos();
    let xc = (width - 1) as f64 * 0.5;
    let yc = (height - 1) as f64 * 0.5;

    Zip::indexed(&mut rotated).par_for_each(|(row, col), out| {
        let dx = col as f64 - xc;
        let dy = row as f64 - yc;
        // Inverse rotation to find the source location
        let src_x = dx * cos_a + dy * sin_a + xc;
        let src_y = -dx * sin_a + dy * cos_a + yc;
        *out = sample_bilinear(image, src_x, src_y);
    });

    rotated
}
