//! Color mapping and value rescaling

use ndarray::Array2;
use plotters::style::RGBColor;

/// Anchor colors of a red-white-blue diverging map, low to high
const RDBU_ANCHORS: [(u8, u8, u8); 5] = [
    (103, 0, 31),
    (214, 96, 77),
    (247, 247, 247),
    (67, 147, 195),
    (5, 48, 97),
];

/// Map `value` within `[vmin, vmax]` onto a red-white-blue diverging palette.
///
/// Values are clipped to the range; NaN maps to the midpoint (white).
pub fn diverging_rdbu(value: f64, vmin: f64, vmax: f64) -> RGBColor {
    let span = vmax - vmin;
    let t = if value.is_nan() || span <= 0.0 {
        0.5
    } else {
        ((value - vmin) / span).clamp(0.0, 1.0)
    };

    let segments = (RDBU_ANCHORS.len() - 1) as f64;
    let position = t * segments;
    let lower = (position.floor() as usize).min(RDBU_ANCHORS.len() - 2);
    let frac = position - lower as f64;

    let (r0, g0, b0) = RDBU_ANCHORS[lower];
    let (r1, g1, b1) = RDBU_ANCHORS[lower + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;

    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Linearly rescale every element so the matrix minimum maps to `low` and the
/// maximum to `high`. A constant matrix maps to the midpoint of the range.
pub fn rescale_to_range(matrix: &Array2<f64>, low: f64, high: f64) -> Array2<f64> {
    let min = matrix.iter().copied().fold(f64::INFINITY, f64::min);
    let max = matrix.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    if !span.is_finite() || span == 0.0 {
        return Array2::from_elem(matrix.dim(), 0.5 * (low + high));
    }

    matrix.mapv(|v| low + (high - low) / span * (v - min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_diverging_endpoints() {
        assert_eq!(diverging_rdbu(-1.0, -1.0, 1.0), RGBColor(103, 0, 31));
        assert_eq!(diverging_rdbu(0.0, -1.0, 1.0), RGBColor(247, 247, 247));
        assert_eq!(diverging_rdbu(1.0, -1.0, 1.0), RGBColor(5, 48, 97));
    }

    #[test]
    fn test_diverging_clips_and_handles_nan() {
        assert_eq!(diverging_rdbu(-5.0, -1.0, 1.0), RGBColor(103, 0, 31));
        assert_eq!(diverging_rdbu(9.0, -1.0, 1.0), RGBColor(5, 48, 97));
        assert_eq!(diverging_rdbu(f64::NAN, -1.0, 1.0), RGBColor(247, 247, 247));
    }

    #[test]
    fn test_rescale_to_unit_range() {
        let m = array![[0.0, 5.0], [10.0, 2.5]];
        let scaled = rescale_to_range(&m, -1.0, 1.0);
        assert_relative_eq!(scaled[[0, 0]], -1.0);
        assert_relative_eq!(scaled[[1, 0]], 1.0);
        assert_relative_eq!(scaled[[0, 1]], 0.0);
        assert_relative_eq!(scaled[[1, 1]], -0.5);
    }

    #[test]
    fn test_rescale_constant_matrix() {
        let m = Array2::from_elem((3, 3), 4.0);
        let scaled = rescale_to_range(&m, -1.0, 1.0);
        assert!(scaled.iter().all(|&v| v == 0.0));
    }
}
