//! Equal-width polar-angle sectors
//!
//! Angles are measured counterclockwise from the +x (column) axis in the
//! (x = column, y = row) pixel frame and folded into [0, 2π). Bin `k` covers
//! `[k·2π/N, (k+1)·2π/N)`; the last bin is closed so an angle of exactly 2π
//! still lands in it.

use std::f64::consts::TAU;

use shared::units::rad_to_deg;

use super::ProfileError;

/// One angular sector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularBin {
    /// 0-based sector index
    pub index: usize,
    /// Lower edge in radians
    pub theta_min: f64,
    /// Upper edge in radians
    pub theta_max: f64,
}

impl AngularBin {
    /// Sector midpoint in radians
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.theta_min + self.theta_max)
    }
}

/// Partition of the full circle into N equal sectors
#[derive(Debug, Clone, PartialEq)]
pub struct AngularBins {
    edges: Vec<f64>,
}

impl AngularBins {
    /// Create `n_bins` equal sectors.
    ///
    /// Returns [`ProfileError::InvalidBinCount`] for zero bins.
    pub fn new(n_bins: usize) -> Result<Self, ProfileError> {
        if n_bins == 0 {
            return Err(ProfileError::InvalidBinCount(n_bins));
        }
        let width = TAU / n_bins as f64;
        let mut edges: Vec<f64> = (0..n_bins).map(|k| k as f64 * width).collect();
        edges.push(TAU);
        Ok(Self { edges })
    }

    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sector width in radians
    pub fn width(&self) -> f64 {
        TAU / self.len() as f64
    }

    /// Sector boundaries, N + 1 values from 0 to 2π
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn bin(&self, index: usize) -> Option<AngularBin> {
        if index >= self.len() {
            return None;
        }
        Some(AngularBin {
            index,
            theta_min: self.edges[index],
            theta_max: self.edges[index + 1],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = AngularBin> + '_ {
        self.edges.windows(2).enumerate().map(|(index, pair)| AngularBin {
            index,
            theta_min: pair[0],
            theta_max: pair[1],
        })
    }

    /// Sector midpoints in degrees: (k + 1/2) · 360/N
    pub fn midpoints_deg(&self) -> Vec<f64> {
        self.iter().map(|bin| rad_to_deg(bin.midpoint())).collect()
    }

    /// Index of the sector holding the folded angle `theta` (radians in [0, 2π])
    pub fn index_of(&self, theta: f64) -> usize {
        let n = self.len();
        let guess = (theta / self.width()).floor();
        let mut index = if guess > 0.0 {
            (guess as usize).min(n - 1)
        } else {
            0
        };

        // Settle rounding at the boundaries against the stored edges
        while index > 0 && theta < self.edges[index] {
            index -= 1;
        }
        while index + 1 < n && theta >= self.edges[index + 1] {
            index += 1;
        }
        index
    }

    /// Sector of a pixel at offset (dy, dx) from the center
    pub fn assign(&self, dy: f64, dx: f64) -> usize {
        self.index_of(polar_angle(dy, dx))
    }
}

/// Polar angle of (dx, dy) folded into [0, 2π)
pub fn polar_angle(dy: f64, dx: f64) -> f64 {
    let phi = dy.atan2(dx);
    if phi < 0.0 {
        phi + TAU
    } else {
        phi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_zero_bins_rejected() {
        assert!(matches!(
            AngularBins::new(0),
            Err(ProfileError::InvalidBinCount(0))
        ));
    }

    #[test]
    fn test_edges_cover_circle() {
        let bins = AngularBins::new(6).unwrap();
        assert_eq!(bins.len(), 6);
        assert_eq!(bins.edges().len(), 7);
        assert_eq!(bins.edges()[0], 0.0);
        assert_eq!(bins.edges()[6], TAU);
        for pair in bins.edges().windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_midpoints_deg() {
        let bins = AngularBins::new(4).unwrap();
        let mids = bins.midpoints_deg();
        let expected = [45.0, 135.0, 225.0, 315.0];
        assert_eq!(mids.len(), 4);
        for (got, want) in mids.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_polar_angle_folding() {
        assert_relative_eq!(polar_angle(0.0, 1.0), 0.0);
        assert_relative_eq!(polar_angle(1.0, 0.0), FRAC_PI_2);
        assert_relative_eq!(polar_angle(0.0, -1.0), PI);
        assert_relative_eq!(polar_angle(-1.0, 0.0), 1.5 * PI);
        assert!(polar_angle(-1e-12, 1.0) < TAU);
        assert!(polar_angle(-1e-12, 1.0) > 1.5 * PI);
    }

    #[test]
    fn test_boundaries_belong_to_upper_bin() {
        let bins = AngularBins::new(4).unwrap();
        assert_eq!(bins.index_of(0.0), 0);
        assert_eq!(bins.index_of(bins.edges()[1]), 1);
        assert_eq!(bins.index_of(bins.edges()[2]), 2);
        assert_eq!(bins.index_of(bins.edges()[3]), 3);
        assert_eq!(bins.index_of(TAU), 3);
    }

    #[test]
    fn test_axis_pixels() {
        let bins = AngularBins::new(4).unwrap();
        assert_eq!(bins.assign(0.0, 5.0), 0);
        assert_eq!(bins.assign(5.0, 0.0), 1);
        assert_eq!(bins.assign(0.0, -5.0), 2);
        assert_eq!(bins.assign(-5.0, 0.0), 3);
        assert_eq!(bins.assign(-1.0, 5.0), 3);
    }

    #[test]
    fn test_single_bin_takes_everything() {
        let bins = AngularBins::new(1).unwrap();
        for (dy, dx) in [(0.0, 1.0), (1.0, -1.0), (-3.0, -0.5), (-1e-9, 2.0)] {
            assert_eq!(bins.assign(dy, dx), 0);
        }
    }

    #[test]
    fn test_iter_matches_bin() {
        let bins = AngularBins::new(5).unwrap();
        let collected: Vec<AngularBin> = bins.iter().collect();
        assert_eq!(collected.len(), 5);
        for (i, bin) in collected.iter().enumerate() {
            assert_eq!(Some(*bin), bins.bin(i));
        }
        assert!(bins.bin(5).is_none());
    }
}
