//! Nested elliptical annuli aligned with the projected disk
//!
//! A disk inclined by `i` projects a circular ring into an ellipse with
//! eccentricity `sin(i)`. The annuli generated here share that eccentricity,
//! the disk center, and a rotation angle derived from the disk position angle,
//! and step outward from the center by a fixed width.

use serde::{Deserialize, Serialize};
use shared::units::{au_to_pixels, deg_to_rad, pixels_to_au};

use super::ProfileError;

/// Sky orientation and scale of a disk image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiskGeometry {
    /// Disk center (x, y) in 0-based pixel coordinates
    pub center: (f64, f64),
    /// Position angle of the disk major axis, degrees east of north
    pub position_angle_deg: f64,
    /// Disk inclination in degrees (0 = face on, 90 = edge on)
    pub inclination_deg: f64,
    /// Distance to the source in parsec
    pub distance_pc: f64,
    /// Pixel scale in arcsec/px
    pub pixel_scale: f64,
}

impl DiskGeometry {
    /// Projected eccentricity of a circular ring: e = sin(inclination)
    pub fn eccentricity(&self) -> f64 {
        deg_to_rad(self.inclination_deg).sin()
    }

    /// Rotation of the annulus major axis from the +x axis in radians:
    /// (PA - 90°) so the ellipse follows the disk's sky orientation
    pub fn annulus_rotation(&self) -> f64 {
        deg_to_rad(self.position_angle_deg - 90.0)
    }

    /// Convert a length in AU at the source to pixels
    pub fn au_to_pixels(&self, length_au: f64) -> f64 {
        au_to_pixels(length_au, self.pixel_scale, self.distance_pc)
    }

    /// Convert a length in pixels to AU at the source
    pub fn pixels_to_au(&self, length_px: f64) -> f64 {
        pixels_to_au(length_px, self.pixel_scale, self.distance_pc)
    }
}

/// One elliptical annulus
///
/// The inner and outer boundaries are concentric, coaxial ellipses with the
/// same eccentricity; the inner semi-minor axis follows from the outer one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnulusGeometry {
    /// Center (x, y) in pixels
    pub center: (f64, f64),
    /// Inner semi-major axis in pixels
    pub a_in: f64,
    /// Outer semi-major axis in pixels
    pub a_out: f64,
    /// Outer semi-minor axis in pixels
    pub b_out: f64,
    /// Rotation of the major axis from the +x axis, radians counterclockwise
    pub theta: f64,
}

impl AnnulusGeometry {
    /// Build an annulus from its semi-major axes and eccentricity.
    ///
    /// Eccentricities with |e| >= 1 collapse the minor axis to zero.
    pub fn new(center: (f64, f64), a_in: f64, a_out: f64, eccentricity: f64, theta: f64) -> Self {
        let axis_ratio = (1.0 - eccentricity * eccentricity).max(0.0).sqrt();
        Self {
            center,
            a_in,
            a_out,
            b_out: a_out * axis_ratio,
            theta,
        }
    }

    /// Circular annulus (zero eccentricity, no rotation)
    pub fn circular(center: (f64, f64), r_in: f64, r_out: f64) -> Self {
        Self::new(center, r_in, r_out, 0.0, 0.0)
    }

    /// Inner semi-minor axis, scaled from the outer boundary
    pub fn b_in(&self) -> f64 {
        if self.a_out > 0.0 {
            self.a_in * (self.b_out / self.a_out)
        } else {
            0.0
        }
    }

    /// Radial width along the major axis in pixels
    pub fn width(&self) -> f64 {
        self.a_out - self.a_in
    }

    /// Midpoint of the inner and outer semi-major axes in pixels
    pub fn mid_radius(&self) -> f64 {
        self.a_in + 0.5 * (self.a_out - self.a_in)
    }

    /// Half extents (x, y) of the axis-aligned box around the outer ellipse
    pub fn half_extents(&self) -> (f64, f64) {
        let (sin_t, cos_t) = self.theta.sin_cos();
        let a = self.a_out;
        let b = self.b_out;
        let x = ((a * cos_t).powi(2) + (b * sin_t).powi(2)).sqrt();
        let y = ((a * sin_t).powi(2) + (b * cos_t).powi(2)).sqrt();
        (x, y)
    }
}

/// Upper bound on the number of annuli a single extraction may build
pub const MAX_ANNULI: usize = 100_000;

/// Generate the ordered sequence of annuli covering the disk out to
/// `max_radius_au`, each `annulus_width_au` wide.
///
/// The radial limit is taken as half of the rounded pixel size of the full
/// disk diameter (2 × `max_radius_au`). Inner semi-major axes start one annulus
/// width from the center and step outward while they stay strictly below that
/// limit; each annulus ends where the next one begins.
///
/// A `max_radius_au` smaller than one annulus width produces no annuli.
///
/// # Arguments
/// * `geometry` - Disk center, orientation, distance and pixel scale
/// * `max_radius_au` - Semi-major axis of the disk in AU
/// * `annulus_width_au` - Radial width of each annulus in AU
///
/// # Returns
/// * `Ok(Vec<AnnulusGeometry>)` - Annuli ordered from the center outward
/// * `Err(ProfileError)` - If the disk needs more than [`MAX_ANNULI`] annuli
pub fn build_annuli(
    geometry: &DiskGeometry,
    max_radius_au: f64,
    annulus_width_au: f64,
) -> Result<Vec<AnnulusGeometry>, ProfileError> {
    build_annuli_within(geometry, max_radius_au, annulus_width_au, f64::INFINITY)
}

/// Like [`build_annuli`], but stops once the annuli can no longer contain a
/// pixel within `reach_px` of the disk center.
///
/// An annulus whose inner ellipse has a semi-minor axis beyond `reach_px`
/// encloses every such pixel, so it and all annuli outside it would only
/// contribute empty columns. For an edge-on disk the semi-major axis is used
/// instead.
pub fn build_annuli_within(
    geometry: &DiskGeometry,
    max_radius_au: f64,
    annulus_width_au: f64,
    reach_px: f64,
) -> Result<Vec<AnnulusGeometry>, ProfileError> {
    let step = geometry.au_to_pixels(annulus_width_au);
    if !(step.is_finite() && step > 0.0) {
        return Ok(Vec::new());
    }

    let pixel_lim = geometry.au_to_pixels(2.0 * max_radius_au).round();
    let limit = 0.5 * pixel_lim;

    // Same element count as a half-open arange(step, limit, step)
    let mut count = ((limit - step) / step).ceil().max(0.0);

    let eccentricity = geometry.eccentricity();
    let theta = geometry.annulus_rotation();

    let axis_ratio = AnnulusGeometry::new(geometry.center, 0.0, 1.0, eccentricity, theta).b_out;
    let clearance = if axis_ratio > 0.0 {
        reach_px / axis_ratio
    } else {
        reach_px
    };
    let useful = (clearance / step).floor() + 1.0;
    if useful < count {
        log::debug!(
            "Dropping {} annuli beyond {:.1} px from the center",
            count - useful,
            reach_px
        );
        count = useful;
    }

    if !count.is_finite() || count > MAX_ANNULI as f64 {
        return Err(ProfileError::InvalidParameter {
            name: "disk size",
            value: max_radius_au,
            reason: "needs more annuli than can be measured",
        });
    }
    let count = count as usize;

    // Neighbouring annuli share boundary values
    let edges: Vec<f64> = (1..=count + 1).map(|k| k as f64 * step).collect();
    Ok(edges
        .windows(2)
        .map(|pair| AnnulusGeometry::new(geometry.center, pair[0], pair[1], eccentricity, theta))
        .collect())
}
