//! Type-safe physical units for disk image analysis
//!
//! Lengths on the sky are handled with the `uom` crate so the AU → parsec →
//! radian → arcsecond → pixel chain cannot silently mix units. The helper
//! functions at the bottom expose the distance-dependent conversions as plain
//! `f64` for the pixel-level code.
//!
//! The parsec is the IAU 2015 exact definition, 648000/π AU, so 1 AU at 1 pc
//! subtends exactly one arcsecond (`uom`'s `parsec` is a rounded metre value).

use uom::si::angle::{degree, radian, second};
use uom::si::f64::{Angle, Length, Ratio};
use std::f64::consts::PI;

use uom::si::length::astronomical_unit;
use uom::si::ratio::ratio;

/// Astronomical units per parsec (IAU 2015 Resolution B2)
pub const AU_PER_PARSEC: f64 = 648_000.0 / PI;

/// Extension trait for length conversions used in disk geometry
pub trait LengthExt {
    /// Create length from astronomical units
    fn from_au(au: f64) -> Self;

    /// Get length in astronomical units
    fn as_au(&self) -> f64;

    /// Create length from parsecs
    fn from_parsecs(pc: f64) -> Self;

    /// Get length in parsecs
    fn as_parsecs(&self) -> f64;
}

/// Extension trait for angle conversions
pub trait AngleExt {
    /// Create angle from degrees
    fn from_degrees(deg: f64) -> Self;

    /// Get angle in degrees
    fn as_degrees(&self) -> f64;

    /// Create angle from radians
    fn from_radians(rad: f64) -> Self;

    /// Get angle in radians
    fn as_radians(&self) -> f64;

    /// Create angle from arcseconds
    fn from_arcseconds(arcsec: f64) -> Self;

    /// Get angle in arcseconds
    fn as_arcseconds(&self) -> f64;
}

impl LengthExt for Length {
    fn from_au(au: f64) -> Self {
        Length::new::<astronomical_unit>(au)
    }

    fn as_au(&self) -> f64 {
        self.get::<astronomical_unit>()
    }

    fn from_parsecs(pc: f64) -> Self {
        Length::from_au(pc * AU_PER_PARSEC)
    }

    fn as_parsecs(&self) -> f64 {
        self.as_au() / AU_PER_PARSEC
    }
}

impl AngleExt for Angle {
    fn from_degrees(deg: f64) -> Self {
        Angle::new::<degree>(deg)
    }

    fn as_degrees(&self) -> f64 {
        self.get::<degree>()
    }

    fn from_radians(rad: f64) -> Self {
        Angle::new::<radian>(rad)
    }

    fn as_radians(&self) -> f64 {
        self.get::<radian>()
    }

    fn from_arcseconds(arcsec: f64) -> Self {
        Angle::new::<second>(arcsec)
    }

    fn as_arcseconds(&self) -> f64 {
        self.get::<second>()
    }
}

/// Small-angle size subtended by `length` at `distance`
pub fn angular_size(length: Length, distance: Length) -> Angle {
    let subtended: Ratio = length / distance;
    Angle::from_radians(subtended.get::<ratio>())
}

/// Physical length subtending `angle` at `distance` (small-angle approximation)
pub fn physical_size(angle: Angle, distance: Length) -> Length {
    distance * angle.as_radians()
}

/// Convert a length in AU to pixels for a source at `distance_pc` imaged at
/// `pixel_scale` arcsec/px.
pub fn au_to_pixels(length_au: f64, pixel_scale: f64, distance_pc: f64) -> f64 {
    let angle = angular_size(
        Length::from_au(length_au),
        Length::from_parsecs(distance_pc),
    );
    angle.as_arcseconds() / pixel_scale
}

/// Inverse of [`au_to_pixels`]
pub fn pixels_to_au(length_px: f64, pixel_scale: f64, distance_pc: f64) -> f64 {
    let angle = Angle::from_arcseconds(length_px * pixel_scale);
    physical_size(angle, Length::from_parsecs(distance_pc)).as_au()
}

/// Convert degrees to radians through the unit system
pub fn deg_to_rad(deg: f64) -> f64 {
    Angle::from_degrees(deg).as_radians()
}

/// Convert radians to degrees through the unit system
pub fn rad_to_deg(rad: f64) -> f64 {
    Angle::from_radians(rad).as_degrees()
}

/// Convert arcseconds to degrees (FITS CDELT/BMAJ/BMIN keywords are in degrees)
pub fn arcsec_to_deg(arcsec: f64) -> f64 {
    Angle::from_arcseconds(arcsec).as_degrees()
}
