//! Annular aperture photometry for disk brightness profiles
//!
//! The extractor builds nested elliptical annuli around the disk center
//! ([`aperture`]), rasterizes each one onto the pixel grid ([`mask`]), splits
//! every annulus into equal polar-angle sectors ([`binning`]) and sums the flux
//! per (sector, annulus) cell into a normalized brightness matrix
//! ([`profile`]).

use thiserror::Error;

pub mod aperture;
pub mod binning;
pub mod mask;
pub mod profile;

pub use aperture::{build_annuli, build_annuli_within, AnnulusGeometry, DiskGeometry, MAX_ANNULI};
pub use binning::{AngularBin, AngularBins};
pub use mask::{rasterize_annulus, MaskedPixel};
pub use profile::{
    accumulate_annulus, extract_profile, extract_profile_from_annuli, normalize_rows,
    AnnulusFlux, BrightnessProfile, ProfileParams,
};

/// Errors raised by the profile extractor for unusable parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    #[error("Number of angular bins must be at least 1, got {0}")]
    InvalidBinCount(usize),

    #[error("Invalid {name}: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Require a finite, strictly positive parameter
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, ProfileError> {
    if !value.is_finite() {
        return Err(ProfileError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value <= 0.0 {
        return Err(ProfileError::InvalidParameter {
            name,
            value,
            reason: "must be positive",
        });
    }
    Ok(value)
}

/// Require a finite parameter
pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64, ProfileError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProfileError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("distance", 113.43), Ok(113.43));
        assert!(matches!(
            require_positive("distance", 0.0),
            Err(ProfileError::InvalidParameter {
                name: "distance",
                ..
            })
        ));
        assert!(require_positive("distance", f64::NAN).is_err());
        assert!(require_finite("inclination", f64::INFINITY).is_err());
        assert_eq!(require_finite("inclination", -3.0), Ok(-3.0));
    }

    #[test]
    fn test_error_display() {
        let err = ProfileError::InvalidBinCount(0);
        assert_eq!(
            err.to_string(),
            "Number of angular bins must be at least 1, got 0"
        );

        let err = ProfileError::InvalidParameter {
            name: "pixel scale",
            value: -0.02,
            reason: "must be positive",
        };
        assert_eq!(err.to_string(), "Invalid pixel scale: -0.02 (must be positive)");
    }
}
