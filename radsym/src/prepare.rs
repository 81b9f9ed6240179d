//! Orientation and header preparation of model images
//!
//! Model images come out of the radiative-transfer code with the disk major
//! axis along a fixed direction. Before they can be compared with observations
//! they are rotated to the observed position angle, and ALMA continuum models
//! get the beam and sky coordinate keywords of the observation.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use shared::fits::HeaderCard;
use shared::image_proc::{pivot, rotate, PivotError, PivotSample};
use shared::units::arcsec_to_deg;
use shared::ImageSize;

/// Rotation in degrees that turns a model image to the disk position angle
pub fn model_rotation_deg(position_angle_deg: f64) -> f64 {
    -(position_angle_deg - 90.0)
}

/// Rotate a model Qphi image to the disk position angle
pub fn prepare_qphi_image(image: &ArrayView2<f64>, position_angle_deg: f64) -> Array2<f64> {
    log::info!(
        "Rotating {}x{} Qphi model by {:.2} deg",
        image.ncols(),
        image.nrows(),
        model_rotation_deg(position_angle_deg)
    );
    rotate(image, model_rotation_deg(position_angle_deg))
}

/// Synthesized beam of an interferometric observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    /// FWHM major axis in arcsec
    pub major_arcsec: f64,
    /// FWHM minor axis in arcsec
    pub minor_arcsec: f64,
    /// Position angle in degrees
    pub position_angle_deg: f64,
}

/// Header values attached to a prepared ALMA model image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlmaHeader {
    pub bunit: String,
    pub beam: Beam,
    /// Right ascension of the reference pixel in degrees
    pub ra_deg: f64,
    /// Declination of the reference pixel in degrees
    pub dec_deg: f64,
}

impl Default for AlmaHeader {
    /// PDS 70 band 7 continuum
    fn default() -> Self {
        Self {
            bunit: "mJy/beam".to_string(),
            beam: Beam {
                major_arcsec: 0.074,
                minor_arcsec: 0.057,
                position_angle_deg: 63.0,
            },
            ra_deg: 212.0421033167,
            dec_deg: -41.39805265833,
        }
    }
}

impl AlmaHeader {
    /// Header cards for an image of `size` sampled at `pixel_scale` arcsec/px.
    ///
    /// RA increases to the left, so CDELT1 is negative. The reference pixel is
    /// the geometric midpoint of the image.
    pub fn cards(&self, size: ImageSize, pixel_scale: f64) -> Vec<HeaderCard> {
        let cdelt = arcsec_to_deg(pixel_scale);
        let (crpix1, crpix2) = size.midpoint();
        vec![
            HeaderCard::string("BUNIT", &self.bunit),
            HeaderCard::float("BMAJ", arcsec_to_deg(self.beam.major_arcsec)),
            HeaderCard::float("BMIN", arcsec_to_deg(self.beam.minor_arcsec)),
            HeaderCard::float("BPA", self.beam.position_angle_deg),
            HeaderCard::float("CDELT1", -cdelt),
            HeaderCard::float("CDELT2", cdelt),
            HeaderCard::float("CRPIX1", crpix1),
            HeaderCard::float("CRPIX2", crpix2),
            HeaderCard::float("CRVAL1", self.ra_deg),
            HeaderCard::float("CRVAL2", self.dec_deg),
            HeaderCard::string("CTYPE1", "RA---SIN"),
            HeaderCard::string("CTYPE2", "DEC--SIN"),
        ]
    }
}

/// A rotated image and the header to write with it
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub data: Array2<f64>,
    pub cards: Vec<HeaderCard>,
}

/// Rotate an ALMA model image to the disk position angle and build its header
pub fn prepare_alma_image(
    image: &ArrayView2<f64>,
    position_angle_deg: f64,
    pixel_scale: f64,
    header: &AlmaHeader,
) -> PreparedImage {
    let data = rotate(image, model_rotation_deg(position_angle_deg));
    let cards = header.cards(ImageSize::of_view(&data.view()), pixel_scale);
    log::info!(
        "Prepared ALMA model: {} header cards, {:.4} arcsec/px",
        cards.len(),
        pixel_scale
    );
    PreparedImage { data, cards }
}

/// Sky position of a reference brightness measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakPosition {
    pub r_au: f64,
    pub position_angle_deg: f64,
}

impl Default for PeakPosition {
    /// Continuum ring peak of PDS 70
    fn default() -> Self {
        Self {
            r_au: 65.44,
            position_angle_deg: 326.31,
        }
    }
}

/// Sample the image at the reference peak position
pub fn peak_flux(
    image: &ArrayView2<f64>,
    position: PeakPosition,
    pixel_scale: f64,
    distance_pc: f64,
) -> Result<PivotSample, PivotError> {
    pivot(
        image,
        position.r_au,
        position.position_angle_deg,
        pixel_scale,
        distance_pc,
    )
}
