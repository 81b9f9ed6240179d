//! Flux aggregation and normalization into a brightness matrix
//!
//! The result is an N × M matrix: N angular sectors (rows) by M annuli
//! (columns). Each cell holds the summed flux of the annulus pixels falling in
//! the sector; each row is then divided by its maximum so the radial profile of
//! every sector peaks at 1.

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::aperture::{build_annuli_within, AnnulusGeometry, DiskGeometry};
use super::binning::AngularBins;
use super::mask::{rasterize_annulus, MaskedPixel};
use super::{require_finite, require_positive, ProfileError};

/// Inputs to a profile extraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileParams {
    pub geometry: DiskGeometry,
    /// Semi-major axis of the outermost boundary in AU
    pub max_radius_au: f64,
    /// Radial width of each annulus in AU
    pub annulus_width_au: f64,
    /// Number of angular sectors
    pub n_bins: usize,
}

impl ProfileParams {
    /// Check the parameters before any image work is done.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.n_bins == 0 {
            return Err(ProfileError::InvalidBinCount(self.n_bins));
        }
        require_positive("pixel scale", self.geometry.pixel_scale)?;
        require_positive("distance", self.geometry.distance_pc)?;
        require_positive("annulus width", self.annulus_width_au)?;
        require_finite("disk size", self.max_radius_au)?;
        require_finite("position angle", self.geometry.position_angle_deg)?;
        require_finite("inclination", self.geometry.inclination_deg)?;
        require_finite("center x", self.geometry.center.0)?;
        require_finite("center y", self.geometry.center.1)?;
        Ok(())
    }
}

/// Per-sector totals for one annulus
#[derive(Debug, Clone, PartialEq)]
pub struct AnnulusFlux {
    pub flux: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Extracted brightness profile
#[derive(Debug, Clone)]
pub struct BrightnessProfile {
    /// Row-normalized flux, shape (n_bins, n_annuli)
    pub normalized: Array2<f64>,
    /// Raw summed flux, shape (n_bins, n_annuli)
    pub flux: Array2<f64>,
    /// Contributing pixel counts, shape (n_bins, n_annuli)
    pub counts: Array2<usize>,
    /// Sector midpoints in degrees
    pub bin_centers_deg: Vec<f64>,
    /// Annulus mid radii in AU
    pub radii_au: Vec<f64>,
    /// The annuli used, innermost first
    pub annuli: Vec<AnnulusGeometry>,
}

impl BrightnessProfile {
    pub fn n_bins(&self) -> usize {
        self.normalized.nrows()
    }

    pub fn n_annuli(&self) -> usize {
        self.normalized.ncols()
    }

    /// Total raw flux summed over every cell
    pub fn total_flux(&self) -> f64 {
        self.flux.sum()
    }
}

/// Sum the values of `pixels` per angular sector.
///
/// Values are looked up in `image` by index; pixels outside the image are
/// skipped. The result only depends on its inputs.
pub fn accumulate_annulus(
    image: &ArrayView2<f64>,
    pixels: &[MaskedPixel],
    bins: &AngularBins,
) -> AnnulusFlux {
    let mut flux = vec![0.0; bins.len()];
    let mut counts = vec![0usize; bins.len()];
    for pixel in pixels {
        let Some(value) = image.get((pixel.row, pixel.col)) else {
            log::debug!("Skipping pixel ({}, {}) outside image", pixel.row, pixel.col);
            continue;
        };
        let k = bins.assign(pixel.dy, pixel.dx);
        flux[k] += *value;
        counts[k] += 1;
    }
    AnnulusFlux { flux, counts }
}

/// Divide each row by its maximum in place.
///
/// Rows whose maximum is not a finite positive number (empty sectors, or
/// sectors with only negative flux) are left unchanged. Returns the number of
/// such rows.
pub fn normalize_rows(matrix: &mut Array2<f64>) -> usize {
    let mut skipped = 0;
    for (i, mut row) in matrix.rows_mut().into_iter().enumerate() {
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max.is_finite() && max > 0.0 {
            row.mapv_inplace(|v| v / max);
        } else if !row.is_empty() {
            log::warn!("Angular bin {i} has no positive flux (max {max}); left unnormalized");
            skipped += 1;
        }
    }
    skipped
}

/// Extract the azimuthally binned radial profile of `image`.
///
/// Builds the annuli from `params`, then measures each one in parallel. The
/// output is identical to a sequential run since every annulus is reduced
/// independently and collected in order.
///
/// # Arguments
/// * `image` - 2D image, rows along y and columns along x
/// * `params` - Disk geometry, radial extent, annulus width and sector count
///
/// # Returns
/// * `Ok(BrightnessProfile)` - Matrices of shape (n_bins, n_annuli)
/// * `Err(ProfileError)` - For zero sectors or a non-physical parameter
pub fn extract_profile(
    image: &ArrayView2<f64>,
    params: &ProfileParams,
) -> Result<BrightnessProfile, ProfileError> {
    params.validate()?;
    let bins = AngularBins::new(params.n_bins)?;
    let annuli = build_annuli_within(
        &params.geometry,
        params.max_radius_au,
        params.annulus_width_au,
        farthest_pixel_distance(image, params.geometry.center),
    )?;
    if annuli.is_empty() {
        log::warn!(
            "Disk size {} AU is below one annulus width ({} AU); profile is empty",
            params.max_radius_au,
            params.annulus_width_au
        );
    }

    log::info!(
        "Extracting profile: {} annuli x {} angular bins on {}x{} image",
        annuli.len(),
        bins.len(),
        image.ncols(),
        image.nrows()
    );

    Ok(extract_profile_from_annuli(
        image,
        annuli,
        &bins,
        &params.geometry,
    ))
}

/// Distance from `center` to the farthest pixel center of `image`
fn farthest_pixel_distance(image: &ArrayView2<f64>, center: (f64, f64)) -> f64 {
    let (cx, cy) = center;
    let last_col = (image.ncols() as f64 - 1.0).max(0.0);
    let last_row = (image.nrows() as f64 - 1.0).max(0.0);
    let dx = cx.abs().max((last_col - cx).abs());
    let dy = cy.abs().max((last_row - cy).abs());
    dx.hypot(dy)
}

/// Measure a prepared list of annuli.
///
/// `geometry` is only used to convert annulus radii to AU.
pub fn extract_profile_from_annuli(
    image: &ArrayView2<f64>,
    annuli: Vec<AnnulusGeometry>,
    bins: &AngularBins,
    geometry: &DiskGeometry,
) -> BrightnessProfile {
    let per_annulus: Vec<AnnulusFlux> = annuli
        .par_iter()
        .map(|annulus| {
            let pixels = rasterize_annulus(image, annulus);
            accumulate_annulus(image, &pixels, bins)
        })
        .collect();

    let shape = (bins.len(), annuli.len());
    let mut flux = Array2::<f64>::zeros(shape);
    let mut counts = Array2::<usize>::zeros(shape);
    for (j, annulus_flux) in per_annulus.iter().enumerate() {
        for k in 0..bins.len() {
            flux[[k, j]] = annulus_flux.flux[k];
            counts[[k, j]] = annulus_flux.counts[k];
        }
    }

    let mut normalized = flux.clone();
    let skipped = normalize_rows(&mut normalized);
    if skipped > 0 {
        log::warn!("{skipped} of {} angular bins left unnormalized", bins.len());
    }

    let radii_au = annuli
        .iter()
        .map(|annulus| geometry.pixels_to_au(annulus.mid_radius()))
        .collect();

    BrightnessProfile {
        normalized,
        flux,
        counts,
        bin_centers_deg: bins.midpoints_deg(),
        radii_au,
        annuli,
    }
}
