//! Brightness matrix output as FITS and text tables

use std::fmt::Write as _;
use std::path::Path;

use shared::fits::{write_primary_image, FitsError, HeaderCard};

use crate::config::ProfileConfig;
use crate::photometry::BrightnessProfile;

/// Header describing the axes of a written brightness matrix.
///
/// Axis 1 (columns) is the annulus radius in AU, axis 2 (rows) the angular bin
/// midpoint in degrees, both as linear world coordinates from pixel 1.
pub fn profile_cards(profile: &BrightnessProfile, config: &ProfileConfig) -> Vec<HeaderCard> {
    let radius_step = match profile.radii_au.as_slice() {
        [first, second, ..] => second - first,
        _ => config.annulus_width_au,
    };
    let bin_step = 360.0 / profile.n_bins().max(1) as f64;

    vec![
        HeaderCard::string("BUNIT", "normalized"),
        HeaderCard::string("CTYPE1", "RADIUS"),
        HeaderCard::string("CUNIT1", "AU"),
        HeaderCard::float("CRPIX1", 1.0),
        HeaderCard::float("CRVAL1", profile.radii_au.first().copied().unwrap_or(0.0)),
        HeaderCard::float("CDELT1", radius_step),
        HeaderCard::string("CTYPE2", "ANGLE"),
        HeaderCard::string("CUNIT2", "deg"),
        HeaderCard::float("CRPIX2", 1.0),
        HeaderCard::float(
            "CRVAL2",
            profile.bin_centers_deg.first().copied().unwrap_or(0.0),
        ),
        HeaderCard::float("CDELT2", bin_step),
        HeaderCard::float("PXSCALE", config.pixel_scale),
        HeaderCard::float("DISTANCE", config.distance_pc),
        HeaderCard::float("DISK_PA", config.position_angle_deg),
        HeaderCard::float("DISK_INC", config.inclination_deg),
        HeaderCard::float("DISKSIZE", config.max_radius_au),
        HeaderCard::float("ANN_DR", config.annulus_width_au),
        HeaderCard::int("NBINS", profile.n_bins() as i64),
        HeaderCard::int("NANNULI", profile.n_annuli() as i64),
    ]
}

/// Write the normalized matrix (angular bins × annuli) to a FITS file.
///
/// A profile without annuli is refused with [`FitsError::EmptyImage`].
pub fn write_profile(
    path: &Path,
    profile: &BrightnessProfile,
    config: &ProfileConfig,
) -> Result<(), FitsError> {
    write_primary_image(
        path,
        &profile.normalized.view(),
        &profile_cards(profile, config),
    )?;
    log::info!(
        "Wrote {}x{} brightness matrix to {}",
        profile.n_bins(),
        profile.n_annuli(),
        path.display()
    );
    Ok(())
}

/// Fixed-width table of the normalized matrix, one line per angular bin
pub fn format_profile_table(profile: &BrightnessProfile) -> String {
    let mut table = String::new();
    let _ = write!(table, "{:>8}", "PA\\r(AU)");
    for r in &profile.radii_au {
        let _ = write!(table, " {r:>7.1}");
    }
    table.push('\n');
    let width = 8 + 8 * profile.n_annuli();
    let _ = writeln!(table, "{:-<width$}", "");

    for (angle, row) in profile
        .bin_centers_deg
        .iter()
        .zip(profile.normalized.rows())
    {
        let _ = write!(table, "{angle:>8.1}");
        for v in row {
            let _ = write!(table, " {v:>7.3}");
        }
        table.push('\n');
    }
    table
}
