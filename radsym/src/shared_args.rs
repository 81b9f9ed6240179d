use clap::{Args, ValueEnum};
use shared::fits::FitsImage;
use std::path::PathBuf;

use crate::config::{ConfigError, ProfileConfig};

/// Where an image comes from, which decides how its center is found
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageKind {
    /// Observation: center from the CRPIX1/CRPIX2 header keywords
    Obs,
    /// Radiative-transfer model: center at the geometric midpoint
    Mod,
}

impl ImageKind {
    /// Disk center (x, y) in 0-based pixels for an image of this kind
    pub fn center(&self, image: &FitsImage) -> (f64, f64) {
        match self {
            ImageKind::Obs => {
                if image.reference_pixel.is_none() {
                    log::warn!("Observed image has no CRPIX1/CRPIX2; using its midpoint");
                }
                image.center()
            }
            ImageKind::Mod => image.size().midpoint(),
        }
    }
}

/// Parse a center string in format "x,y"
fn parse_center(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| "Center must be in format 'x,y'".to_string())?;
    let x = x
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid center x value: {x}"))?;
    let y = y
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid center y value: {y}"))?;
    Ok((x, y))
}

/// Profile parameters from the command line, optionally layered on a JSON file
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// JSON profile configuration; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pixel scale in arcsec/px
    #[arg(long)]
    pub pixel_scale: Option<f64>,

    /// Disk position angle in degrees east of north
    #[arg(long, allow_hyphen_values = true)]
    pub position_angle: Option<f64>,

    /// Disk inclination in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub inclination: Option<f64>,

    /// Distance to the source in parsec
    #[arg(long)]
    pub distance: Option<f64>,

    /// Semi-major axis of the disk in AU
    #[arg(long)]
    pub size: Option<f64>,

    /// Width of each annulus in AU
    #[arg(long)]
    pub annulus_width: Option<f64>,

    /// Number of angular bins
    #[arg(long)]
    pub bins: Option<usize>,

    /// Disk center as "x,y" in 0-based pixels
    #[arg(long, value_parser = parse_center, allow_hyphen_values = true)]
    pub center: Option<(f64, f64)>,
}

impl ProfileArgs {
    /// Combine the config file (or defaults) with command line overrides
    pub fn resolve(&self) -> Result<ProfileConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ProfileConfig::load(path)?,
            None => ProfileConfig::default(),
        };

        if let Some(v) = self.pixel_scale {
            config.pixel_scale = v;
        }
        if let Some(v) = self.position_angle {
            config.position_angle_deg = v;
        }
        if let Some(v) = self.inclination {
            config.inclination_deg = v;
        }
        if let Some(v) = self.distance {
            config.distance_pc = v;
        }
        if let Some(v) = self.size {
            config.max_radius_au = v;
        }
        if let Some(v) = self.annulus_width {
            config.annulus_width_au = v;
        }
        if let Some(v) = self.bins {
            config.n_bins = v;
        }
        if self.center.is_some() {
            config.center = self.center;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photometry::ProfileError;
    use clap::Parser;
    use ndarray::Array2;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        profile: ProfileArgs,
    }

    #[test]
    fn test_parse_center() {
        assert_eq!(parse_center("300.5, 299"), Ok((300.5, 299.0)));
        assert!(parse_center("300").is_err());
        assert!(parse_center("a,b").is_err());
    }

    #[test]
    fn test_overrides_apply_to_defaults() {
        let cli = TestCli::parse_from([
            "test",
            "--pixel-scale",
            "0.004",
            "--bins",
            "36",
            "--center",
            "10,-2",
        ]);
        let config = cli.profile.resolve().unwrap();
        assert_eq!(config.pixel_scale, 0.004);
        assert_eq!(config.n_bins, 36);
        assert_eq!(config.center, Some((10.0, -2.0)));
        assert_eq!(config.distance_pc, ProfileConfig::default().distance_pc);
    }

    #[test]
    fn test_zero_bins_rejected() {
        let cli = TestCli::parse_from(["test", "--bins", "0"]);
        assert!(matches!(
            cli.profile.resolve(),
            Err(ConfigError::Invalid(ProfileError::InvalidBinCount(0)))
        ));
    }

    #[test]
    fn test_negative_bins_rejected_by_parser() {
        assert!(TestCli::try_parse_from(["test", "--bins", "-4"]).is_err());
    }

    #[test]
    fn test_image_kind_center() {
        let image = FitsImage {
            data: Array2::zeros((600, 400)),
            reference_pixel: Some((199.0, 301.0)),
        };
        assert_eq!(ImageKind::Obs.center(&image), (199.0, 301.0));
        assert_eq!(ImageKind::Mod.center(&image), (200.0, 300.0));
    }
}
