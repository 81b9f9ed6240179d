//! Run configuration and radiative-transfer parameter files
//!
//! [`ProfileConfig`] holds every profile parameter and round-trips through
//! JSON. [`ParameterFile`] reads the `key=value ! comment` files written next to
//! radiative-transfer model images (`input.dat`, `Image_*.out`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::photometry::{DiskGeometry, ProfileError, ProfileParams};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid profile parameters: {0}")]
    Invalid(#[from] ProfileError),
}

#[derive(Error, Debug)]
pub enum ParameterFileError {
    #[error("Failed to read parameter file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Missing key '{0}'")]
    MissingKey(String),
    #[error("Cannot parse value '{value}' of key '{key}'")]
    InvalidValue { key: String, value: String },
    #[error("Invalid model image: {0}")]
    InvalidImage(String),
}

/// Parameters for one brightness profile extraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Pixel scale in arcsec/px
    pub pixel_scale: f64,
    /// Disk position angle in degrees east of north
    pub position_angle_deg: f64,
    /// Disk inclination in degrees
    pub inclination_deg: f64,
    /// Distance in parsec
    pub distance_pc: f64,
    /// Semi-major axis of the disk in AU
    pub max_radius_au: f64,
    /// Annulus width in AU
    pub annulus_width_au: f64,
    /// Number of angular bins
    pub n_bins: usize,
    /// Explicit disk center (x, y) in 0-based pixels; the image's own center
    /// is used when absent
    #[serde(default)]
    pub center: Option<(f64, f64)>,
}

impl Default for ProfileConfig {
    /// PDS 70 continuum observation
    fn default() -> Self {
        Self {
            pixel_scale: 0.020,
            position_angle_deg: 158.6,
            inclination_deg: 49.7,
            distance_pc: 113.43,
            max_radius_au: 120.0,
            annulus_width_au: 4.0,
            n_bins: 18,
            center: None,
        }
    }
}

impl ProfileConfig {
    /// Load a configuration from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        self.to_params((0.0, 0.0)).validate()
    }

    /// Extraction parameters, centered on `self.center` or `image_center`
    pub fn to_params(&self, image_center: (f64, f64)) -> ProfileParams {
        ProfileParams {
            geometry: DiskGeometry {
                center: self.center.unwrap_or(image_center),
                position_angle_deg: self.position_angle_deg,
                inclination_deg: self.inclination_deg,
                distance_pc: self.distance_pc,
                pixel_scale: self.pixel_scale,
            },
            max_radius_au: self.max_radius_au,
            annulus_width_au: self.annulus_width_au,
            n_bins: self.n_bins,
        }
    }
}

/// Contents of a `key=value ! comment` parameter file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterFile {
    entries: HashMap<String, String>,
}

impl ParameterFile {
    pub fn load(path: &Path) -> Result<Self, ParameterFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ParameterFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Parse parameter text. Lines without `=` are ignored; a later duplicate
    /// key replaces an earlier one.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| {
                let (key, rest) = line.split_once('=')?;
                let value = rest.split('!').next().unwrap_or_default();
                Some((key.trim().to_string(), value.trim().to_string()))
            })
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Self { entries }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Typed value of `key`
    pub fn get<T: FromStr>(&self, key: &str) -> Result<T, ParameterFileError> {
        let raw = self
            .get_str(key)
            .ok_or_else(|| ParameterFileError::MissingKey(key.to_string()))?;
        raw.parse().map_err(|_| ParameterFileError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Observer settings of a model image (`MCobs:*` keys)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelImageParams {
    /// Field of view in arcsec
    pub fov: f64,
    /// Pixels per side
    pub npix: f64,
    /// Observer azimuth in degrees
    pub phi: f64,
    /// Observer inclination in degrees
    pub theta: f64,
}

impl ModelImageParams {
    pub fn from_parameters(params: &ParameterFile) -> Result<Self, ParameterFileError> {
        let image = Self {
            fov: params.get("MCobs:fov")?,
            npix: params.get("MCobs:npix")?,
            phi: params.get("MCobs:phi")?,
            theta: params.get("MCobs:theta")?,
        };
        if !(image.npix > 0.0 && image.fov > 0.0) {
            return Err(ParameterFileError::InvalidImage(format!(
                "fov {} arcsec over {} pixels",
                image.fov, image.npix
            )));
        }
        Ok(image)
    }

    pub fn load(path: &Path) -> Result<Self, ParameterFileError> {
        Self::from_parameters(&ParameterFile::load(path)?)
    }

    /// Pixel scale in arcsec/px
    pub fn pixel_scale(&self) -> f64 {
        self.fov / self.npix
    }
}

/// Source distance in parsec from a model `input.dat`
pub fn read_distance(path: &Path) -> Result<f64, ParameterFileError> {
    ParameterFile::load(path)?.get("Distance")
}
