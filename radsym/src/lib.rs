//! Radial and azimuthal brightness profiles of circumstellar disks
//!
//! The core of the crate is [`photometry`]: nested elliptical annuli matched to
//! the projected disk are laid over an image, split into equal polar-angle
//! sectors, and the flux in every (sector, annulus) cell is summed into a
//! brightness matrix normalized per sector. Around it sit the run
//! configuration ([`config`]), model image preparation ([`prepare`]) and the
//! figures ([`plot`]) used by the command line tools.

pub mod config;
pub mod export;
pub mod photometry;
pub mod plot;
pub mod prepare;
pub mod shared_args;

pub use config::{ModelImageParams, ParameterFile, ProfileConfig};
pub use photometry::{extract_profile, BrightnessProfile, ProfileError, ProfileParams};
