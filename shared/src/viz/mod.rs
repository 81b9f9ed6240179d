//! Visualization toolkit for disk images and profiles.

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

pub mod colormap;
pub mod sky_image;

pub use colormap::{diverging_rdbu, rescale_to_range};
pub use sky_image::{draw_colorbar, draw_sky_image, SkyImagePanel};

/// Error types for visualization operations.
#[derive(Debug, Error)]
pub enum VizError {
    /// Plot backend failure (file creation, encoding, drawing).
    #[error("Plotting error: {0}")]
    Backend(String),

    /// Nothing to draw.
    #[error("No data to plot: {0}")]
    EmptyData(String),

    /// Image cannot be scaled for display.
    #[error("Invalid normalization: {0}")]
    InvalidNormalization(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for VizError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        VizError::Backend(err.to_string())
    }
}

/// Standard Result type for all visualization operations.
pub type Result<T> = std::result::Result<T, VizError>;
