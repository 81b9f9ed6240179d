//! Image processing primitives for disk images
//!
//! Rotation about the image center, pivot lookups at a sky position and
//! seeded noise fields for synthetic data.

pub mod noise;
pub mod pivot;
pub mod rotate;

pub use pivot::{pivot, PivotError, PivotSample};
pub use rotate::rotate;
