//! Shared components and utilities for radsym
//!
//! Image-level building blocks used by the profile extractor and its tools:
//! unit conversions, FITS I/O, image geometry, rotation, pivot lookups and
//! plotting helpers.

#[cfg(feature = "frame-writer")]
pub mod fits;
pub mod image_proc;
pub mod image_size;
pub mod test_util;
pub mod units;
#[cfg(feature = "plotting")]
pub mod viz;

pub use image_size::ImageSize;
