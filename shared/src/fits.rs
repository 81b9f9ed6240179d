//! FITS file I/O for disk images
//!
//! Reads the primary image of observed (ALMA, Qphi) and model FITS files into
//! `Array2<f64>` and writes processed images back with an ordered set of header
//! cards. Array indexing is `[row, col]` with row = FITS y axis and col = FITS x
//! axis; no flipping is applied, so pixel coordinates match the header.

use fitsio::images::{ImageDescription, ImageType};
use fitsio::FitsFile;
use ndarray::{Array2, ArrayView2};
use std::path::Path;
use thiserror::Error;

use crate::image_size::ImageSize;

/// Errors that can occur during FITS file operations
#[derive(Error, Debug)]
pub enum FitsError {
    #[error("FITS I/O error: {0}")]
    FitsIo(#[from] fitsio::errors::Error),
    #[error("Primary HDU is not an image with at least 2 axes (NAXIS = {0})")]
    NotAnImage(i64),
    #[error("Cannot reshape image data: {0}")]
    InvalidShape(String),
    #[error("Refusing to write an empty {width}x{height} image")]
    EmptyImage { width: usize, height: usize },
}

/// Value of a single header card
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Str(String),
    Float(f64),
    Int(i64),
}

/// An ordered header keyword/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCard {
    pub key: String,
    pub value: HeaderValue,
}

impl HeaderCard {
    pub fn string(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: HeaderValue::Str(value.to_string()),
        }
    }

    pub fn float(key: &str, value: f64) -> Self {
        Self {
            key: key.to_string(),
            value: HeaderValue::Float(value),
        }
    }

    pub fn int(key: &str, value: i64) -> Self {
        Self {
            key: key.to_string(),
            value: HeaderValue::Int(value),
        }
    }
}

/// A 2D image read from the primary HDU
#[derive(Debug, Clone)]
pub struct FitsImage {
    /// Pixel data, shape (NAXIS2, NAXIS1)
    pub data: Array2<f64>,
    /// CRPIX1/CRPIX2 converted to 0-based (x, y) pixel coordinates, if present
    pub reference_pixel: Option<(f64, f64)>,
}

impl FitsImage {
    /// Image dimensions
    pub fn size(&self) -> ImageSize {
        ImageSize::of_view(&self.data.view())
    }

    /// Disk center as (x, y): the header reference pixel when present,
    /// otherwise the geometric midpoint.
    pub fn center(&self) -> (f64, f64) {
        self.reference_pixel
            .unwrap_or_else(|| self.size().midpoint())
    }
}

/// Read the primary image of a FITS file
///
/// Images with more than two axes (radio cubes laid out as stokes × frequency ×
/// y × x) are reduced to their first 2D plane.
///
/// # Arguments
/// * `path` - Path to the FITS file
///
/// # Returns
/// * `Result<FitsImage, FitsError>` - Image data and optional reference pixel
pub fn read_primary_image<P: AsRef<Path>>(path: P) -> Result<FitsImage, FitsError> {
    let mut fptr = FitsFile::open(path.as_ref())?;
    let hdu = fptr.primary_hdu()?;

    let naxis = hdu.read_key::<i64>(&mut fptr, "NAXIS")?;
    if naxis < 2 {
        return Err(FitsError::NotAnImage(naxis));
    }
    let naxis1 = hdu.read_key::<i64>(&mut fptr, "NAXIS1")? as usize;
    let naxis2 = hdu.read_key::<i64>(&mut fptr, "NAXIS2")? as usize;

    let mut image_data: Vec<f64> = hdu.read_image(&mut fptr)?;
    let plane = naxis1 * naxis2;
    if image_data.len() < plane {
        return Err(FitsError::InvalidShape(format!(
            "expected at least {plane} values, found {}",
            image_data.len()
        )));
    }
    if image_data.len() > plane {
        log::debug!(
            "Keeping first {}x{} plane of {}-axis image",
            naxis1,
            naxis2,
            naxis
        );
        image_data.truncate(plane);
    }

    let data = Array2::from_shape_vec((naxis2, naxis1), image_data)
        .map_err(|e| FitsError::InvalidShape(e.to_string()))?;

    let crpix1 = hdu.read_key::<f64>(&mut fptr, "CRPIX1").ok();
    let crpix2 = hdu.read_key::<f64>(&mut fptr, "CRPIX2").ok();
    // FITS reference pixels are 1-based
    let reference_pixel = match (crpix1, crpix2) {
        (Some(x), Some(y)) => Some((x - 1.0, y - 1.0)),
        _ => None,
    };

    Ok(FitsImage {
        data,
        reference_pixel,
    })
}

/// Write a 2D image as the primary HDU of a new FITS file, overwriting any
/// existing file, followed by the given header cards in order.
pub fn write_primary_image<P: AsRef<Path>>(
    path: P,
    data: &ArrayView2<f64>,
    cards: &[HeaderCard],
) -> Result<(), FitsError> {
    let (height, width) = data.dim();
    if width == 0 || height == 0 {
        return Err(FitsError::EmptyImage { width, height });
    }
    let image_description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: &[height, width],
    };

    let mut fptr = FitsFile::create(path.as_ref())
        .with_custom_primary(&image_description)
        .overwrite()
        .open()?;
    let hdu = fptr.primary_hdu()?;

    let flat_data: Vec<f64> = data.iter().copied().collect();
    hdu.write_image(&mut fptr, &flat_data)?;

    for card in cards {
        match &card.value {
            HeaderValue::Str(s) => hdu.write_key(&mut fptr, &card.key, s.as_str())?,
            HeaderValue::Float(v) => hdu.write_key(&mut fptr, &card.key, *v)?,
            HeaderValue::Int(v) => hdu.write_key(&mut fptr, &card.key, *v)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    #[test]
    fn test_fits_error_display() {
        let error = FitsError::NotAnImage(0);
        assert!(error.to_string().contains("NAXIS = 0"));

        let error = FitsError::InvalidShape("bad".to_string());
        assert!(error.to_string().contains("Cannot reshape image data: bad"));
    }

    #[test]
    fn test_empty_image_is_not_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.fits");

        let array = Array2::<f64>::zeros((18, 0));
        let result = write_primary_image(&path, &array.view(), &[]);
        assert!(matches!(
            result,
            Err(FitsError::EmptyImage {
                width: 0,
                height: 18
            })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_roundtrip_non_square() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wide.fits");

        let array = Array2::from_shape_fn((3, 5), |(r, c)| (r * 10 + c) as f64);
        write_primary_image(&path, &array.view(), &[]).unwrap();

        let image = read_primary_image(&path).unwrap();
        assert_eq!(image.data.dim(), (3, 5));
        assert_relative_eq!(image.data[[2, 4]], 24.0);
        assert_relative_eq!(image.data[[0, 1]], 1.0);
        assert!(image.reference_pixel.is_none());
        assert_eq!(image.center(), (2.5, 1.5));
    }

    #[test]
    fn test_reference_pixel_is_zero_based() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crpix.fits");

        let array = Array2::<f64>::ones((8, 8));
        let cards = vec![
            HeaderCard::float("CRPIX1", 4.0),
            HeaderCard::float("CRPIX2", 5.0),
            HeaderCard::string("BUNIT", "mJy/beam"),
            HeaderCard::int("EXAMPLE", 3),
        ];
        write_primary_image(&path, &array.view(), &cards).unwrap();

        let image = read_primary_image(&path).unwrap();
        assert_eq!(image.reference_pixel, Some((3.0, 4.0)));
        assert_eq!(image.center(), (3.0, 4.0));
    }
}
