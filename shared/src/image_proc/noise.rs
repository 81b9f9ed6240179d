//! Noise generation utilities for synthetic disk images.
//!
//! Provides seeded Gaussian noise fields so tests and demos can add a
//! reproducible background to synthetic disks. Seeds go through `ChaCha8Rng`,
//! so a given seed yields the same field on every platform.

use ndarray::{Array2, ArrayViewMut2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, NormalError};

/// Generate a 2D array of normally distributed values for testing purposes.
///
/// This function creates a deterministic array filled with values sampled from
/// a normal (Gaussian) distribution. It's specifically designed for unit tests
/// and simulation validation where reproducible noise patterns are needed.
///
/// # Arguments
/// * `size` - Tuple of (height, width) for the output array dimensions
/// * `mean` - Mean value of the normal distribution
/// * `std_dev` - Standard deviation of the normal distribution
/// * `seed` - Random seed for deterministic output
///
/// # Returns
/// A 2D array with values sampled from Normal(mean, std_dev), or
/// `NormalError::BadVariance` if the standard deviation is negative or
/// non-finite.
///
/// # Example
/// ```
/// use shared::image_proc::noise::simple_normal_array;
///
/// // Create 10x10 array with mean=100, std_dev=10, seed=42
/// let noise = simple_normal_array((10, 10), 100.0, 10.0, 42).unwrap();
/// assert_eq!(noise.dim(), (10, 10));
/// ```
pub fn simple_normal_array(
    size: (usize, usize),
    mean: f64,
    std_dev: f64,
    seed: u64,
) -> Result<Array2<f64>, NormalError> {
    // rand_distr accepts a negative std_dev and mirrors the distribution
    if !(std_dev.is_finite() && std_dev >= 0.0) {
        return Err(NormalError::BadVariance);
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal_dist = Normal::new(mean, std_dev)?;
    Ok(Array2::from_shape_fn(size, |_| normal_dist.sample(&mut rng)))
}

/// Add zero-mean Gaussian background noise to an image in place.
pub fn add_background_noise(
    mut image: ArrayViewMut2<f64>,
    std_dev: f64,
    seed: u64,
) -> Result<(), NormalError> {
    let noise = simple_normal_array(image.dim(), 0.0, std_dev, seed)?;
    image += &noise;
    Ok(())
}
