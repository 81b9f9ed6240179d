//! Test helpers: workspace output directory and synthetic disk images

use ndarray::Array2;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};

use crate::units::deg_to_rad;

/// Workspace-level directory for files written by tests
static OUTPUT_DIR: Lazy<PathBuf> = Lazy::new(|| {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .unwrap_or(manifest)
        .join("test_output")
});

/// Create (if needed) and return the `test_output/` directory at the
/// workspace root
pub fn get_output_dir() -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(&*OUTPUT_DIR)?;
    Ok(OUTPUT_DIR.clone())
}

/// Constant-valued image of shape (height, width)
pub fn uniform_image(height: usize, width: usize, value: f64) -> Array2<f64> {
    Array2::from_elem((height, width), value)
}

/// Parameters of a synthetic inclined ring
#[derive(Debug, Clone, Copy)]
pub struct RingDisk {
    /// Disk center (x, y) in pixels
    pub center: (f64, f64),
    /// Ring radius along the major axis in pixels
    pub radius: f64,
    /// Gaussian radial width (sigma) in pixels
    pub width: f64,
    /// Peak brightness
    pub amplitude: f64,
    /// Inclination in degrees (0 = face on)
    pub inclination_deg: f64,
    /// Position angle in degrees east of north
    pub position_angle_deg: f64,
}

impl RingDisk {
    /// Render the ring on a (height, width) grid
    ///
    /// Each pixel is deprojected into the disk plane (major axis rotated by
    /// PA - 90 deg from +x, minor axis compressed by cos(inc)) and assigned a
    /// Gaussian in deprojected radius.
    pub fn render(&self, height: usize, width: usize) -> Array2<f64> {
        let theta = deg_to_rad(self.position_angle_deg - 90.0);
        let (sin_t, cos_t) = theta.sin_cos();
        let cos_i = deg_to_rad(self.inclination_deg).cos().max(1e-6);
        let (xc, yc) = self.center;

        Array2::from_shape_fn((height, width), |(row, col)| {
            let dx = col as f64 - xc;
            let dy = row as f64 - yc;
            let u = dx * cos_t + dy * sin_t;
            let v = (-dx * sin_t + dy * cos_t) / cos_i;
            let r = (u * u + v * v).sqrt();
            let offset = (r - self.radius) / self.width;
            self.amplitude * (-0.5 * offset * offset).exp()
        })
    }
}
