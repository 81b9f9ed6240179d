//! Figures for brightness profiles and Qphi image comparisons

use std::path::Path;

use ndarray::{Array2, ArrayView2};
use plotters::prelude::*;
use shared::viz::{
    draw_colorbar, draw_sky_image, rescale_to_range, Result, SkyImagePanel, VizError,
};

use crate::photometry::BrightnessProfile;

/// Rows of the profile drawn in one panel: a bin and, for an even bin count,
/// the diametrically opposite bin plotted at negative radius.
pub fn profile_panels(n_bins: usize) -> Vec<(usize, Option<usize>)> {
    if n_bins % 2 == 0 {
        let half = n_bins / 2;
        (0..half).map(|i| (i, Some(i + half))).collect()
    } else {
        (0..n_bins).map(|i| (i, None)).collect()
    }
}

/// Padded (min, max) of the finite values, falling back to [0, 1]
fn value_range<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let lo = lo.min(0.0);
    let pad = 0.05 * (hi - lo).max(1e-12);
    (lo - pad, hi + pad)
}

/// Plot normalized brightness against radius, one stacked panel per position
/// angle pair.
///
/// Each panel shows bin `i` at +r and bin `i + N/2` at -r, labelled with the
/// angle of bin `i`. Vertical lines are drawn at ±`markers_au`.
pub fn plot_radial_profiles(
    profile: &BrightnessProfile,
    markers_au: &[f64],
    save_path: &Path,
) -> Result<()> {
    if profile.n_annuli() == 0 || profile.n_bins() == 0 {
        return Err(VizError::EmptyData("brightness profile".to_string()));
    }

    let panels = profile_panels(profile.n_bins());
    let r_max = profile
        .radii_au
        .iter()
        .chain(markers_au.iter())
        .fold(0.0_f64, |acc, r| acc.max(r.abs()));
    let r_lim = 1.05 * r_max;
    let (y_min, y_max) = value_range(profile.normalized.iter());

    let panel_height = 110;
    let root = BitMapBackend::new(save_path, (600, panel_height * panels.len() as u32 + 60))
        .into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.margin(10, 10, 10, 10);
    let areas = root.split_evenly((panels.len(), 1));

    let no_labels = |_: &f64| String::new();
    let last = panels.len() - 1;
    for (i, (area, &(front, back))) in areas.iter().zip(panels.iter()).enumerate() {
        let mut chart = ChartBuilder::on(area)
            .x_label_area_size(if i == last { 35 } else { 0 })
            .y_label_area_size(45)
            .build_cartesian_2d(-r_lim..r_lim, y_min..y_max)?;

        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .y_desc(format!("{:.1}°", profile.bin_centers_deg[front]))
            .y_label_formatter(&no_labels);
        if i == last {
            mesh.x_desc("r (AU)");
        } else {
            mesh.x_label_formatter(&no_labels);
        }
        mesh.draw()?;

        let row = profile.normalized.row(front);
        chart.draw_series(
            profile
                .radii_au
                .iter()
                .zip(row.iter())
                .map(|(&r, &v)| Circle::new((r, v), 2, RED.filled())),
        )?;
        if let Some(back) = back {
            let row = profile.normalized.row(back);
            chart.draw_series(
                profile
                    .radii_au
                    .iter()
                    .zip(row.iter())
                    .map(|(&r, &v)| Circle::new((-r, v), 2, RED.filled())),
            )?;
        }

        for &marker in markers_au {
            for x in [marker, -marker] {
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![(x, y_min), (x, y_max)],
                    BLUE,
                )))?;
            }
        }
    }

    root.present()?;
    log::info!("Radial profile plot saved to {}", save_path.display());
    Ok(())
}

/// How an image is scaled before display
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scaling {
    /// Divide by a reference peak value
    Peak(f64),
    /// Map the image minimum to -1 and its maximum to +1
    MinMax,
}

/// One side of a Qphi comparison figure
#[derive(Debug, Clone)]
pub struct QphiImage<'a> {
    pub image: ArrayView2<'a, f64>,
    /// Pixel scale in arcsec/px
    pub pixel_scale: f64,
    pub scaling: Scaling,
    pub title: String,
}

impl QphiImage<'_> {
    fn scaled(&self) -> Result<Array2<f64>> {
        match self.scaling {
            Scaling::Peak(peak) => {
                if !peak.is_finite() || peak == 0.0 {
                    return Err(VizError::InvalidNormalization(format!(
                        "{}: peak value {peak}",
                        self.title
                    )));
                }
                Ok(self.image.mapv(|v| v / peak))
            }
            Scaling::MinMax => Ok(rescale_to_range(&self.image.to_owned(), -1.0, 1.0)),
        }
    }
}

/// Draw the observed and model images side by side on a shared diverging
/// color scale clipped to [-1, 1], cropped to ±`half_field` arcsec.
pub fn plot_qphi_comparison(
    observed: &QphiImage,
    model: &QphiImage,
    half_field: f64,
    save_path: &Path,
) -> Result<()> {
    let observed_data = observed.scaled()?;
    let model_data = model.scaled()?;
    let clim = (-1.0, 1.0);

    let root = BitMapBackend::new(save_path, (1000, 480)).into_drawing_area();
    root.fill(&WHITE)?;
    let (left, rest) = root.split_horizontally(450);
    let (right, colorbar) = rest.split_horizontally(420);

    draw_sky_image(
        &left,
        &SkyImagePanel {
            image: observed_data.view(),
            pixel_scale: observed.pixel_scale,
            half_field,
            clim,
            title: observed.title.clone(),
            show_dec_labels: true,
        },
    )?;
    draw_sky_image(
        &right,
        &SkyImagePanel {
            image: model_data.view(),
            pixel_scale: model.pixel_scale,
            half_field,
            clim,
            title: model.title.clone(),
            show_dec_labels: false,
        },
    )?;
    draw_colorbar(&colorbar, clim, "Normalized Qphi signal")?;

    root.present()?;
    log::info!("Qphi comparison saved to {}", save_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_bins_pair_opposites() {
        let panels = profile_panels(6);
        assert_eq!(panels, vec![(0, Some(3)), (1, Some(4)), (2, Some(5))]);
    }

    #[test]
    fn test_odd_bins_get_own_panels() {
        let panels = profile_panels(3);
        assert_eq!(panels, vec![(0, None), (1, None), (2, None)]);
    }

    #[test]
    fn test_value_range() {
        let values = [0.2, 1.0, f64::NAN, 0.5];
        let (lo, hi) = value_range(values.iter());
        assert!(lo < 0.0 && lo > -0.1);
        assert!(hi > 1.0 && hi < 1.1);

        assert_eq!(value_range([f64::NAN].iter()), (0.0, 1.0));
    }

    #[test]
    fn test_peak_scaling() {
        let image = ndarray::array![[2.0, -4.0], [8.0, 0.0]];
        let panel = QphiImage {
            image: image.view(),
            pixel_scale: 0.01,
            scaling: Scaling::Peak(8.0),
            title: "obs".to_string(),
        };
        let scaled = panel.scaled().unwrap();
        assert_eq!(scaled, ndarray::array![[0.25, -0.5], [1.0, 0.0]]);

        let zero_peak = QphiImage {
            scaling: Scaling::Peak(0.0),
            ..panel.clone()
        };
        assert!(matches!(
            zero_peak.scaled(),
            Err(VizError::InvalidNormalization(_))
        ));
    }

    #[test]
    fn test_minmax_scaling() {
        let image = ndarray::array![[0.0, 5.0], [10.0, 2.5]];
        let panel = QphiImage {
            image: image.view(),
            pixel_scale: 0.01,
            scaling: Scaling::MinMax,
            title: "mod".to_string(),
        };
        let scaled = panel.scaled().unwrap();
        assert_eq!(scaled, ndarray::array![[-1.0, 0.0], [1.0, -0.5]]);
    }
}
