//! Sky-plane image panels with offset axes in arcseconds

use ndarray::ArrayView2;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::colormap::diverging_rdbu;
use super::{Result, VizError};

/// An image to draw on sky offset axes
#[derive(Debug, Clone)]
pub struct SkyImagePanel<'a> {
    /// Image data, row 0 at the bottom (south), column 0 at the east edge
    pub image: ArrayView2<'a, f64>,
    /// Pixel scale in arcsec/px
    pub pixel_scale: f64,
    /// Half-width of the displayed field in arcsec
    pub half_field: f64,
    /// Color limits
    pub clim: (f64, f64),
    /// Panel title
    pub title: String,
    /// Draw the Dec. axis labels
    pub show_dec_labels: bool,
}

/// Draw a sky image with ΔRA increasing to the left and ΔDec upwards.
///
/// The chart x coordinate is -ΔRA so the image keeps its natural column
/// order; tick labels are printed as ΔRA.
pub fn draw_sky_image<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &SkyImagePanel,
) -> Result<()> {
    let (height, width) = panel.image.dim();
    if height == 0 || width == 0 {
        return Err(VizError::EmptyData(panel.title.clone()));
    }

    let lim = panel.half_field;
    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 16))
        .margin(8)
        .x_label_area_size(35)
        .y_label_area_size(if panel.show_dec_labels { 45 } else { 10 })
        .build_cartesian_2d(-lim..lim, -lim..lim)?;

    let ra_labels = |x: &f64| format!("{:.1}", -x);
    let no_labels = |_: &f64| String::new();
    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_desc("ΔR.A. (arcsec)")
        .x_label_formatter(&ra_labels)
        .y_labels(5);
    if panel.show_dec_labels {
        mesh.y_desc("ΔDec. (arcsec)");
    } else {
        mesh.y_label_formatter(&no_labels);
    }
    mesh.draw()?;

    let px = panel.pixel_scale;
    let x_origin = -0.5 * width as f64 * px;
    let y_origin = -0.5 * height as f64 * px;
    let (vmin, vmax) = panel.clim;

    let col_range = visible_range(x_origin, px, lim, width);
    let row_range = visible_range(y_origin, px, lim, height);

    chart.draw_series(row_range.flat_map(|row| {
        let image = &panel.image;
        col_range.clone().map(move |col| {
            let x0 = (x_origin + col as f64 * px).max(-lim);
            let x1 = (x_origin + (col + 1) as f64 * px).min(lim);
            let y0 = (y_origin + row as f64 * px).max(-lim);
            let y1 = (y_origin + (row + 1) as f64 * px).min(lim);
            let color = diverging_rdbu(image[[row, col]], vmin, vmax);
            Rectangle::new([(x0, y0), (x1, y1)], color.filled())
        })
    }))?;

    Ok(())
}

/// Indices of pixels whose extent overlaps [-lim, lim]
fn visible_range(origin: f64, px: f64, lim: f64, len: usize) -> std::ops::Range<usize> {
    let first = ((-lim - origin) / px).floor().max(0.0) as usize;
    let last = (((lim - origin) / px).ceil().max(0.0) as usize).min(len);
    first.min(last)..last
}

/// Draw a vertical color bar for the diverging map over `clim`.
pub fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    clim: (f64, f64),
    label: &str,
) -> Result<()> {
    let (vmin, vmax) = clim;
    let mut chart = ChartBuilder::on(area)
        .margin_top(30)
        .margin_bottom(35)
        .margin_right(5)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..1.0, vmin..vmax)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(label)
        .y_labels(5)
        .draw()?;

    let steps = 128;
    let step = (vmax - vmin) / steps as f64;
    chart.draw_series((0..steps).map(|i| {
        let y0 = vmin + i as f64 * step;
        let color = diverging_rdbu(y0 + 0.5 * step, vmin, vmax);
        Rectangle::new([(0.0, y0), (1.0, y0 + step)], color.filled())
    }))?;

    Ok(())
}
