//! Side-by-side figure of observed and model Qphi images
//!
//! Both images are normalized by their own peak brightness (the observed peak
//! is given, the model peak is sampled at a reference ring position) and drawn
//! on one diverging color scale.

use clap::Parser;
use radsym::config::ModelImageParams;
use radsym::plot::{plot_qphi_comparison, QphiImage, Scaling};
use shared::fits::read_primary_image;
use shared::image_proc::pivot;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Qphi Compare",
    about = "Plots observed and model Qphi images on a common normalized scale",
    long_about = None
)]
struct Args {
    /// Observed Qphi FITS image
    #[arg(long)]
    observed: PathBuf,

    /// Rotated model Qphi FITS image
    #[arg(long, default_value = "../Qphi_model_rotated.fits")]
    model: PathBuf,

    /// Model image parameter file giving the model pixel scale
    #[arg(long, default_value = "../Image_jband.out")]
    image_out: PathBuf,

    /// Peak brightness of the observation
    #[arg(long, default_value_t = 3.228573595978149)]
    observed_peak: f64,

    /// Pixel scale of the observation in arcsec/px
    #[arg(long, default_value_t = 0.01226)]
    observed_pixel_scale: f64,

    /// Radius in AU where the model peak is sampled
    #[arg(long, default_value_t = 54.64)]
    peak_radius: f64,

    /// Position angle in degrees where the model peak is sampled
    #[arg(long, default_value_t = 158.6)]
    peak_pa: f64,

    /// Distance to the source in parsec
    #[arg(long, default_value_t = 113.43)]
    distance: f64,

    /// Half-width of the displayed field in arcsec
    #[arg(long, default_value_t = 1.2)]
    half_field: f64,

    /// Rescale each image to [-1, 1] by its min and max instead of its peak
    #[arg(long)]
    rescale: bool,

    /// Output PNG path
    #[arg(long, default_value = "../Qphi.png")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let observed = read_primary_image(&args.observed)?;
    let model = read_primary_image(&args.model)?;
    let model_pixel_scale = ModelImageParams::load(&args.image_out)?.pixel_scale();

    let model_peak = pivot(
        &model.data.view(),
        args.peak_radius,
        args.peak_pa,
        model_pixel_scale,
        args.distance,
    )?;

    println!("Qphi Comparison");
    println!("===============");
    println!(
        "{:<10} {:<14} {:<16} {:<14}",
        "Image", "Size", "Scale (\"/px)", "Peak value"
    );
    println!("{:-<56}", "");
    println!(
        "{:<10} {:<14} {:<16.5} {:<14.6e}",
        "observed",
        observed.size().to_string(),
        args.observed_pixel_scale,
        args.observed_peak
    );
    println!(
        "{:<10} {:<14} {:<16.5} {:<14.6e}",
        "model",
        model.size().to_string(),
        model_pixel_scale,
        model_peak.value
    );

    let (observed_scaling, model_scaling) = if args.rescale {
        (Scaling::MinMax, Scaling::MinMax)
    } else {
        (Scaling::Peak(args.observed_peak), Scaling::Peak(model_peak.value))
    };

    plot_qphi_comparison(
        &QphiImage {
            image: observed.data.view(),
            pixel_scale: args.observed_pixel_scale,
            scaling: observed_scaling,
            title: "Observation".to_string(),
        },
        &QphiImage {
            image: model.data.view(),
            pixel_scale: model_pixel_scale,
            scaling: model_scaling,
            title: "Model".to_string(),
        },
        args.half_field,
        &args.output,
    )?;
    println!("\nFigure saved to {}", args.output.display());

    Ok(())
}
