//! Rotate radiative-transfer model images to the observed disk orientation
//!
//! Qphi (near-infrared polarized light) models are rotated and written as plain
//! FITS; ALMA continuum models are rotated and get beam and sky coordinate
//! keywords. The peak brightness at a reference ring position is reported.

use clap::{Parser, ValueEnum};
use radsym::config::{read_distance, ModelImageParams};
use radsym::prepare::{
    peak_flux, prepare_alma_image, prepare_qphi_image, AlmaHeader, PeakPosition,
};
use shared::fits::{read_primary_image, write_primary_image};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModelBand {
    /// Near-infrared polarized intensity
    Qphi,
    /// Millimetre continuum
    Alma,
}

impl ModelBand {
    fn default_image_out(&self) -> &'static str {
        match self {
            ModelBand::Qphi => "../Image_jband.out",
            ModelBand::Alma => "../Image_alma.out",
        }
    }

    fn default_output(&self) -> &'static str {
        match self {
            ModelBand::Qphi => "../Qphi_model_rotated.fits",
            ModelBand::Alma => "../alma_model_rotated.fits",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "Prepare Images",
    about = "Rotates model images to the disk position angle and writes them as FITS",
    long_about = None
)]
struct Args {
    /// Model FITS image
    input: PathBuf,

    /// Which kind of model image this is
    #[arg(long, value_enum, default_value_t = ModelBand::Qphi)]
    band: ModelBand,

    /// Disk position angle in degrees east of north
    #[arg(long, default_value_t = 158.6)]
    position_angle: f64,

    /// Model input parameter file holding the source distance
    #[arg(long, default_value = "../input.dat")]
    input_dat: PathBuf,

    /// Model image parameter file (defaults per band)
    #[arg(long)]
    image_out: Option<PathBuf>,

    /// Rotated FITS output path (defaults per band)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Radius of the peak brightness reference in AU
    #[arg(long, default_value_t = PeakPosition::default().r_au)]
    peak_radius: f64,

    /// Position angle of the peak brightness reference in degrees
    #[arg(long, default_value_t = PeakPosition::default().position_angle_deg)]
    peak_pa: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let image_out = args
        .image_out
        .clone()
        .unwrap_or_else(|| PathBuf::from(args.band.default_image_out()));
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(args.band.default_output()));

    let distance = read_distance(&args.input_dat)?;
    let model = ModelImageParams::load(&image_out)?;
    let pixel_scale = model.pixel_scale();
    let image = read_primary_image(&args.input)?;

    println!("Model Image Preparation");
    println!("=======================");
    println!("Input: {} ({})", args.input.display(), image.size());
    println!(
        "Model: fov {:.3} arcsec, {} px, pixel scale {:.5} arcsec/px, phi {:.1} deg, theta {:.1} deg",
        model.fov, model.npix, pixel_scale, model.phi, model.theta
    );
    println!("Distance: {distance:.2} pc");
    println!("Disk position angle: {:.1} deg", args.position_angle);

    let rotated = match args.band {
        ModelBand::Qphi => {
            let rotated = prepare_qphi_image(&image.data.view(), args.position_angle);
            write_primary_image(&output, &rotated.view(), &[])?;
            rotated
        }
        ModelBand::Alma => {
            let prepared = prepare_alma_image(
                &image.data.view(),
                args.position_angle,
                pixel_scale,
                &AlmaHeader::default(),
            );
            write_primary_image(&output, &prepared.data.view(), &prepared.cards)?;
            prepared.data
        }
    };
    println!("Rotated image written to {}", output.display());

    let position = PeakPosition {
        r_au: args.peak_radius,
        position_angle_deg: args.peak_pa,
    };
    let peak = peak_flux(&rotated.view(), position, pixel_scale, distance)?;
    println!();
    println!(
        "{:<12} {:<12} {:<14} {:<14}",
        "x (px)", "y (px)", "Scale (\"/px)", "Peak value"
    );
    println!("{:-<54}", "");
    println!(
        "{:<12.2} {:<12.2} {:<14.5} {:<14.6e}",
        peak.x, peak.y, pixel_scale, peak.value
    );

    Ok(())
}
