//! Azimuthally binned radial brightness profile of a disk image
//!
//! Loads an observed or model FITS image, measures the flux in nested
//! elliptical annuli split into equal position-angle bins, prints the
//! normalized matrix and optionally writes it as FITS and as a PNG figure.

use clap::Parser;
use radsym::export::{format_profile_table, write_profile};
use radsym::photometry::extract_profile;
use radsym::plot::plot_radial_profiles;
use radsym::shared_args::{ImageKind, ProfileArgs};
use shared::fits::read_primary_image;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Radial Profile",
    about = "Extracts per-position-angle radial brightness profiles from a disk image",
    long_about = None
)]
struct Args {
    /// Input FITS image
    input: PathBuf,

    /// Image origin: observation (header center) or model (midpoint center)
    #[arg(long, value_enum, default_value_t = ImageKind::Obs)]
    kind: ImageKind,

    #[command(flatten)]
    profile: ProfileArgs,

    /// Write the normalized matrix to this FITS file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Save a radial profile figure to this PNG file
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Radii in AU marked with vertical lines on the figure (both sides)
    #[arg(long, value_delimiter = ',')]
    marker: Vec<f64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = args.profile.resolve()?;
    let image = read_primary_image(&args.input)?;
    let center = args.kind.center(&image);
    let params = config.to_params(center);

    println!("Radial Brightness Profile");
    println!("=========================");
    println!("Image: {} ({})", args.input.display(), image.size());
    println!(
        "Center: ({:.2}, {:.2}) px, pixel scale {:.4} arcsec/px, distance {:.2} pc",
        params.geometry.center.0,
        params.geometry.center.1,
        config.pixel_scale,
        config.distance_pc
    );
    println!(
        "Disk: PA {:.1} deg, inclination {:.1} deg, size {:.1} AU, annulus width {:.1} AU",
        config.position_angle_deg,
        config.inclination_deg,
        config.max_radius_au,
        config.annulus_width_au
    );

    let profile = extract_profile(&image.data.view(), &params)?;
    println!("Number of annular apertures: {}", profile.n_annuli());
    println!();
    print!("{}", format_profile_table(&profile));

    if let Some(path) = &args.output {
        write_profile(path, &profile, &config)?;
        println!("\nMatrix written to {}", path.display());
    }

    if let Some(path) = &args.plot {
        plot_radial_profiles(&profile, &args.marker, path)?;
        println!("Figure saved to {}", path.display());
    }

    Ok(())
}
