//! End-to-end profile extraction on synthetic disk images

use std::collections::HashSet;

use approx::assert_relative_eq;
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use radsym::config::ProfileConfig;
use radsym::photometry::{
    build_annuli, extract_profile, extract_profile_from_annuli, normalize_rows,
    rasterize_annulus, AngularBins, AnnulusGeometry, DiskGeometry, ProfileParams,
};
use radsym::shared_args::ImageKind;
use shared::fits::{read_primary_image, write_primary_image, HeaderCard};
use shared::image_proc::noise::add_background_noise;
use shared::test_util::{uniform_image, RingDisk};
use shared::ImageSize;

/// 0.02"/px at 100 pc: one pixel is 2 AU
fn face_on(center: (f64, f64)) -> DiskGeometry {
    DiskGeometry {
        center,
        position_angle_deg: 90.0,
        inclination_deg: 0.0,
        distance_pc: 100.0,
        pixel_scale: 0.02,
    }
}

fn ring_image() -> (Array2<f64>, ProfileParams) {
    let geometry = DiskGeometry {
        center: (100.0, 100.0),
        position_angle_deg: 158.6,
        inclination_deg: 49.7,
        distance_pc: 100.0,
        pixel_scale: 0.02,
    };
    let disk = RingDisk {
        center: geometry.center,
        radius: 42.0,
        width: 2.0,
        amplitude: 1.0,
        inclination_deg: geometry.inclination_deg,
        position_angle_deg: geometry.position_angle_deg,
    };
    let mut image = disk.render(201, 201);
    add_background_noise(image.view_mut(), 0.01, 7).unwrap();

    let params = ProfileParams {
        geometry,
        max_radius_au: 140.0,
        annulus_width_au: 8.0,
        n_bins: 18,
    };
    (image, params)
}

#[test]
fn test_uniform_annulus_splits_into_equal_quadrants() {
    let image = uniform_image(101, 101, 1.0);
    let geometry = face_on((50.0, 50.0));
    let annulus = AnnulusGeometry::circular(geometry.center, 10.0, 20.0);
    let bins = AngularBins::new(4).unwrap();

    let profile = extract_profile_from_annuli(&image.view(), vec![annulus], &bins, &geometry);

    assert_eq!(profile.normalized.dim(), (4, 1));
    assert_eq!(profile.counts.sum(), 940);
    for k in 0..4 {
        assert_eq!(profile.counts[[k, 0]], 235);
        assert_relative_eq!(profile.flux[[k, 0]], 235.0);
        assert_relative_eq!(profile.normalized[[k, 0]], 1.0);
    }
    assert_relative_eq!(profile.radii_au[0], 30.0, max_relative = 1e-12);
}

#[test]
fn test_uniform_disk_from_parameters() {
    let image = uniform_image(101, 101, 1.0);
    let params = ProfileParams {
        geometry: face_on((50.0, 50.0)),
        max_radius_au: 30.0,
        annulus_width_au: 20.0,
        n_bins: 4,
    };
    let profile = extract_profile(&image.view(), &params).unwrap();

    assert_eq!(profile.n_annuli(), 1);
    let total = profile.counts.sum();
    assert!((920..=960).contains(&total), "unexpected pixel count {total}");
    let first = profile.counts[[0, 0]];
    for k in 1..4 {
        assert_eq!(profile.counts[[k, 0]], first);
    }
    for v in profile.normalized.iter() {
        assert_relative_eq!(*v, 1.0);
    }
}

#[test]
fn test_edge_on_disk_does_not_fault() {
    let image = uniform_image(101, 101, 1.0);
    let mut params = ProfileParams {
        geometry: face_on((50.0, 50.0)),
        max_radius_au: 90.0,
        annulus_width_au: 10.0,
        n_bins: 8,
    };
    let face_on_total = extract_profile(&image.view(), &params)
        .unwrap()
        .counts
        .sum();

    params.geometry.inclination_deg = 90.0;
    let profile = extract_profile(&image.view(), &params).unwrap();

    assert!(profile.normalized.iter().all(|v| v.is_finite()));
    assert!(profile.counts.sum() * 20 < face_on_total);
}

#[test]
fn test_zero_width_annulus_gives_empty_column() {
    let image = uniform_image(51, 51, 1.0);
    let geometry = face_on((25.0, 25.0));
    let annuli = vec![
        AnnulusGeometry::circular(geometry.center, 10.0, 10.0),
        AnnulusGeometry::circular(geometry.center, 10.0, 15.0),
    ];
    let bins = AngularBins::new(6).unwrap();
    let profile = extract_profile_from_annuli(&image.view(), annuli, &bins, &geometry);

    assert!(profile.counts.column(0).iter().all(|&c| c == 0));
    assert!(profile.flux.column(0).iter().all(|&f| f == 0.0));
    assert!(profile.counts.column(1).iter().all(|&c| c > 0));
}

#[test]
fn test_adjacent_annuli_are_disjoint() {
    let geometry = DiskGeometry {
        center: (80.3, 79.6),
        position_angle_deg: 158.6,
        inclination_deg: 49.7,
        distance_pc: 113.43,
        pixel_scale: 0.02,
    };
    let size = ImageSize::from_width_height(161, 161);
    let annuli = build_annuli(&geometry, 150.0, 6.0).unwrap();
    assert!(annuli.len() > 5);

    let sets: Vec<HashSet<(usize, usize)>> = annuli
        .iter()
        .map(|a| a.pixel_indices(size).into_iter().collect())
        .collect();
    for i in 0..sets.len() {
        for j in (i + 1)..sets.len() {
            assert!(
                sets[i].is_disjoint(&sets[j]),
                "annuli {i} and {j} share pixels"
            );
        }
    }
}

#[test]
fn test_bins_partition_annulus_pixels() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let image = Array2::from_shape_fn((121, 121), |_| rng.random_range(0.5..2.0));
    let geometry = DiskGeometry {
        center: (60.0, 60.0),
        position_angle_deg: 158.6,
        inclination_deg: 49.7,
        ..face_on((0.0, 0.0))
    };
    let annuli = build_annuli(&geometry, 100.0, 8.0).unwrap();
    let bins = AngularBins::new(7).unwrap();
    let profile =
        extract_profile_from_annuli(&image.view(), annuli.clone(), &bins, &geometry);

    for (j, annulus) in annuli.iter().enumerate() {
        let pixels = rasterize_annulus(&image.view(), annulus);
        let counted: usize = profile.counts.column(j).sum();
        assert_eq!(counted, pixels.len());

        let flux: f64 = pixels.iter().map(|p| p.value).sum();
        assert_relative_eq!(profile.flux.column(j).sum(), flux, epsilon = 1e-9);
    }
}

#[test]
fn test_normalized_rows_peak_at_one_and_are_stable() {
    let (image, params) = ring_image();
    let profile = extract_profile(&image.view(), &params).unwrap();

    for row in profile.normalized.rows() {
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(max, 1.0);
    }

    let mut again = profile.normalized.clone();
    assert_eq!(normalize_rows(&mut again), 0);
    assert_eq!(again, profile.normalized);
}

#[test]
fn test_extraction_is_deterministic() {
    let (image, params) = ring_image();
    let first = extract_profile(&image.view(), &params).unwrap();
    let second = extract_profile(&image.view(), &params).unwrap();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap();
    let serial = pool.install(|| extract_profile(&image.view(), &params).unwrap());

    assert_eq!(first.flux, second.flux);
    assert_eq!(first.normalized, second.normalized);
    assert_eq!(first.flux, serial.flux);
    assert_eq!(first.counts, serial.counts);
}

#[test]
fn test_empty_sector_row_left_unnormalized() {
    let mut image = uniform_image(101, 101, 1.0);
    // Blank every row past the center: bin 1 (90..180 deg) only sees dy > 0
    image.slice_mut(ndarray::s![51.., ..]).fill(0.0);

    let params = ProfileParams {
        geometry: face_on((50.0, 50.0)),
        max_radius_au: 60.0,
        annulus_width_au: 10.0,
        n_bins: 4,
    };
    let profile = extract_profile(&image.view(), &params).unwrap();

    assert!(profile.normalized.row(1).iter().all(|&v| v == 0.0));
    assert!(profile.normalized.iter().all(|v| v.is_finite()));
    let max = profile
        .normalized
        .row(3)
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    assert_relative_eq!(max, 1.0);
}

#[test]
fn test_ring_peaks_at_its_radius_in_every_bin() {
    let (image, params) = ring_image();
    let profile = extract_profile(&image.view(), &params).unwrap();

    // 42 px at 2 AU/px; annuli are 4 px wide
    for (k, row) in profile.normalized.rows().into_iter().enumerate() {
        let (peak, _) = row
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (j, &v)| {
                if v > best.1 {
                    (j, v)
                } else {
                    best
                }
            });
        let radius = profile.radii_au[peak];
        assert!(
            (radius - 84.0).abs() <= 8.0,
            "bin {k} peaks at {radius} AU"
        );
    }
}

#[test]
fn test_observed_fits_uses_header_center() {
    let (image, _) = ring_image();
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("observed.fits");
    let cards = vec![
        HeaderCard::float("CRPIX1", 101.0),
        HeaderCard::float("CRPIX2", 101.0),
    ];
    write_primary_image(&path, &image.view(), &cards).unwrap();

    let loaded = read_primary_image(&path).unwrap();
    let center = ImageKind::Obs.center(&loaded);
    assert_eq!(center, (100.0, 100.0));

    let config = ProfileConfig {
        pixel_scale: 0.02,
        position_angle_deg: 158.6,
        inclination_deg: 49.7,
        distance_pc: 100.0,
        max_radius_au: 140.0,
        annulus_width_au: 8.0,
        n_bins: 18,
        center: None,
    };
    let from_file = extract_profile(&loaded.data.view(), &config.to_params(center)).unwrap();
    let (_, params) = ring_image();
    let in_memory = extract_profile(&image.view(), &params).unwrap();

    assert_eq!(from_file.flux, in_memory.flux);
    assert_eq!(from_file.radii_au, in_memory.radii_au);
}

#[test]
#[ignore = "writes PNG files and needs system fonts"]
fn test_plots_render() {
    use radsym::plot::{plot_qphi_comparison, plot_radial_profiles, QphiImage, Scaling};
    use shared::test_util::get_output_dir;

    let (image, params) = ring_image();
    let profile = extract_profile(&image.view(), &params).unwrap();
    let out = get_output_dir().unwrap();

    let profile_png = out.join("radial_profiles.png");
    plot_radial_profiles(&profile, &[84.0], &profile_png).unwrap();
    assert!(profile_png.exists());

    let comparison_png = out.join("qphi_comparison.png");
    plot_qphi_comparison(
        &QphiImage {
            image: image.view(),
            pixel_scale: 0.02,
            scaling: Scaling::Peak(1.0),
            title: "Observation".to_string(),
        },
        &QphiImage {
            image: image.view(),
            pixel_scale: 0.02,
            scaling: Scaling::MinMax,
            title: "Model".to_string(),
        },
        1.2,
        &comparison_png,
    )
    .unwrap();
    assert!(comparison_png.exists());
}
