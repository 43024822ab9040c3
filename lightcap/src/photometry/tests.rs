use std::f64::consts::PI;

use super::*;
use crate::testing::{assert_close, draw_disk};

fn aperture(x: f64, y: f64, radius: f64) -> ApertureSpec {
    ApertureSpec::new(&[x, y], radius, None).unwrap()
}

#[test]
fn test_uniform_image_matches_circle_area() {
    let image = FrameImage::filled(100, 100, 2.0);
    let flux = ApertureSum::default()
        .sum(&image, &aperture(50.0, 50.0, 10.0))
        .unwrap();

    let expected = 2.0 * PI * 100.0;
    assert_close(flux, expected, expected * 0.01);
}

#[test]
fn test_center_method_counts_whole_pixels() {
    // Radius 1 around a pixel center picks that pixel and its 4 neighbours.
    let image = FrameImage::filled(11, 11, 3.0);
    let flux = ApertureSum::new(1)
        .sum(&image, &aperture(5.0, 5.0, 1.0))
        .unwrap();
    assert_close(flux, 15.0, 1e-9);
}

#[test]
fn test_point_source_fully_captured() {
    let mut image = FrameImage::filled(40, 40, 0.0);
    *image.pixel_mut(20, 20) = 1000.0;

    let flux = ApertureSum::default()
        .sum(&image, &aperture(20.0, 20.0, 3.0))
        .unwrap();
    assert_close(flux, 1000.0, 1e-9);
}

#[test]
fn test_subpixel_center_offset() {
    // Off-center aperture must still collect a star it fully contains.
    let mut image = FrameImage::filled(40, 40, 0.0);
    draw_disk(&mut image, 20.0, 20.0, 2.0, 10.0);
    let star_flux: f64 = image.pixels().iter().map(|&p| p as f64).sum();

    let flux = ApertureSum::default()
        .sum(&image, &aperture(20.4, 19.7, 6.0))
        .unwrap();
    assert_close(flux, star_flux, 1e-9);
}

#[test]
fn test_aperture_touching_edges_is_allowed() {
    let image = FrameImage::filled(10, 10, 1.0);
    let flux = ApertureSum::default()
        .sum(&image, &aperture(4.5, 4.5, 5.0))
        .unwrap();
    assert_close(flux, PI * 25.0, PI * 25.0 * 0.015);
}

#[test]
fn test_aperture_outside_image_fails() {
    let image = FrameImage::filled(10, 10, 1.0);
    let err = ApertureSum::default()
        .sum(&image, &aperture(2.0, 2.0, 5.0))
        .unwrap_err();
    assert!(matches!(
        err,
        PhotometryError::OutOfBounds {
            width: 10,
            height: 10,
            ..
        }
    ));

    let err = ApertureSum::default()
        .sum(&image, &aperture(20.0, 5.0, 1.0))
        .unwrap_err();
    assert!(matches!(err, PhotometryError::OutOfBounds { .. }));
}

#[test]
fn test_measure_preserves_aperture_order() {
    let mut image = FrameImage::filled(60, 60, 0.0);
    draw_disk(&mut image, 15.0, 15.0, 2.0, 1.0);
    draw_disk(&mut image, 45.0, 45.0, 2.0, 4.0);

    let photometer = ApertureSum::default();
    let fluxes = photometer
        .measure(
            &image,
            &[aperture(45.0, 45.0, 5.0), aperture(15.0, 15.0, 5.0)],
        )
        .unwrap();

    assert_eq!(fluxes.len(), 2);
    assert_close(fluxes[0], 4.0 * fluxes[1], 1e-9);
}

#[test]
fn test_measure_fails_if_any_aperture_fails() {
    let image = FrameImage::filled(20, 20, 1.0);
    let result = ApertureSum::default().measure(
        &image,
        &[aperture(10.0, 10.0, 3.0), aperture(19.0, 10.0, 3.0)],
    );
    assert!(result.is_err());
}

#[test]
#[should_panic(expected = "subpixels must be positive")]
fn test_zero_subpixels_panics() {
    ApertureSum::new(0);
}
