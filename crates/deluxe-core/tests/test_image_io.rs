mod common;

use std::path::Path;

use approx::assert_abs_diff_eq;
use deluxe_core::error::DeluxeError;
use deluxe_core::frame::{Frame, Image};
use deluxe_core::io::image_io::{load_image, save_image, OutputFormat};
use ndarray::Array2;

use common::*;

#[test]
fn test_format_from_extension() {
    assert_eq!(OutputFormat::from_path(Path::new("out.png")), OutputFormat::Png);
    assert_eq!(OutputFormat::from_path(Path::new("OUT.PNG")), OutputFormat::Png);
    assert_eq!(OutputFormat::from_path(Path::new("out.tif")), OutputFormat::Tiff);
    assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Tiff);
}

#[test]
fn test_mono_tiff_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ramp.tiff");
    let image = make_ramp(8, 10);
    save_image(&image, &path).unwrap();

    let loaded = load_image(&path).unwrap();
    assert!(matches!(loaded, Image::Mono(_)));
    assert_eq!(loaded.dim(), (8, 10));
    assert_eq!(loaded.bit_depth(), 16);
    assert!(max_abs_diff(&image, &loaded) < 1e-4);
}

#[test]
fn test_color_png_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flat.png");
    let image = make_color(5, 7, 0.2, 0.5, 0.8);
    save_image(&image, &path).unwrap();

    let loaded = load_image(&path).unwrap();
    assert_eq!(loaded.channel_count(), 3);
    assert_eq!(loaded.bit_depth(), 8);
    let channels = loaded.channels();
    assert_abs_diff_eq!(channels[0][[2, 3]], 0.2, epsilon = 3e-3);
    assert_abs_diff_eq!(channels[1][[2, 3]], 0.5, epsilon = 3e-3);
    assert_abs_diff_eq!(channels[2][[2, 3]], 0.8, epsilon = 3e-3);
}

#[test]
fn test_values_clamped_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clamped.tiff");
    let data = Array2::from_shape_vec((1, 3), vec![-0.5, 0.5, 1.7]).unwrap();
    save_image(&Image::Mono(Frame::new(data, 16)), &path).unwrap();

    let loaded = load_image(&path).unwrap();
    let channel = loaded.channels()[0];
    assert_eq!(channel[[0, 0]], 0.0);
    assert_abs_diff_eq!(channel[[0, 1]], 0.5, epsilon = 1e-4);
    assert_eq!(channel[[0, 2]], 1.0);
}

#[test]
fn test_empty_image_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.png");
    let image = Image::Mono(Frame::new(Array2::zeros((0, 4)), 8));
    assert!(matches!(
        save_image(&image, &path),
        Err(DeluxeError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_image(&dir.path().join("absent.tiff")).is_err());
}
