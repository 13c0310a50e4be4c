//! File-level tests: real image files written to a temporary directory,
//! decoded and fingerprinted through the public API.

use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use perceptual_fingerprint::{
    compute_hash, thumbnail, ChannelOrder, DecodeError, DecodePolicy, Decoder, Fingerprinter,
    ResizeTarget,
};
use std::path::PathBuf;
use tempfile::TempDir;

fn textured(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 4) % 256) as u8,
            ((y * 4) % 256) as u8,
            (((x + y) * 2) % 256) as u8,
        ])
    })
}

fn write(dir: &TempDir, name: &str, image: &RgbImage) -> PathBuf {
    let path = dir.path().join(name);
    image.save(&path).unwrap();
    path
}

#[test]
fn test_same_file_same_fingerprint() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "photo.png", &textured(64, 64));
    let fingerprinter = Fingerprinter::default();

    let first = fingerprinter.fingerprint(&path).unwrap();
    let second = fingerprinter.fingerprint(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.distance(&second), 0);
}

#[test]
fn test_one_pixel_edit_is_near_duplicate() {
    let dir = TempDir::new().unwrap();
    let original = textured(64, 64);
    let mut edited = original.clone();
    edited.put_pixel(40, 17, Rgb([255, 255, 255]));

    let a = write(&dir, "original.png", &original);
    let b = write(&dir, "edited.png", &edited);
    let fingerprinter = Fingerprinter::default();

    let distance = fingerprinter
        .fingerprint(&a)
        .unwrap()
        .distance(&fingerprinter.fingerprint(&b).unwrap());
    assert!(distance <= 2, "distance {distance}");
}

#[test]
fn test_lossless_formats_agree() {
    let dir = TempDir::new().unwrap();
    let image = textured(48, 40);
    let png = write(&dir, "a.png", &image);
    let bmp = write(&dir, "a.bmp", &image);
    let fingerprinter = Fingerprinter::default();

    assert_eq!(
        fingerprinter.fingerprint(&png).unwrap(),
        fingerprinter.fingerprint(&bmp).unwrap()
    );
}

#[test]
fn test_single_gray_pixel_decodes_to_three_channels() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dot.png");
    GrayImage::from_pixel(1, 1, Luma([128])).save(&path).unwrap();

    let buffer = Decoder::default().decode(&path).unwrap();

    assert_eq!((buffer.width(), buffer.height()), (1, 1));
    assert_eq!(buffer.channel_count(), 3);
    assert_eq!(buffer.samples(), &[128, 128, 128]);
}

#[test]
fn test_primary_and_fallback_agree() {
    let dir = TempDir::new().unwrap();
    let rgb = write(&dir, "rgb.png", &textured(20, 12));
    let rgba = dir.path().join("rgba.png");
    RgbaImage::from_fn(9, 7, |x, y| Rgba([x as u8 * 20, y as u8 * 30, 90, (x * y) as u8]))
        .save(&rgba)
        .unwrap();

    let decoder = Decoder::default();
    for path in [rgb, rgba] {
        let fast = decoder.primary_decode(&path).unwrap();
        let tolerant = decoder.fallback_decode(&path).unwrap();
        assert_eq!(fast, tolerant, "{}", path.display());
    }
}

#[test]
fn test_gif_goes_through_fallback() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anim.gif");
    RgbaImage::from_pixel(6, 6, Rgba([0, 0, 0, 255])).save(&path).unwrap();

    let buffer = Decoder::default().decode(&path).unwrap();

    assert_eq!(buffer.channel_order(), ChannelOrder::Rgba);
    assert_eq!(
        Fingerprinter::default().fingerprint(&path).unwrap(),
        compute_hash(&buffer)
    );
}

#[test]
fn test_robust_policy_matches_fast_policy() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "photo.png", &textured(64, 32));

    let fast = Fingerprinter::new(DecodePolicy::fast()).fingerprint(&path).unwrap();
    let robust = Fingerprinter::new(DecodePolicy::robust()).fingerprint(&path).unwrap();

    assert_eq!(fast, robust);
}

#[test]
fn test_garbage_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.png");
    std::fs::write(&path, b"this is not an image").unwrap();

    let result = Decoder::default().decode(&path);
    assert!(matches!(result, Err(DecodeError::Failed { .. })), "{result:?}");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = Fingerprinter::default().fingerprint(dir.path().join("missing.png"));

    assert!(matches!(result, Err(DecodeError::Io { .. })));
}

#[test]
fn test_thumbnail_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "wide.png", &textured(200, 100));

    let buffer = Decoder::default().decode(&path).unwrap();
    let thumb = thumbnail(&buffer, ResizeTarget::new(50, 50).unwrap());

    assert_eq!((thumb.width(), thumb.height()), (50, 25));
    assert_eq!(thumb.channel_order(), ChannelOrder::Rgb);
}
