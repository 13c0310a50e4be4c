//! Codecs backed by the `image` crate.

use super::codec::{
    DecodeError, FallbackCodec, PackedRaster, PrimaryCodec, PrimaryError, StoredLayout,
    StoredRaster,
};
use super::swap_red_blue;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::path::Path;

/// Formats the fast path leaves to the tolerant codec.
///
/// GIF is palette based and possibly animated; the fast path only
/// deals with direct-colour rasters.
const DEFERRED_FORMATS: &[ImageFormat] = &[ImageFormat::Gif];

/// Fast primary codec.
///
/// Decodes 8-bit grayscale, RGB and RGBA rasters and reports them in
/// stored (blue-first) order. Anything else, including files whose
/// contents fail to decode, is reported as "no data" so the façade can
/// hand the file to the fallback codec. Only failing to open the file
/// at all is fatal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCodec;

impl NativeCodec {
    /// Creates the fast codec.
    pub fn new() -> Self {
        Self
    }
}

impl PrimaryCodec for NativeCodec {
    fn name(&self) -> &'static str {
        "native"
    }

    fn read_unchanged(&self, path: &Path) -> Result<StoredRaster, PrimaryError> {
        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|source| DecodeError::io(path, source))?;

        match reader.format() {
            None => return Err(PrimaryError::UnsupportedFormat),
            Some(format) if DEFERRED_FORMATS.contains(&format) => {
                tracing::debug!(path = %path.display(), ?format, "format deferred to fallback codec");
                return Err(PrimaryError::UnsupportedFormat);
            }
            Some(_) => {}
        }

        let image = match reader.decode() {
            Ok(image) => image,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "primary codec produced no data");
                return Err(PrimaryError::UnsupportedFormat);
            }
        };

        let (width, height) = (image.width(), image.height());
        let (layout, samples) = match image {
            DynamicImage::ImageLuma8(plane) => (StoredLayout::Gray, plane.into_raw()),
            DynamicImage::ImageRgb8(rgb) => {
                let mut samples = rgb.into_raw();
                swap_red_blue(&mut samples, 3);
                (StoredLayout::Bgr, samples)
            }
            DynamicImage::ImageRgba8(rgba) => {
                let mut samples = rgba.into_raw();
                swap_red_blue(&mut samples, 4);
                (StoredLayout::Bgra, samples)
            }
            other => {
                tracing::debug!(
                    path = %path.display(),
                    color = ?other.color(),
                    "sample layout not handled by primary codec"
                );
                return Err(PrimaryError::UnsupportedFormat);
            }
        };

        Ok(StoredRaster {
            width,
            height,
            layout,
            samples,
        })
    }
}

/// Tolerant fallback codec.
///
/// Accepts every format the `image` crate can decode (first frame of
/// animations) and collapses palette, gray-alpha and high bit depth
/// images into 8-bit RGB or RGBA.
#[derive(Debug, Clone, Copy, Default)]
pub struct TolerantCodec;

impl TolerantCodec {
    /// Creates the tolerant codec.
    pub fn new() -> Self {
        Self
    }
}

impl FallbackCodec for TolerantCodec {
    fn name(&self) -> &'static str {
        "tolerant"
    }

    fn read_dequantized(&self, path: &Path) -> Result<PackedRaster, DecodeError> {
        let image = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|source| DecodeError::io(path, source))?
            .decode()
            .map_err(|err| match err {
                ImageError::IoError(source) => DecodeError::io(path, source),
                other => DecodeError::failed(path, other.to_string()),
            })?;

        let (width, height) = (image.width(), image.height());
        Ok(PackedRaster {
            width,
            height,
            samples: dequantize(image),
        })
    }
}

/// Resolves any colour model into packed RGB or RGBA samples.
///
/// Images carrying alpha keep it; everything else becomes RGB.
pub fn dequantize(image: DynamicImage) -> Vec<u8> {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb.into_raw(),
        DynamicImage::ImageRgba8(rgba) => rgba.into_raw(),
        other if other.color().has_alpha() => other.to_rgba8().into_raw(),
        other => other.to_rgb8().into_raw(),
    }
}
