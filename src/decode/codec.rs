//! Codec abstraction for the two decode paths.
//!
//! The façade never talks to an image library directly. It drives a
//! [`PrimaryCodec`] (fast, strict, as-stored samples) and a
//! [`FallbackCodec`] (slower, tolerant, dequantized samples), so either
//! side can be swapped for a mock in tests.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that end decoding of a single file.
///
/// None of these are retried; the caller decides whether to skip the
/// file, log it or abort a batch.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode {path}: {reason}")]
    Failed { path: PathBuf, reason: String },

    #[error("{codec} codec panicked while decoding {path}")]
    Panicked { path: PathBuf, codec: &'static str },

    #[error("codec returned {actual} bytes for a {width}x{height} image")]
    MalformedRaster {
        width: u32,
        height: u32,
        actual: usize,
    },
}

impl DecodeError {
    /// Convenience constructor for [`DecodeError::Failed`].
    pub fn failed(path: &Path, reason: impl Into<String>) -> Self {
        DecodeError::Failed {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`DecodeError::Io`].
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        DecodeError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Outcome of a primary decode that produced no canonical buffer.
#[derive(Debug, Error)]
pub enum PrimaryError {
    /// The primary codec returned no data. Triggers the fallback path.
    #[error("primary codec returned no data")]
    UnsupportedFormat,

    /// Any other failure. Propagated without trying the fallback.
    #[error(transparent)]
    Fatal(#[from] DecodeError),
}

/// Sample layout of a raster exactly as the primary codec stored it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredLayout {
    /// Two-dimensional plane, no channel axis.
    Gray,
    /// Blue, green, red.
    Bgr,
    /// Blue, green, red, alpha.
    Bgra,
}

impl StoredLayout {
    /// Number of samples per pixel.
    #[inline]
    pub fn channel_count(self) -> usize {
        match self {
            StoredLayout::Gray => 1,
            StoredLayout::Bgr => 3,
            StoredLayout::Bgra => 4,
        }
    }
}

/// Raster handed back by a [`PrimaryCodec`], not yet normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRaster {
    pub width: u32,
    pub height: u32,
    pub layout: StoredLayout,
    pub samples: Vec<u8>,
}

/// Raster handed back by a [`FallbackCodec`].
///
/// Samples are row-major RGB or RGBA; the channel count is not stored
/// and is recovered from `samples.len() / (width * height)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedRaster {
    pub width: u32,
    pub height: u32,
    pub samples: Vec<u8>,
}

/// Fast decode path returning samples "as stored".
///
/// Implementations must not convert channels or apply orientation
/// metadata. Colour samples are reported blue-first.
pub trait PrimaryCodec: Send + Sync {
    /// Short name used in logs and panic reports.
    fn name(&self) -> &'static str;

    /// Reads the file at `path`.
    ///
    /// Returns [`PrimaryError::UnsupportedFormat`] when the codec has no
    /// data to offer for this file.
    fn read_unchanged(&self, path: &Path) -> Result<StoredRaster, PrimaryError>;
}

/// Tolerant decode path for palette, animated and exotic formats.
///
/// Implementations resolve palette and transparency quantization
/// themselves: images with alpha come back as RGBA, everything else as
/// RGB.
pub trait FallbackCodec: Send + Sync {
    /// Short name used in logs and panic reports.
    fn name(&self) -> &'static str;

    /// Reads and dequantizes the file at `path`.
    fn read_dequantized(&self, path: &Path) -> Result<PackedRaster, DecodeError>;
}
