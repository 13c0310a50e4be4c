//! Decoder façade: file path in, canonical buffer out.
//!
//! Decoding is a two-step pipeline:
//!
//! ```text
//! primary_decode(path) ──ok──────────────────────────→ normalize → buffer
//!        │
//!        ├─ UnsupportedFormat → fallback_decode(path) → normalize → buffer
//!        └─ any other error ──────────────────────────→ DecodeError
//! ```
//!
//! The primary codec is fast but strict and may choke on corrupt input;
//! the fallback codec is slower and accepts palette, animated and exotic
//! formats. A [`DecodePolicy`] can route everything through the fallback.
//! Codec panics are contained and reported as [`DecodeError::Panicked`].

mod codec;
mod mock;
mod native;
mod policy;

pub use codec::{
    DecodeError, FallbackCodec, PackedRaster, PrimaryCodec, PrimaryError, StoredLayout,
    StoredRaster,
};
pub use mock::{MockBehavior, MockFallbackCodec, MockPrimaryCodec};
pub use native::{dequantize, NativeCodec, TolerantCodec};
pub use policy::DecodePolicy;

use crate::buffer::{CanonicalImageBuffer, ChannelOrder};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Turns image files into [`CanonicalImageBuffer`]s.
///
/// Holds no mutable state; one decoder can serve any number of
/// threads concurrently.
#[derive(Debug)]
pub struct Decoder<P = NativeCodec, F = TolerantCodec> {
    policy: DecodePolicy,
    primary: P,
    fallback: F,
}

impl Decoder {
    /// Creates a decoder over the `image`-crate codecs.
    pub fn new(policy: DecodePolicy) -> Self {
        Self::with_codecs(policy, NativeCodec::new(), TolerantCodec::new())
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(DecodePolicy::default())
    }
}

impl<P: PrimaryCodec, F: FallbackCodec> Decoder<P, F> {
    /// Creates a decoder over caller-supplied codecs.
    pub fn with_codecs(policy: DecodePolicy, primary: P, fallback: F) -> Self {
        Self {
            policy,
            primary,
            fallback,
        }
    }

    /// Returns the policy fixed at construction.
    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }

    /// Returns the primary codec.
    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// Returns the fallback codec.
    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    /// Decodes the image at `path`.
    pub fn decode(&self, path: impl AsRef<Path>) -> Result<CanonicalImageBuffer, DecodeError> {
        let path = path.as_ref();

        if self.policy.prefer_robust_decoder {
            return self.fallback_decode(path);
        }

        match self.primary_decode(path) {
            Ok(buffer) => Ok(buffer),
            Err(PrimaryError::UnsupportedFormat) => {
                tracing::debug!(
                    path = %path.display(),
                    codec = self.fallback.name(),
                    "primary codec had no data, using fallback"
                );
                self.fallback_decode(path)
            }
            Err(PrimaryError::Fatal(err)) => Err(err),
        }
    }

    /// Runs only the primary codec and normalizes its stored layout.
    pub fn primary_decode(&self, path: &Path) -> Result<CanonicalImageBuffer, PrimaryError> {
        let codec = self.primary.name();
        let raster = panic::catch_unwind(AssertUnwindSafe(|| self.primary.read_unchanged(path)))
            .map_err(|_| {
                tracing::warn!(path = %path.display(), codec, "codec panicked");
                DecodeError::Panicked {
                    path: path.to_path_buf(),
                    codec,
                }
            })??;

        Ok(normalize_stored(raster)?)
    }

    /// Runs only the fallback codec and packs its output.
    pub fn fallback_decode(&self, path: &Path) -> Result<CanonicalImageBuffer, DecodeError> {
        let codec = self.fallback.name();
        let raster =
            panic::catch_unwind(AssertUnwindSafe(|| self.fallback.read_dequantized(path)))
                .map_err(|_| {
                    tracing::warn!(path = %path.display(), codec, "codec panicked");
                    DecodeError::Panicked {
                        path: path.to_path_buf(),
                        codec,
                    }
                })??;

        normalize_packed(raster)
    }
}

/// Swaps the first and third sample of every pixel in place.
///
/// Converts between blue-first and red-first orders; alpha, if any,
/// stays put.
pub(crate) fn swap_red_blue(samples: &mut [u8], channels: usize) {
    for pixel in samples.chunks_exact_mut(channels) {
        pixel.swap(0, 2);
    }
}

/// Normalizes a primary-codec raster into the canonical layout.
///
/// A plane without channel axis is replicated into RGB, blue-first
/// colour is reordered to red-first.
pub fn normalize_stored(raster: StoredRaster) -> Result<CanonicalImageBuffer, DecodeError> {
    let StoredRaster {
        width,
        height,
        layout,
        mut samples,
    } = raster;

    let malformed = |actual: usize| DecodeError::MalformedRaster {
        width,
        height,
        actual,
    };

    let pixel_count = (width as usize) * (height as usize);
    if pixel_count == 0 || samples.len() != pixel_count * layout.channel_count() {
        return Err(malformed(samples.len()));
    }

    let (order, samples) = match layout {
        StoredLayout::Gray => {
            let rgb = samples.iter().flat_map(|&v| [v, v, v]).collect();
            (ChannelOrder::Rgb, rgb)
        }
        StoredLayout::Bgr => {
            swap_red_blue(&mut samples, 3);
            (ChannelOrder::Rgb, samples)
        }
        StoredLayout::Bgra => {
            swap_red_blue(&mut samples, 4);
            (ChannelOrder::Rgba, samples)
        }
    };

    let actual = samples.len();
    CanonicalImageBuffer::new(width, height, order, samples).map_err(|_| malformed(actual))
}

/// Packs a fallback-codec raster into the canonical layout.
///
/// The channel count is inferred from the byte length.
pub fn normalize_packed(raster: PackedRaster) -> Result<CanonicalImageBuffer, DecodeError> {
    let PackedRaster {
        width,
        height,
        samples,
    } = raster;

    let malformed = DecodeError::MalformedRaster {
        width,
        height,
        actual: samples.len(),
    };

    let pixel_count = (width as usize) * (height as usize);
    if pixel_count == 0 || samples.len() % pixel_count != 0 {
        return Err(malformed);
    }

    let Some(order) = ChannelOrder::from_channel_count(samples.len() / pixel_count) else {
        return Err(malformed);
    };

    CanonicalImageBuffer::new(width, height, order, samples).map_err(|_| malformed)
}
