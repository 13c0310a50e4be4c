//! Perceptual fingerprinting.
//!
//! ```text
//!   CanonicalImageBuffer
//!          │
//!          ▼
//!   ┌──────────────┐   gray plane, transparency on white
//!   │   flatten    │
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐   32x32, area averaging
//!   │   resample   │
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐   orthonormal DCT-II, keep top-left 8x8
//!   │     dct      │
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐   bit = coefficient > mean of the 63 non-DC
//!   │  threshold   │
//!   └──────┬───────┘
//!          ▼
//!    PerceptualHash (8 bytes)
//! ```
//!
//! Every stage is deterministic; the same buffer always produces the
//! same fingerprint, including across thread counts.

mod dct;
mod fingerprint;
mod flatten;
mod threshold;

pub use dct::Dct2d;
pub use fingerprint::{ParseHashError, PerceptualHash, HASH_BYTES};
pub use flatten::{composite_on_white, flatten_to_gray, luma};
pub use threshold::{extract_bits, low_frequency_block, mean_excluding_dc, CoefficientBlock};

use crate::buffer::CanonicalImageBuffer;
use crate::resize::kernel;
use crate::resize::Interpolation;
use tracing::trace;

/// Side of the reduced image fed to the DCT.
pub const REDUCED_SIDE: usize = 32;

/// Computes fingerprints, reusing one DCT plan.
///
/// Cheap to clone and safe to share between threads.
#[derive(Debug, Clone)]
pub struct PerceptualHasher {
    dct: Dct2d,
}

impl PerceptualHasher {
    /// Plans the 32x32 transform.
    pub fn new() -> Self {
        Self {
            dct: Dct2d::new(REDUCED_SIDE),
        }
    }

    /// Fingerprints a canonical buffer.
    pub fn hash(&self, buffer: &CanonicalImageBuffer) -> PerceptualHash {
        debug_assert!(buffer.is_valid());

        let gray = flatten_to_gray(buffer);
        let reduced = kernel::resample(
            gray.samples(),
            gray.width() as usize,
            gray.height() as usize,
            1,
            REDUCED_SIDE,
            REDUCED_SIDE,
            Interpolation::Area,
        );

        let input: Vec<f32> = reduced.iter().map(|&v| f32::from(v)).collect();
        let coefficients = self.dct.forward(&input);
        let block = low_frequency_block(&coefficients, REDUCED_SIDE);
        let hash = extract_bits(&block);

        trace!(
            width = buffer.width(),
            height = buffer.height(),
            channels = buffer.channel_count(),
            %hash,
            "fingerprinted buffer"
        );
        hash
    }
}

impl Default for PerceptualHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Fingerprints `buffer` with a freshly planned hasher.
///
/// Prefer a shared [`PerceptualHasher`] when hashing many images.
pub fn compute_hash(buffer: &CanonicalImageBuffer) -> PerceptualHash {
    PerceptualHasher::new().hash(buffer)
}
