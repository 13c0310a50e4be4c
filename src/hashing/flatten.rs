//! Grayscale reduction and alpha flattening.
//!
//! Stage A of the fingerprint: any canonical buffer becomes a single
//! 8-bit luminance plane. Transparent pixels are composited onto a
//! white canvas so that transparency never reads as black.

use crate::buffer::{CanonicalImageBuffer, ChannelOrder};

/// Fixed-point precision of the luma weights.
const LUMA_SHIFT: u32 = 14;
const LUMA_ROUND: u32 = 1 << (LUMA_SHIFT - 1);

/// Luma weights in the order they are applied to the three colour
/// samples of a canonical pixel. They sum to `1 << LUMA_SHIFT`.
///
/// Stored fingerprints were computed with the first sample weighted as
/// blue (0.114) and the third as red (0.299); changing the order here
/// changes every colour fingerprint.
const LUMA_WEIGHTS: [u32; 3] = [1868, 9617, 4899];

/// Canvas colour behind transparent pixels.
const WHITE: f64 = 255.0;

/// Weighted luminance of one colour pixel, rounded to nearest.
#[inline]
pub fn luma(pixel: &[u8]) -> u8 {
    let weighted = u32::from(pixel[0]) * LUMA_WEIGHTS[0]
        + u32::from(pixel[1]) * LUMA_WEIGHTS[1]
        + u32::from(pixel[2]) * LUMA_WEIGHTS[2];
    ((weighted + LUMA_ROUND) >> LUMA_SHIFT) as u8
}

/// Composites a gray sample with opacity `alpha` onto white.
///
/// `gray * a + 255 * (1 - a)` with `a = alpha / 255`, truncated toward
/// zero. Truncation, not rounding, keeps results identical to
/// previously stored fingerprints.
#[inline]
pub fn composite_on_white(gray: u8, alpha: u8) -> u8 {
    let alpha = f64::from(alpha) / 255.0;
    (f64::from(gray) * alpha + WHITE * (1.0 - alpha)) as u8
}

/// Reduces a buffer to a single luminance plane.
///
/// RGBA buffers are flattened against white, RGB buffers converted
/// directly, gray buffers copied.
pub fn flatten_to_gray(buffer: &CanonicalImageBuffer) -> CanonicalImageBuffer {
    let samples = buffer.samples();
    let plane: Vec<u8> = match buffer.channel_order() {
        ChannelOrder::Gray => samples.to_vec(),
        ChannelOrder::Rgb => samples.chunks_exact(3).map(luma).collect(),
        ChannelOrder::Rgba => samples
            .chunks_exact(4)
            .map(|px| composite_on_white(luma(&px[..3]), px[3]))
            .collect(),
    };

    CanonicalImageBuffer::from_raw_parts(buffer.width(), buffer.height(), ChannelOrder::Gray, plane)
}
