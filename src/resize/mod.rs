//! Display resizing for thumbnails and zoom.
//!
//! Separate from fingerprinting: these operations produce buffers for
//! on-screen use. Thumbnail and "efficient" resizes never enlarge and
//! always use area averaging; zoom resizes pick the algorithm from a
//! [`QualityPreference`] depending on the direction of the resize.

mod fit;
pub(crate) mod kernel;
mod quality;

pub use fit::fit_within_box;
pub use quality::{Interpolation, QualityPreference};

use crate::buffer::CanonicalImageBuffer;
use std::borrow::Cow;

/// Requested output footprint. Both sides are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeTarget {
    width: u32,
    height: u32,
}

impl ResizeTarget {
    /// Returns `None` if either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// Builds a target, raising zero sides to 1.
    pub(crate) fn clamped(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Target width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Target height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True if this target is at least as large as `buffer` on both axes.
    #[inline]
    pub fn covers(&self, buffer: &CanonicalImageBuffer) -> bool {
        self.width >= buffer.width() && self.height >= buffer.height()
    }
}

/// Why a resize is requested; determines guard and algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePurpose {
    /// Shrink to exactly the target with area averaging.
    Efficient,
    /// Shrink to fit within the target box, keeping aspect ratio.
    Thumbnail,
    /// Scale to exactly the target for on-screen zoom.
    Zoom(QualityPreference),
}

/// Resizes `buffer` for display.
///
/// Returns the input borrowed when no resampling is needed:
/// - `Efficient` / `Thumbnail`: the target covers the image on both axes;
/// - `Zoom`: the target equals the current size.
pub fn resize(
    buffer: &CanonicalImageBuffer,
    target: ResizeTarget,
    purpose: ResizePurpose,
) -> Cow<'_, CanonicalImageBuffer> {
    match purpose {
        ResizePurpose::Efficient => {
            if target.covers(buffer) {
                return Cow::Borrowed(buffer);
            }
            Cow::Owned(resize_exact(buffer, target, Interpolation::Area))
        }
        ResizePurpose::Thumbnail => {
            if target.covers(buffer) {
                return Cow::Borrowed(buffer);
            }
            let fitted = fit_within_box(buffer.width(), buffer.height(), target);
            Cow::Owned(resize_exact(buffer, fitted, Interpolation::Area))
        }
        ResizePurpose::Zoom(quality) => {
            if target.width == buffer.width() && target.height == buffer.height() {
                return Cow::Borrowed(buffer);
            }
            let enlarging = target.width > buffer.width() || target.height > buffer.height();
            Cow::Owned(resize_exact(buffer, target, quality.select(enlarging)))
        }
    }
}

/// Area-averaged shrink to exactly `target`; never enlarges.
pub fn efficient_resize(
    buffer: &CanonicalImageBuffer,
    target: ResizeTarget,
) -> Cow<'_, CanonicalImageBuffer> {
    resize(buffer, target, ResizePurpose::Efficient)
}

/// Area-averaged shrink into the `bounding` box; never enlarges.
pub fn thumbnail(
    buffer: &CanonicalImageBuffer,
    bounding: ResizeTarget,
) -> Cow<'_, CanonicalImageBuffer> {
    resize(buffer, bounding, ResizePurpose::Thumbnail)
}

/// Zoom to exactly `target` using the media type's quality preference.
pub fn zoom(
    buffer: &CanonicalImageBuffer,
    target: ResizeTarget,
    quality: QualityPreference,
) -> Cow<'_, CanonicalImageBuffer> {
    resize(buffer, target, ResizePurpose::Zoom(quality))
}

/// Resamples unconditionally to `target` with `interpolation`.
pub fn resize_exact(
    buffer: &CanonicalImageBuffer,
    target: ResizeTarget,
    interpolation: Interpolation,
) -> CanonicalImageBuffer {
    tracing::trace!(
        from_w = buffer.width(),
        from_h = buffer.height(),
        to_w = target.width,
        to_h = target.height,
        %interpolation,
        "resampling"
    );

    let samples = kernel::resample(
        buffer.samples(),
        buffer.width() as usize,
        buffer.height() as usize,
        buffer.channel_count(),
        target.width as usize,
        target.height as usize,
        interpolation,
    );

    CanonicalImageBuffer::from_raw_parts(
        target.width,
        target.height,
        buffer.channel_order(),
        samples,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ChannelOrder;

    fn gradient(width: u32, height: u32) -> CanonicalImageBuffer {
        let samples = (0..width * height)
            .flat_map(|i| {
                let v = (i % 251) as u8;
                [v, v / 2, 255 - v]
            })
            .collect();
        CanonicalImageBuffer::new(width, height, ChannelOrder::Rgb, samples).unwrap()
    }

    fn target(width: u32, height: u32) -> ResizeTarget {
        ResizeTarget::new(width, height).unwrap()
    }

    #[test]
    fn test_zero_target_rejected() {
        assert!(ResizeTarget::new(0, 10).is_none());
        assert!(ResizeTarget::new(10, 0).is_none());
    }

    #[test]
    fn test_efficient_never_enlarges() {
        let buffer = gradient(20, 10);

        for t in [target(20, 10), target(40, 10), target(20, 30), target(500, 500)] {
            let out = efficient_resize(&buffer, t);
            assert!(matches!(out, Cow::Borrowed(_)));
            assert_eq!(*out, buffer);
        }
    }

    #[test]
    fn test_efficient_shrinks_exactly() {
        let buffer = gradient(20, 10);
        let out = efficient_resize(&buffer, target(30, 5));

        assert_eq!((out.width(), out.height()), (30, 5));
        assert_eq!(out.channel_order(), ChannelOrder::Rgb);
    }

    #[test]
    fn test_thumbnail_keeps_aspect() {
        let buffer = gradient(200, 100);
        let out = thumbnail(&buffer, target(50, 50));

        assert_eq!((out.width(), out.height()), (50, 25));
    }

    #[test]
    fn test_thumbnail_small_image_unchanged() {
        let buffer = gradient(30, 30);
        assert!(matches!(thumbnail(&buffer, target(64, 64)), Cow::Borrowed(_)));
    }

    #[test]
    fn test_zoom_same_size_unchanged() {
        let buffer = gradient(16, 16);
        let out = zoom(&buffer, target(16, 16), QualityPreference::default());
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_zoom_enlarges_with_scale_up_algorithm() {
        let buffer = CanonicalImageBuffer::new(2, 1, ChannelOrder::Gray, vec![0, 200]).unwrap();
        let nearest = QualityPreference::new(Interpolation::Nearest, Interpolation::Area);

        let out = zoom(&buffer, target(4, 1), nearest);

        assert_eq!(out.samples(), &[0, 0, 200, 200]);
    }

    #[test]
    fn test_zoom_shrinks_with_scale_down_algorithm() {
        let buffer =
            CanonicalImageBuffer::new(4, 1, ChannelOrder::Gray, vec![0, 100, 200, 50]).unwrap();
        let quality = QualityPreference::new(Interpolation::Linear, Interpolation::Nearest);

        let out = zoom(&buffer, target(2, 1), quality);

        assert_eq!(out.samples(), &[0, 200]);
    }
}
