//! Aspect-preserving thumbnail geometry.

use super::ResizeTarget;

/// Fits `(width, height)` inside `bounding` without changing its
/// aspect ratio.
///
/// Images that already fit are returned at their own size. Otherwise
/// both sides are divided by the larger of the two overshoot ratios,
/// so the constraining side lands exactly on the box edge and the
/// other side is floored (never below 1).
pub fn fit_within_box(width: u32, height: u32, bounding: ResizeTarget) -> ResizeTarget {
    let (box_w, box_h) = (bounding.width(), bounding.height());

    if box_w >= width && box_h >= height {
        return ResizeTarget::clamped(width, height);
    }

    let (w, h) = (u64::from(width), u64::from(height));
    let (bw, bh) = (u64::from(box_w), u64::from(box_h));

    // width / box_w >= height / box_h, compared without division
    if w * bh >= h * bw {
        ResizeTarget::clamped(box_w, (h * bw / w) as u32)
    } else {
        ResizeTarget::clamped((w * bh / h) as u32, box_h)
    }
}
