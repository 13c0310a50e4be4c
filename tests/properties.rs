//! Property tests over arbitrary buffers.

use perceptual_fingerprint::hashing::composite_on_white;
use perceptual_fingerprint::{
    compute_hash, efficient_resize, fit_within_box, CanonicalImageBuffer, ChannelOrder,
    PerceptualHash, PerceptualHasher, ResizeTarget,
};
use proptest::prelude::*;
use std::borrow::Cow;

fn order_strategy() -> impl Strategy<Value = ChannelOrder> {
    prop_oneof![
        Just(ChannelOrder::Gray),
        Just(ChannelOrder::Rgb),
        Just(ChannelOrder::Rgba),
    ]
}

fn buffer_strategy(max_side: u32) -> impl Strategy<Value = CanonicalImageBuffer> {
    (1..=max_side, 1..=max_side, order_strategy()).prop_flat_map(|(w, h, order)| {
        let len = (w * h) as usize * order.channel_count();
        proptest::collection::vec(any::<u8>(), len)
            .prop_map(move |samples| CanonicalImageBuffer::new(w, h, order, samples).unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_hash_is_deterministic(buffer in buffer_strategy(48)) {
        let hasher = PerceptualHasher::new();
        prop_assert_eq!(hasher.hash(&buffer), hasher.hash(&buffer.clone()));
        prop_assert_eq!(hasher.hash(&buffer), compute_hash(&buffer));
    }

    #[test]
    fn prop_opaque_alpha_does_not_change_hash(
        rgb in (1u32..=40, 1u32..=40).prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<u8>(), (w * h * 3) as usize)
                .prop_map(move |s| CanonicalImageBuffer::new(w, h, ChannelOrder::Rgb, s).unwrap())
        })
    ) {
        let rgba: Vec<u8> = rgb
            .samples()
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect();
        let rgba = CanonicalImageBuffer::new(rgb.width(), rgb.height(), ChannelOrder::Rgba, rgba).unwrap();

        prop_assert_eq!(compute_hash(&rgb), compute_hash(&rgba));
    }

    #[test]
    fn prop_efficient_resize_never_enlarges(
        buffer in buffer_strategy(24),
        extra_w in 0u32..50,
        extra_h in 0u32..50,
    ) {
        let target = ResizeTarget::new(buffer.width() + extra_w, buffer.height() + extra_h).unwrap();
        let out = efficient_resize(&buffer, target);

        prop_assert!(matches!(out, Cow::Borrowed(_)));
        prop_assert_eq!(&*out, &buffer);
    }

    #[test]
    fn prop_fit_within_box_stays_inside(
        w in 1u32..5000,
        h in 1u32..5000,
        bw in 1u32..500,
        bh in 1u32..500,
    ) {
        let fitted = fit_within_box(w, h, ResizeTarget::new(bw, bh).unwrap());

        prop_assert!(fitted.width() >= 1 && fitted.height() >= 1);
        prop_assert!(fitted.width() <= w && fitted.height() <= h);
        prop_assert!(fitted.width() <= bw && fitted.height() <= bh);
    }

    #[test]
    fn prop_alpha_extremes(gray in any::<u8>()) {
        prop_assert_eq!(composite_on_white(gray, 0), 255);
        prop_assert_eq!(composite_on_white(gray, 255), gray);
    }

    #[test]
    fn prop_distance_is_a_metric(a in any::<u64>(), b in any::<u64>()) {
        let (a, b) = (PerceptualHash::from_u64(a), PerceptualHash::from_u64(b));

        prop_assert_eq!(a.distance(&a), 0);
        prop_assert_eq!(a.distance(&b), b.distance(&a));
        prop_assert!(a.distance(&b) <= 64);
    }
}
