//! Canonical in-memory pixel representation.
//!
//! Every decode path produces a [`CanonicalImageBuffer`] and every
//! downstream stage (hashing, resizing) consumes one. The buffer is
//! decoder-independent: 8 bits per sample, row-major, channels
//! interleaved in gray, RGB or RGBA order.

mod canonical;

pub use canonical::{BufferError, CanonicalImageBuffer, ChannelOrder};
