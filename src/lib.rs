//! Perceptual Fingerprint Library
//!
//! Decodes image files of many formats into a canonical pixel buffer,
//! computes a 64-bit DCT perceptual hash for near-duplicate detection,
//! and resizes buffers for thumbnails and zoom.
//!
//! # Architecture
//!
//! ```text
//! path → decode → CanonicalImageBuffer → hashing → PerceptualHash
//!                          ↓
//!                       resize (thumbnail / zoom)
//! ```
//!
//! # Design Principles
//!
//! - **Stable fingerprints**: the same pixels always hash to the same
//!   64 bits, and the bit layout never changes between releases
//! - **Fallback, not failure**: a file the fast codec cannot read goes
//!   to the tolerant codec; only the tolerant codec's errors surface
//! - **No shared mutable state**: every type is `Send + Sync` and safe
//!   to use from any number of threads
//!
//! # Example
//!
//! ```no_run
//! use perceptual_fingerprint::{DecodePolicy, Fingerprinter};
//!
//! let fingerprinter = Fingerprinter::new(DecodePolicy::default());
//!
//! let a = fingerprinter.fingerprint("holiday.jpg").unwrap();
//! let b = fingerprinter.fingerprint("holiday-resaved.png").unwrap();
//!
//! if a.distance(&b) <= 10 {
//!     println!("{a} and {b} look alike");
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod decode;
pub mod hashing;
pub mod pipeline;
pub mod resize;

// Re-export commonly used types at crate root
pub use buffer::{BufferError, CanonicalImageBuffer, ChannelOrder};
pub use config::{ConfigError, FileConfig, ZoomConfig};
pub use decode::{DecodeError, DecodePolicy, Decoder};
pub use hashing::{compute_hash, PerceptualHash, PerceptualHasher};
pub use pipeline::Fingerprinter;
pub use resize::{
    efficient_resize, fit_within_box, thumbnail, zoom, Interpolation, QualityPreference,
    ResizeTarget,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
