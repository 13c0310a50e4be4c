//! File-to-fingerprint composition.

use crate::decode::{DecodeError, DecodePolicy, Decoder, FallbackCodec, PrimaryCodec};
use crate::decode::{NativeCodec, TolerantCodec};
use crate::hashing::{PerceptualHash, PerceptualHasher};
use std::path::Path;

/// Decodes files and fingerprints them with one shared DCT plan.
#[derive(Debug)]
pub struct Fingerprinter<P = NativeCodec, F = TolerantCodec> {
    decoder: Decoder<P, F>,
    hasher: PerceptualHasher,
}

impl Fingerprinter {
    /// Creates a fingerprinter over the default codecs.
    pub fn new(policy: DecodePolicy) -> Self {
        Self::with_decoder(Decoder::new(policy))
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new(DecodePolicy::default())
    }
}

impl<P: PrimaryCodec, F: FallbackCodec> Fingerprinter<P, F> {
    /// Wraps an existing decoder.
    pub fn with_decoder(decoder: Decoder<P, F>) -> Self {
        Self {
            decoder,
            hasher: PerceptualHasher::new(),
        }
    }

    /// Returns the wrapped decoder.
    pub fn decoder(&self) -> &Decoder<P, F> {
        &self.decoder
    }

    /// Returns the hasher.
    pub fn hasher(&self) -> &PerceptualHasher {
        &self.hasher
    }

    /// Decodes `path` and returns its fingerprint.
    pub fn fingerprint(&self, path: impl AsRef<Path>) -> Result<PerceptualHash, DecodeError> {
        let buffer = self.decoder.decode(path)?;
        Ok(self.hasher.hash(&buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{MockFallbackCodec, MockPrimaryCodec, PackedRaster, StoredLayout, StoredRaster};

    fn stored_gray(value: u8) -> StoredRaster {
        StoredRaster {
            width: 8,
            height: 8,
            layout: StoredLayout::Gray,
            samples: vec![value; 64],
        }
    }

    #[test]
    fn test_fingerprint_uses_decoded_buffer() {
        let decoder = Decoder::with_codecs(
            DecodePolicy::fast(),
            MockPrimaryCodec::returning(stored_gray(0)),
            MockFallbackCodec::failing(),
        );
        let fingerprinter = Fingerprinter::with_decoder(decoder);

        let hash = fingerprinter.fingerprint("black.png").unwrap();

        assert_eq!(hash.to_u64(), 0);
        assert_eq!(fingerprinter.decoder().primary().calls(), 1);
        assert_eq!(fingerprinter.decoder().fallback().calls(), 0);
    }

    #[test]
    fn test_fingerprint_propagates_decode_error() {
        let decoder = Decoder::with_codecs(
            DecodePolicy::fast(),
            MockPrimaryCodec::unsupported(),
            MockFallbackCodec::failing(),
        );
        let fingerprinter = Fingerprinter::with_decoder(decoder);

        assert!(matches!(
            fingerprinter.fingerprint("broken.png"),
            Err(DecodeError::Failed { .. })
        ));
    }

    #[test]
    fn test_robust_policy_fingerprints_fallback_output() {
        let decoder = Decoder::with_codecs(
            DecodePolicy::robust(),
            MockPrimaryCodec::unsupported(),
            MockFallbackCodec::returning(PackedRaster {
                width: 8,
                height: 8,
                samples: vec![0; 64 * 3],
            }),
        );
        let fingerprinter = Fingerprinter::with_decoder(decoder);

        assert_eq!(fingerprinter.fingerprint("a.gif").unwrap().to_u64(), 0);
        assert_eq!(fingerprinter.decoder().primary().calls(), 0);
    }
}
