//! The 64-bit perceptual fingerprint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of bytes in a fingerprint.
pub const HASH_BYTES: usize = 8;

/// Error parsing a fingerprint from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseHashError {
    #[error("expected {expected} hex digits, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("invalid hex digit in {0:?}")]
    Digit(String),
}

/// Opaque 64-bit similarity fingerprint.
///
/// Bit layout is fixed: byte 0 holds the first row of the 8x8
/// low-frequency block, most significant bit first. Fingerprints are
/// only meaningful when compared with [`PerceptualHash::distance`];
/// visually similar images differ in few bits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PerceptualHash([u8; HASH_BYTES]);

impl PerceptualHash {
    /// Wraps raw fingerprint bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }

    /// Returns the raw fingerprint bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; HASH_BYTES] {
        &self.0
    }

    /// Interprets the fingerprint as a big-endian integer.
    #[inline]
    pub fn to_u64(self) -> u64 {
        u64::from_be_bytes(self.0)
    }

    /// Inverse of [`PerceptualHash::to_u64`].
    #[inline]
    pub fn from_u64(value: u64) -> Self {
        Self(value.to_be_bytes())
    }

    /// Hamming distance: number of differing bits (0..=64).
    #[inline]
    pub fn distance(&self, other: &Self) -> u32 {
        (self.to_u64() ^ other.to_u64()).count_ones()
    }

    /// Lowercase hex encoding, 16 digits.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PerceptualHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for PerceptualHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PerceptualHash({self})")
    }
}

impl FromStr for PerceptualHash {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != HASH_BYTES * 2 {
            return Err(ParseHashError::Length {
                expected: HASH_BYTES * 2,
                actual: s.len(),
            });
        }
        if !s.is_ascii() {
            return Err(ParseHashError::Digit(s.to_string()));
        }

        let mut bytes = [0u8; HASH_BYTES];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &s[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|_| ParseHashError::Digit(s.to_string()))?;
        }
        Ok(Self(bytes))
    }
}

impl From<PerceptualHash> for String {
    fn from(hash: PerceptualHash) -> Self {
        hash.to_string()
    }
}

impl TryFrom<String> for PerceptualHash {
    type Error = ParseHashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_counts_bits() {
        let a = PerceptualHash::from_u64(0);
        let b = PerceptualHash::from_u64(0b1011);

        assert_eq!(a.distance(&a), 0);
        assert_eq!(a.distance(&b), 3);
        assert_eq!(a.distance(&PerceptualHash::from_u64(u64::MAX)), 64);
    }

    #[test]
    fn test_big_endian_layout() {
        let hash = PerceptualHash::from_bytes([0x80, 0, 0, 0, 0, 0, 0, 0x01]);

        assert_eq!(hash.to_u64(), 0x8000_0000_0000_0001);
        assert_eq!(hash.to_hex(), "8000000000000001");
    }

    #[test]
    fn test_ordering_matches_numeric_order() {
        let low = PerceptualHash::from_u64(0x00ff_ffff_ffff_ffff);
        let high = PerceptualHash::from_u64(0x0100_0000_0000_0000);
        assert!(low < high);
    }

    #[test]
    fn test_parse_hex() {
        let hash: PerceptualHash = "0123456789abcdef".parse().unwrap();
        assert_eq!(hash.to_u64(), 0x0123_4567_89ab_cdef);

        assert!(matches!(
            "0123".parse::<PerceptualHash>(),
            Err(ParseHashError::Length { actual: 4, .. })
        ));
        assert!(matches!(
            "zz23456789abcdef".parse::<PerceptualHash>(),
            Err(ParseHashError::Digit(_))
        ));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let hash = PerceptualHash::from_u64(0xdead_beef_0000_0001);
        let json = serde_json::to_string(&hash).unwrap();

        assert_eq!(json, "\"deadbeef00000001\"");
        assert_eq!(serde_json::from_str::<PerceptualHash>(&json).unwrap(), hash);
    }
}
