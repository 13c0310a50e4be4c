//! Decode strategy selection.

use serde::{Deserialize, Serialize};

/// Process-wide decode strategy, fixed when the decoder is built.
///
/// The fast primary codec can crash or silently misbehave on corrupt
/// files. Setting `prefer_robust_decoder` sends every file straight to
/// the tolerant fallback codec, at roughly half the decode speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodePolicy {
    /// Skip the primary codec entirely.
    pub prefer_robust_decoder: bool,
}

impl DecodePolicy {
    /// Policy that always uses the tolerant codec.
    pub fn robust() -> Self {
        Self {
            prefer_robust_decoder: true,
        }
    }

    /// Policy that tries the fast codec first.
    pub fn fast() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefers_fast_path() {
        assert!(!DecodePolicy::default().prefer_robust_decoder);
        assert_eq!(DecodePolicy::fast(), DecodePolicy::default());
    }

    #[test]
    fn test_parse_from_toml() {
        let policy: DecodePolicy = toml::from_str("prefer_robust_decoder = true").unwrap();
        assert_eq!(policy, DecodePolicy::robust());

        let empty: DecodePolicy = toml::from_str("").unwrap();
        assert_eq!(empty, DecodePolicy::fast());
    }
}
