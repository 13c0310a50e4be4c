//! Configuration file format.
//!
//! Every section is optional; a missing file section or key falls back
//! to the built-in default.

use crate::decode::DecodePolicy;
use crate::resize::QualityPreference;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration loading errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
    #[error("invalid media type {0:?} in zoom table")]
    InvalidMediaType(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub decode: DecodePolicy,
    #[serde(default)]
    pub zoom: ZoomConfig,
}

/// Zoom quality, optionally overridden per media type.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ZoomConfig {
    /// Used for media types without an override.
    #[serde(default)]
    pub default: QualityPreference,
    /// Overrides keyed by lowercase media type, e.g. `image/gif`.
    #[serde(default)]
    pub per_mime: BTreeMap<String, QualityPreference>,
}

impl ZoomConfig {
    /// Quality preference for `mime`, matched case-insensitively.
    pub fn for_mime(&self, mime: &str) -> QualityPreference {
        self.per_mime
            .get(&mime.to_ascii_lowercase())
            .copied()
            .unwrap_or(self.default)
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.zoom.normalize()?;
        Ok(config)
    }
}

impl ZoomConfig {
    fn normalize(&mut self) -> Result<(), ConfigError> {
        let mut normalized = BTreeMap::new();
        for (mime, quality) in std::mem::take(&mut self.per_mime) {
            if !mime.contains('/') {
                return Err(ConfigError::InvalidMediaType(mime));
            }
            normalized.insert(mime.to_ascii_lowercase(), quality);
        }
        self.per_mime = normalized;
        Ok(())
    }
}
