//! Resampling algorithm selection.

use serde::{Deserialize, Serialize};

/// Resampling algorithms available to resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Point sampling.
    Nearest,
    /// Bilinear, 2 taps per axis.
    Linear,
    /// Area averaging (box filter) when shrinking.
    Area,
    /// Bicubic, 4 taps per axis.
    Cubic,
    /// Lanczos windowed sinc, 8 taps per axis.
    Lanczos4,
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Linear => "linear",
            Interpolation::Area => "area",
            Interpolation::Cubic => "cubic",
            Interpolation::Lanczos4 => "lanczos4",
        };
        f.write_str(name)
    }
}

/// Zoom quality for one media type: which algorithm to use when
/// enlarging and which when shrinking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityPreference {
    /// Used when either side grows.
    pub scale_up: Interpolation,
    /// Used when neither side grows.
    pub scale_down: Interpolation,
}

impl QualityPreference {
    /// Pairs an enlarging and a shrinking algorithm.
    pub fn new(scale_up: Interpolation, scale_down: Interpolation) -> Self {
        Self {
            scale_up,
            scale_down,
        }
    }

    /// Picks the algorithm for a resize that does or does not enlarge.
    #[inline]
    pub fn select(&self, enlarging: bool) -> Interpolation {
        if enlarging {
            self.scale_up
        } else {
            self.scale_down
        }
    }
}

impl Default for QualityPreference {
    fn default() -> Self {
        Self {
            scale_up: Interpolation::Linear,
            scale_down: Interpolation::Area,
        }
    }
}
