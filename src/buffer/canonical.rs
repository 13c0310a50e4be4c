//! Canonical image buffer type.

use thiserror::Error;

/// Channel layout of a canonical buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelOrder {
    /// Single luminance channel.
    Gray,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl ChannelOrder {
    /// Number of interleaved samples per pixel.
    #[inline]
    pub fn channel_count(self) -> usize {
        match self {
            ChannelOrder::Gray => 1,
            ChannelOrder::Rgb => 3,
            ChannelOrder::Rgba => 4,
        }
    }

    /// Maps a per-pixel sample count back to a layout.
    ///
    /// Returns `None` for counts other than 1, 3 or 4.
    pub fn from_channel_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ChannelOrder::Gray),
            3 => Some(ChannelOrder::Rgb),
            4 => Some(ChannelOrder::Rgba),
            _ => None,
        }
    }

    /// Returns true if the layout carries an alpha channel.
    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, ChannelOrder::Rgba)
    }
}

/// Errors raised when constructing a buffer from raw samples.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("image dimensions must be non-zero (got {width}x{height})")]
    EmptyDimensions { width: u32, height: u32 },

    #[error("sample count {actual} does not match {width}x{height}x{channels} = {expected}")]
    SizeMismatch {
        width: u32,
        height: u32,
        channels: usize,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported channel count {channels} (expected 1, 3 or 4)")]
    UnsupportedChannels { channels: usize },
}

/// A decoded image in canonical layout.
///
/// Holds `width * height * channel_count` samples, row-major with
/// interleaved channels. The invariant is checked once at construction
/// and the buffer is immutable afterwards, so every consumer can index
/// it without re-validating.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CanonicalImageBuffer {
    samples: Vec<u8>,
    width: u32,
    height: u32,
    order: ChannelOrder,
}

impl CanonicalImageBuffer {
    /// Wraps raw samples, validating dimensions against the sample count.
    pub fn new(
        width: u32,
        height: u32,
        order: ChannelOrder,
        samples: Vec<u8>,
    ) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::EmptyDimensions { width, height });
        }

        let channels = order.channel_count();
        let expected = (width as usize) * (height as usize) * channels;
        if samples.len() != expected {
            return Err(BufferError::SizeMismatch {
                width,
                height,
                channels,
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            samples,
            width,
            height,
            order,
        })
    }

    /// Wraps samples produced by code that already sized them correctly.
    pub(crate) fn from_raw_parts(
        width: u32,
        height: u32,
        order: ChannelOrder,
        samples: Vec<u8>,
    ) -> Self {
        debug_assert_eq!(
            samples.len(),
            (width as usize) * (height as usize) * order.channel_count()
        );
        Self {
            samples,
            width,
            height,
            order,
        }
    }

    /// Builds a buffer with every pixel set to `pixel`.
    ///
    /// The channel layout is taken from the pixel length (1, 3 or 4).
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> Result<Self, BufferError> {
        let order = ChannelOrder::from_channel_count(pixel.len()).ok_or(
            BufferError::UnsupportedChannels {
                channels: pixel.len(),
            },
        )?;
        let pixel_count = (width as usize) * (height as usize);
        Self::new(width, height, order, pixel.repeat(pixel_count))
    }

    /// Returns the interleaved samples.
    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Consumes the buffer, returning its samples.
    #[inline]
    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    /// Returns the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the channel layout.
    #[inline]
    pub fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    /// Returns the number of samples per pixel.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.order.channel_count()
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns the samples of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let channels = self.channel_count();
        let start = ((y as usize) * (self.width as usize) + x as usize) * channels;
        &self.samples[start..start + channels]
    }

    /// Validates that the sample buffer size matches dimensions.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.samples.len() == self.pixel_count() * self.channel_count()
    }
}

impl std::fmt::Debug for CanonicalImageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanonicalImageBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("order", &self.order)
            .field("sample_bytes", &self.samples.len())
            .finish()
    }
}
