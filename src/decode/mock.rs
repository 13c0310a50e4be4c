//! In-memory codecs for exercising the façade without files.

use super::codec::{
    DecodeError, FallbackCodec, PackedRaster, PrimaryCodec, PrimaryError, StoredRaster,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// What a mock codec does when asked to decode.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return this raster for every path.
    Return(T),
    /// Report "no data" (primary) or a decode failure (fallback).
    Refuse,
    /// Panic inside the codec.
    Panic,
}

/// Primary codec serving a fixed raster.
#[derive(Debug)]
pub struct MockPrimaryCodec {
    behavior: MockBehavior<StoredRaster>,
    calls: AtomicUsize,
}

impl MockPrimaryCodec {
    /// Codec with the given behavior for every path.
    pub fn new(behavior: MockBehavior<StoredRaster>) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Codec that returns `raster` for every path.
    pub fn returning(raster: StoredRaster) -> Self {
        Self::new(MockBehavior::Return(raster))
    }

    /// Codec that never has data.
    pub fn unsupported() -> Self {
        Self::new(MockBehavior::Refuse)
    }

    /// Number of decode attempts so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PrimaryCodec for MockPrimaryCodec {
    fn name(&self) -> &'static str {
        "mock-primary"
    }

    fn read_unchanged(&self, _path: &Path) -> Result<StoredRaster, PrimaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Return(raster) => Ok(raster.clone()),
            MockBehavior::Refuse => Err(PrimaryError::UnsupportedFormat),
            MockBehavior::Panic => panic!("mock primary codec crashed"),
        }
    }
}

/// Fallback codec serving a fixed raster.
#[derive(Debug)]
pub struct MockFallbackCodec {
    behavior: MockBehavior<PackedRaster>,
    calls: AtomicUsize,
}

impl MockFallbackCodec {
    /// Codec with the given behavior for every path.
    pub fn new(behavior: MockBehavior<PackedRaster>) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Codec that returns `raster` for every path.
    pub fn returning(raster: PackedRaster) -> Self {
        Self::new(MockBehavior::Return(raster))
    }

    /// Codec that fails every decode.
    pub fn failing() -> Self {
        Self::new(MockBehavior::Refuse)
    }

    /// Number of decode attempts so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FallbackCodec for MockFallbackCodec {
    fn name(&self) -> &'static str {
        "mock-fallback"
    }

    fn read_dequantized(&self, path: &Path) -> Result<PackedRaster, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Return(raster) => Ok(raster.clone()),
            MockBehavior::Refuse => Err(DecodeError::failed(path, "mock fallback refused")),
            MockBehavior::Panic => panic!("mock fallback codec crashed"),
        }
    }
}
