//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the whole contract between the pipeline and
//! the pixel code: identify, read the embedded XMP packet, write a resized
//! variant, write a thumbnail.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), statically linked and
//! free of system image libraries.

use super::params::{ResizeParams, ThumbnailParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// Implementations must be `Sync`: one backend is shared by every worker.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Raw XMP packet embedded in the file, if any.
    fn read_xmp(&self, path: &Path) -> Result<Option<String>, BackendError>;

    /// Write `params.source` scaled to exactly `width × height`.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Write a thumbnail (square crop or proportional resize).
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;
}
