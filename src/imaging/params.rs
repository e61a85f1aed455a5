//! Parameter types for image operations.
//!
//! These structs describe *what* to write, not *how*. The process stage
//! builds them from the resampling plan; the [`backend`](super::backend)
//! does the pixel work. Tests swap in a recording backend without touching
//! the planning logic.

use crate::types::OutputFormat;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Encoder quality for each output format.
    ///
    /// AVIF reaches JPEG-75 fidelity at a much lower nominal quality.
    pub fn for_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Jpeg => Self(75),
            OutputFormat::Webp => Self(75),
            OutputFormat::Avif => Self(50),
        }
    }
}

/// AVIF encoder speed (1 slowest, 10 fastest).
pub const AVIF_SPEED: u8 = 6;

/// One main variant: the source scaled to exactly `width × height`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub quality: Quality,
}

/// One thumbnail variant. Square thumbnails are centre-cropped to
/// `width × width`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub square: bool,
    pub format: OutputFormat,
    pub quality: Quality,
}
