//! Image processing in pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions`, `avif-parse` for AVIF |
//! | **XMP packet** | [`xmp_parser`] (JPEG APP1, PNG iTXt, WebP chunk) |
//! | **Resize** | Lanczos3 `resize_to_fill`, then JPEG / WebP / AVIF encode |
//! | **Thumbnail** | same, square or proportional |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod avif_decode;
pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;
pub mod xmp_parser;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{plan_sizes, plan_widths, proportional_height, thumbnail_dimensions};
pub use params::{AVIF_SPEED, Quality, ResizeParams, ThumbnailParams};
pub use rust_backend::RustBackend;
