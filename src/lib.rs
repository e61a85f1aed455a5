//! # Gallery Forge
//!
//! Batch-resizes a folder of images into responsive variants (several widths
//! in AVIF, WebP and JPEG) and optionally writes the HTML markup that
//! references them.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      img/        →  source list          (config + directory listing)
//! 2. Process   source list →  imgProcessed/         (variants + thumbnails, one record per image)
//! 3. Generate  records     →  gallery.html          (responsive markup)
//! ```
//!
//! Configuration is resolved once into an immutable
//! [`ResolvedConfig`](config::ResolvedConfig) before any directory is read;
//! every later stage only reads it. Stage 3 starts after every image of
//! stage 2 has finished and only sees the collected
//! [`RecordSet`](types::RecordSet), which iterates in name order.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | TOML loading, validation and defaults |
//! | [`naming`] | `{placeholder}` templates for output names and markup fields |
//! | [`scan`] | Stage 1: lists the input folder and prepares output folders |
//! | [`metadata`] | `dc:title`, `dc:creator`, `dc:description` from an XMP packet |
//! | [`imaging`] | Resampling plan, encode backend, XMP packet location |
//! | [`process`] | Stage 2: renders every variant on a bounded worker pool |
//! | [`generate`] | Stage 3: assembles the gallery markup using Maud |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Shared types passed between stages |
//!
//! # Design Decisions
//!
//! ## Existing Files Are Never Rewritten
//!
//! A variant whose output file is already on disk is skipped unless `force`
//! is set, so a second run over an unchanged folder performs no encodes. Each
//! variant is encoded in memory and written in one call: a failed encode
//! leaves no partial file behind.
//!
//! ## Exact Dimensions
//!
//! Every variant is resampled to an explicit `(width, height)` pair. The
//! height that names the file and fills `data-height` in the markup is the
//! height of the pixels on disk.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling, JPEG
//! and rav1e-based AVIF encoding), `rav1d` for AVIF decoding and `webp` for
//! lossy WebP. No ImageMagick, no sharp, no system libraries to install.

pub mod config;
pub mod generate;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
