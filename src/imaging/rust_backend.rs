//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP) | `image` crate (pure Rust decoders) |
//! | Decode (AVIF) | `avif-parse` + `rav1d`, see [`avif_decode`](super::avif_decode) |
//! | Resize | `DynamicImage::resize_to_fill` with `Lanczos3` (exact output size) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder`, quality 75 |
//! | Encode → WebP | `webp` crate (libwebp, lossy), quality 75 |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e), speed 6 |
//! | XMP packet | [`xmp_parser`](super::xmp_parser) |
//!
//! Each variant is encoded into memory and written in one call, so a failed
//! encode never leaves a partial file that a later run would take as done.

use super::avif_decode::{decode_avif, identify_avif};
use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{AVIF_SPEED, Quality, ResizeParams, ThumbnailParams};
use super::xmp_parser;
use crate::types::OutputFormat;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn is_avif(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("avif"))
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    if is_avif(path) {
        return decode_avif(path);
    }
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Drop anything the encoders cannot take (16-bit, float, luma-alpha).
fn to_eight_bit(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img,
        other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// Encode `img` in `format` into an in-memory buffer.
fn encode(
    img: &DynamicImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut buf,
                quality.value() as u8,
            );
            rgb.write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))?;
        }
        OutputFormat::Webp => {
            let (w, h) = (img.width(), img.height());
            let encoded = if img.color().has_alpha() {
                let rgba = img.to_rgba8();
                webp::Encoder::from_rgba(&rgba, w, h).encode(quality.value() as f32)
            } else {
                let rgb = img.to_rgb8();
                webp::Encoder::from_rgb(&rgb, w, h).encode(quality.value() as f32)
            };
            buf.extend_from_slice(&encoded);
        }
        OutputFormat::Avif => {
            let encoder = image::codecs::avif::AvifEncoder::new_with_speed_quality(
                &mut buf,
                AVIF_SPEED,
                quality.value() as u8,
            );
            img.write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("AVIF encode failed: {e}")))?;
        }
    }
    Ok(buf)
}

fn save_image(
    img: &DynamicImage,
    path: &Path,
    format: OutputFormat,
    quality: Quality,
) -> Result<(), BackendError> {
    let bytes = encode(img, format, quality)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        if is_avif(path) {
            return identify_avif(path);
        }
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
            })?;
        Ok(Dimensions { width, height })
    }

    fn read_xmp(&self, path: &Path) -> Result<Option<String>, BackendError> {
        Ok(xmp_parser::read_xmp(path)?)
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = to_eight_bit(load_image(&params.source)?);
        let resized = img.resize_to_fill(params.width, params.height, FilterType::Lanczos3);
        save_image(&resized, &params.output, params.format, params.quality)
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let img = to_eight_bit(load_image(&params.source)?);
        // Square thumbnails are centre-cropped; proportional ones already
        // have the source aspect ratio, so nothing is cropped.
        let thumb = img.resize_to_fill(params.width, params.height, FilterType::Lanczos3);
        save_image(&thumb, &params.output, params.format, params.quality)
    }
}
