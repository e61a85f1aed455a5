//! Shared types passed between pipeline stages.
//!
//! The process stage fills an [`ImageRecord`] per source image; the generate
//! stage only ever reads the resulting [`RecordSet`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Output encodings the pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputFormat {
    Avif,
    Webp,
    Jpeg,
}

impl OutputFormat {
    /// Parse a user-supplied format name: `avif`, `.webp`, `JPG`, `jpeg`...
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let name = trimmed.strip_prefix('.').unwrap_or(trimmed);
        match name.to_ascii_lowercase().as_str() {
            "avif" => Some(Self::Avif),
            "webp" => Some(Self::Webp),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// File extension written to disk (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Avif => "avif",
            Self::Webp => "webp",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Avif => "image/avif",
            Self::Webp => "image/webp",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Descriptive fields read from an image's embedded XMP (`dc:title`,
/// `dc:creator`, `dc:description`). Each is empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptors {
    pub title: String,
    pub creator: String,
    pub description: String,
}

/// Everything the markup stage needs to know about one processed image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRecord {
    /// Rendered width → height, ascending by width.
    pub sizes: BTreeMap<u32, u32>,
    pub descriptors: Descriptors,
    /// Main variants whose encode failed; they are left out of the markup.
    pub failed: BTreeSet<(u32, OutputFormat)>,
}

impl ImageRecord {
    /// Whether the `(width, format)` variant is on disk after processing.
    pub fn has_variant(&self, width: u32, format: OutputFormat) -> bool {
        self.sizes.contains_key(&width) && !self.failed.contains(&(width, format))
    }

    pub fn max_width(&self) -> Option<u32> {
        self.sizes.keys().next_back().copied()
    }
}

/// Image name (file stem) → record. Iterates in name order.
pub type RecordSet = BTreeMap<String, ImageRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parse_accepts_dots_case_and_alias() {
        assert_eq!(OutputFormat::parse(".AVIF"), Some(OutputFormat::Avif));
        assert_eq!(OutputFormat::parse("webp"), Some(OutputFormat::Webp));
        assert_eq!(OutputFormat::parse("jpg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse(".jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse("png"), None);
        assert_eq!(OutputFormat::parse(""), None);
    }

    #[test]
    fn jpeg_writes_jpg_extension() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Avif.to_string(), "avif");
    }

    #[test]
    fn record_variant_lookup_respects_failures() {
        let mut record = ImageRecord::default();
        record.sizes.insert(400, 300);
        record.sizes.insert(800, 600);
        record.failed.insert((800, OutputFormat::Webp));

        assert!(record.has_variant(400, OutputFormat::Webp));
        assert!(!record.has_variant(800, OutputFormat::Webp));
        assert!(record.has_variant(800, OutputFormat::Jpeg));
        assert!(!record.has_variant(1200, OutputFormat::Jpeg));
        assert_eq!(record.max_width(), Some(800));
    }
}
