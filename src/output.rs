//! CLI output formatting.
//!
//! Each image leads with its positional index and name, with the source path
//! and per-variant status shown as indented context lines.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Processing 2 images with 8 workers
//! 001 dusk (4000x3000)
//!     Source: img/dusk.jpg
//!     dusk_400_300.avif: encoded
//!     dusk_400_300.jpg: exists
//!     thumbs/dusk_100.jpg: encoded
//! 002 broken
//!     Source: img/broken.png
//!     Error: Failed to read dimensions: ...
//!
//! 3 encoded, 1 already processed, 0 failed
//! Gallery: imgProcessed/gallery.html (1 image)
//! ```
//!
//! With `verbose = false` only failures are listed.
//!
//! ## Check
//!
//! ```text
//! 001 dusk (4000x3000)
//!     Source: img/dusk.jpg
//!     Sizes: 400x300, 800x600
//!     imgProcessed/dusk_400_300.avif
//!     imgProcessed/dusk_800_600.avif (exists)
//! ```
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability. Format functions are pure, with no I/O.

use crate::process::{
    ImagePlan, ProcessEvent, RunSummary, VariantInfo, VariantKind, VariantStatus,
};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn variant_line(variant: &VariantInfo) -> String {
    let status = match &variant.status {
        VariantStatus::Existing => "exists".to_string(),
        VariantStatus::Encoded => "encoded".to_string(),
        VariantStatus::Failed(e) => format!("FAILED ({e})"),
    };
    let prefix = match variant.kind {
        VariantKind::Main => "",
        VariantKind::Thumbnail => "thumbs/",
    };
    format!("{}{}{}: {}", indent(1), prefix, variant.file, status)
}

// ============================================================================
// Build progress
// ============================================================================

/// Format a single process progress event as display lines.
///
/// In quiet mode only images with a failure produce output, and only their
/// failed variants are listed.
pub fn format_process_event(event: &ProcessEvent, verbose: bool) -> Vec<String> {
    match event {
        ProcessEvent::Started {
            image_count,
            threads,
        } => {
            if verbose {
                vec![format!(
                    "Processing {} with {}",
                    plural(*image_count, "image"),
                    plural(*threads, "worker")
                )]
            } else {
                Vec::new()
            }
        }
        ProcessEvent::ImageProcessed {
            index,
            name,
            source_path,
            width,
            height,
            variants,
        } => {
            let shown: Vec<&VariantInfo> = variants
                .iter()
                .filter(|v| verbose || matches!(v.status, VariantStatus::Failed(_)))
                .collect();
            if shown.is_empty() && !verbose {
                return Vec::new();
            }
            let mut lines = vec![
                format!("{} {} ({}x{})", format_index(*index), name, width, height),
                format!("{}Source: {}", indent(1), source_path),
            ];
            lines.extend(shown.into_iter().map(variant_line));
            lines
        }
        ProcessEvent::ImageFailed {
            index,
            name,
            source_path,
            error,
        } => vec![
            format!("{} {}", format_index(*index), name),
            format!("{}Source: {}", indent(1), source_path),
            format!("{}Error: {}", indent(1), error),
        ],
    }
}

/// Format the closing summary of a build.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![summary.stats.to_string()];
    if !summary.failed_images.is_empty() {
        lines.push(format!(
            "Unreadable: {}",
            summary.failed_images.join(", ")
        ));
    }
    match &summary.gallery {
        Some(Ok(gallery)) => {
            lines.push(format!(
                "Gallery: {} ({})",
                gallery.path.display(),
                plural(gallery.images, "image")
            ));
            if !gallery.skipped.is_empty() {
                lines.push(format!(
                    "{}Left out (no jpeg variant): {}",
                    indent(1),
                    gallery.skipped.join(", ")
                ));
            }
        }
        Some(Err(e)) => lines.push(format!("Gallery not written: {e}")),
        None => {}
    }
    lines
}

pub fn print_summary(summary: &RunSummary) {
    for line in format_summary(summary) {
        println!("{line}");
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the dry-run plan of every image.
pub fn format_plan(plans: &[ImagePlan]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, plan) in plans.iter().enumerate() {
        match &plan.dimensions {
            Ok((w, h)) => {
                lines.push(format!("{} {} ({}x{})", format_index(i + 1), plan.name, w, h));
                lines.push(format!("{}Source: {}", indent(1), plan.source_path));
                let sizes: Vec<String> =
                    plan.sizes.iter().map(|(w, h)| format!("{w}x{h}")).collect();
                lines.push(format!("{}Sizes: {}", indent(1), sizes.join(", ")));
                for (path, exists) in &plan.outputs {
                    let marker = if *exists { " (exists)" } else { "" };
                    lines.push(format!("{}{}{}", indent(1), path.display(), marker));
                }
            }
            Err(e) => {
                lines.push(format!("{} {}", format_index(i + 1), plan.name));
                lines.push(format!("{}Source: {}", indent(1), plan.source_path));
                lines.push(format!("{}Error: {}", indent(1), e));
            }
        }
    }
    lines
}

pub fn print_plan(plans: &[ImagePlan]) {
    for line in format_plan(plans) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{GalleryOutput, GenerateError};
    use crate::process::ProcessStats;
    use std::path::PathBuf;

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "image"), "1 image");
        assert_eq!(plural(0, "image"), "0 images");
    }

    // =========================================================================
    // Process event formatting tests
    // =========================================================================

    fn processed(variants: Vec<VariantInfo>) -> ProcessEvent {
        ProcessEvent::ImageProcessed {
            index: 1,
            name: "dusk".to_string(),
            source_path: "img/dusk.jpg".to_string(),
            width: 4000,
            height: 3000,
            variants,
        }
    }

    fn variant(kind: VariantKind, file: &str, status: VariantStatus) -> VariantInfo {
        VariantInfo {
            kind,
            file: file.to_string(),
            status,
        }
    }

    #[test]
    fn format_started() {
        let event = ProcessEvent::Started {
            image_count: 5,
            threads: 1,
        };
        assert_eq!(
            format_process_event(&event, true),
            vec!["Processing 5 images with 1 worker"]
        );
        assert!(format_process_event(&event, false).is_empty());
    }

    #[test]
    fn format_image_lists_every_variant() {
        let event = processed(vec![
            variant(VariantKind::Main, "dusk_400_300.avif", VariantStatus::Encoded),
            variant(VariantKind::Main, "dusk_400_300.jpg", VariantStatus::Existing),
            variant(VariantKind::Thumbnail, "dusk_100.jpg", VariantStatus::Encoded),
        ]);
        let lines = format_process_event(&event, true);
        assert_eq!(
            lines,
            vec![
                "001 dusk (4000x3000)",
                "    Source: img/dusk.jpg",
                "    dusk_400_300.avif: encoded",
                "    dusk_400_300.jpg: exists",
                "    thumbs/dusk_100.jpg: encoded",
            ]
        );
    }

    #[test]
    fn quiet_mode_shows_only_failures() {
        let ok = processed(vec![variant(
            VariantKind::Main,
            "dusk_400_300.jpg",
            VariantStatus::Encoded,
        )]);
        assert!(format_process_event(&ok, false).is_empty());

        let failed = processed(vec![
            variant(VariantKind::Main, "dusk_400_300.jpg", VariantStatus::Encoded),
            variant(
                VariantKind::Main,
                "dusk_400_300.avif",
                VariantStatus::Failed("disk full".to_string()),
            ),
        ]);
        let lines = format_process_event(&failed, false);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "    dusk_400_300.avif: FAILED (disk full)");
    }

    #[test]
    fn format_unreadable_image_even_when_quiet() {
        let event = ProcessEvent::ImageFailed {
            index: 3,
            name: "broken".to_string(),
            source_path: "img/broken.png".to_string(),
            error: "bad header".to_string(),
        };
        let lines = format_process_event(&event, false);
        assert_eq!(
            lines,
            vec!["003 broken", "    Source: img/broken.png", "    Error: bad header"]
        );
    }

    // =========================================================================
    // Summary and plan
    // =========================================================================

    #[test]
    fn summary_with_gallery() {
        let summary = RunSummary {
            stats: ProcessStats {
                encoded: 3,
                existing: 1,
                failed: 0,
            },
            failed_images: vec!["broken".to_string()],
            gallery: Some(Ok(GalleryOutput {
                path: PathBuf::from("out/gallery.html"),
                images: 1,
                skipped: vec!["nojpeg".to_string()],
            })),
        };
        assert_eq!(
            format_summary(&summary),
            vec![
                "3 encoded, 1 already processed, 0 failed",
                "Unreadable: broken",
                "Gallery: out/gallery.html (1 image)",
                "    Left out (no jpeg variant): nojpeg",
            ]
        );
    }

    #[test]
    fn summary_with_gallery_error() {
        let summary = RunSummary {
            stats: ProcessStats::default(),
            failed_images: Vec::new(),
            gallery: Some(Err(GenerateError::Io(std::io::Error::other("read-only")))),
        };
        let lines = format_summary(&summary);
        assert_eq!(lines[1], "Gallery not written: IO error: read-only");
    }

    #[test]
    fn plan_lists_outputs() {
        let plans = vec![
            ImagePlan {
                name: "dusk".to_string(),
                source_path: "img/dusk.jpg".to_string(),
                dimensions: Ok((800, 600)),
                sizes: vec![(400, 300), (800, 600)],
                outputs: vec![
                    (PathBuf::from("out/dusk_400_300.jpg"), true),
                    (PathBuf::from("out/dusk_800_600.jpg"), false),
                ],
            },
            ImagePlan {
                name: "broken".to_string(),
                source_path: "img/broken.png".to_string(),
                dimensions: Err("bad header".to_string()),
                sizes: Vec::new(),
                outputs: Vec::new(),
            },
        ];
        assert_eq!(
            format_plan(&plans),
            vec![
                "001 dusk (800x600)",
                "    Source: img/dusk.jpg",
                "    Sizes: 400x300, 800x600",
                "    out/dusk_400_300.jpg (exists)",
                "    out/dusk_800_600.jpg",
                "002 broken",
                "    Source: img/broken.png",
                "    Error: bad header",
            ]
        );
    }
}
