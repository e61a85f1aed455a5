//! Render fan-out and the pipeline driver.
//!
//! Stage 2 of the pipeline. For every source image:
//!
//! 1. identify its dimensions and read its XMP descriptors;
//! 2. plan the target `(width, height)` pairs;
//! 3. for each pair and each output format, skip the file if it already
//!    exists (unless `force` is set) or encode it;
//! 4. do the same for each thumbnail width and format;
//! 5. hand back an [`ImageRecord`] for the markup stage.
//!
//! ## Output Structure
//!
//! ```text
//! imgProcessed/
//! ├── dusk_400_267.avif          # `name` template, per width and format
//! ├── dusk_400_267.webp
//! ├── dusk_400_267.jpg
//! ├── dusk_800_533.avif
//! ├── ...
//! ├── gallery.html               # when html is enabled
//! └── thumbs/
//!     ├── dusk_100.avif          # `thumbnails.name`, per width and format
//!     └── dusk_100.jpg
//! ```
//!
//! ## Parallel Processing
//!
//! A [rayon](https://docs.rs/rayon) pool of `maxProcesses` workers (one per
//! core by default) is built per run. Images are processed in parallel and
//! so are the variants of each image, so a slow AVIF encode never holds up
//! its sibling JPEG. The pool bounds the total number of concurrent encodes.
//!
//! A failed variant is reported and left out of the markup; it never stops
//! its siblings or the run. Only configuration and input errors are fatal.

use crate::config::{self, ConfigError, HtmlConfig, ResolvedConfig};
use crate::generate::{self, GalleryOutput, GenerateError};
use crate::imaging::{
    Dimensions, ImageBackend, Quality, ResizeParams, ThumbnailParams, plan_sizes,
    thumbnail_dimensions,
};
use crate::metadata;
use crate::naming::NameContext;
use crate::scan::{self, ScanError, SourceImage};
use crate::types::{Descriptors, ImageRecord, OutputFormat, RecordSet};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Input error: {0}")]
    Scan(#[from] ScanError),
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Which set a variant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Main,
    Thumbnail,
}

/// What happened to one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantStatus {
    /// Already on disk and `force` is off.
    Existing,
    Encoded,
    Failed(String),
}

/// One output file of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantInfo {
    pub kind: VariantKind,
    /// Output file name.
    pub file: String,
    pub status: VariantStatus,
}

/// Progress events emitted while images are processed.
///
/// Sent over an [`std::sync::mpsc`] channel so the caller can print
/// progress while workers run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Started {
        image_count: usize,
        threads: usize,
    },
    ImageProcessed {
        /// 1-based position in name order.
        index: usize,
        name: String,
        source_path: String,
        width: u32,
        height: u32,
        variants: Vec<VariantInfo>,
    },
    ImageFailed {
        index: usize,
        name: String,
        source_path: String,
        error: String,
    },
}

/// Variant counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub encoded: usize,
    pub existing: usize,
    pub failed: usize,
}

impl ProcessStats {
    fn record(&mut self, status: &VariantStatus) {
        match status {
            VariantStatus::Existing => self.existing += 1,
            VariantStatus::Encoded => self.encoded += 1,
            VariantStatus::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.encoded + self.existing + self.failed
    }
}

impl fmt::Display for ProcessStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} encoded, {} already processed, {} failed",
            self.encoded, self.existing, self.failed
        )
    }
}

/// Output of the render stage.
#[derive(Debug, Default)]
pub struct ProcessResult {
    pub records: RecordSet,
    pub stats: ProcessStats,
    /// Images that could not be identified.
    pub failed_images: Vec<String>,
}

// =============================================================================
// Per-image work
// =============================================================================

enum Job {
    Main(ResizeParams),
    Thumbnail(ThumbnailParams),
}

impl Job {
    fn output(&self) -> &Path {
        match self {
            Job::Main(p) => &p.output,
            Job::Thumbnail(p) => &p.output,
        }
    }

    fn kind(&self) -> VariantKind {
        match self {
            Job::Main(_) => VariantKind::Main,
            Job::Thumbnail(_) => VariantKind::Thumbnail,
        }
    }

    fn run(&self, backend: &impl ImageBackend, force: bool) -> VariantStatus {
        let output = self.output();
        match output.try_exists() {
            Ok(true) if !force => return VariantStatus::Existing,
            Ok(_) => {}
            Err(e) => return VariantStatus::Failed(format!("cannot check output: {e}")),
        }
        let result = match self {
            Job::Main(params) => backend.resize(params),
            Job::Thumbnail(params) => backend.thumbnail(params),
        };
        match result {
            Ok(()) => VariantStatus::Encoded,
            Err(e) => {
                tracing::debug!(output = %output.display(), "encode failed: {e}");
                VariantStatus::Failed(e.to_string())
            }
        }
    }

    fn info(&self, status: VariantStatus) -> VariantInfo {
        VariantInfo {
            kind: self.kind(),
            file: self
                .output()
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default(),
            status,
        }
    }
}

fn output_path(dir: &Path, basename: &str, format: OutputFormat) -> PathBuf {
    dir.join(format!("{basename}.{}", format.extension()))
}

/// Every main and thumbnail variant of one image, plus the planned sizes.
fn plan_jobs(
    config: &ResolvedConfig,
    image: &SourceImage,
    dimensions: Dimensions,
    descriptors: &Descriptors,
) -> (Vec<(u32, u32)>, Vec<Job>) {
    let source = dimensions.as_tuple();
    let ctx = NameContext::new(&image.name, descriptors);
    let sizes = plan_sizes(source, &config.widths, config.max_height);

    let mut jobs = Vec::new();
    for &(width, height) in &sizes {
        let basename = config.name.render_file_name(&ctx.sized(width, height));
        for &format in &config.formats {
            jobs.push(Job::Main(ResizeParams {
                source: image.path.clone(),
                output: output_path(config.output_dir(), &basename, format),
                width,
                height,
                format,
                quality: Quality::for_format(format),
            }));
        }
    }

    if let Some(thumbs) = &config.thumbnails {
        for &width in &thumbs.widths {
            let (tw, th) = thumbnail_dimensions(source, width, thumbs.square);
            let basename = thumbs.name.render_file_name(&ctx.sized(tw, th));
            for &format in &thumbs.formats {
                jobs.push(Job::Thumbnail(ThumbnailParams {
                    source: image.path.clone(),
                    output: output_path(thumbs.output_dir(), &basename, format),
                    width: tw,
                    height: th,
                    square: thumbs.square,
                    format,
                    quality: Quality::for_format(format),
                }));
            }
        }
    }

    (sizes, jobs)
}

struct ImageOutcome {
    name: String,
    record: Option<ImageRecord>,
    variants: Vec<VariantStatus>,
}

fn process_image(
    backend: &impl ImageBackend,
    config: &ResolvedConfig,
    image: &SourceImage,
    index: usize,
    progress: Option<&Sender<ProcessEvent>>,
) -> ImageOutcome {
    let source_path = image.path.display().to_string();

    let dimensions = match backend.identify(&image.path) {
        Ok(d) => d,
        Err(e) => {
            if let Some(tx) = progress {
                tx.send(ProcessEvent::ImageFailed {
                    index,
                    name: image.name.clone(),
                    source_path,
                    error: e.to_string(),
                })
                .ok();
            }
            return ImageOutcome {
                name: image.name.clone(),
                record: None,
                variants: Vec::new(),
            };
        }
    };

    let packet = backend.read_xmp(&image.path).unwrap_or_else(|e| {
        tracing::warn!(path = %source_path, "cannot read metadata: {e}");
        None
    });
    let descriptors = metadata::extract_descriptors(packet.as_deref());

    let (sizes, jobs) = plan_jobs(config, image, dimensions, &descriptors);
    tracing::debug!(image = %image.name, ?sizes, jobs = jobs.len(), "planned");

    let statuses: Vec<VariantStatus> = jobs
        .par_iter()
        .map(|job| job.run(backend, config.force))
        .collect();

    let mut record = ImageRecord {
        sizes: sizes.iter().copied().collect(),
        descriptors,
        failed: Default::default(),
    };
    for (job, status) in jobs.iter().zip(&statuses) {
        if let (Job::Main(params), VariantStatus::Failed(_)) = (job, status) {
            record.failed.insert((params.width, params.format));
        }
    }

    if let Some(tx) = progress {
        tx.send(ProcessEvent::ImageProcessed {
            index,
            name: image.name.clone(),
            source_path,
            width: dimensions.width,
            height: dimensions.height,
            variants: jobs
                .iter()
                .zip(statuses.iter().cloned())
                .map(|(job, status)| job.info(status))
                .collect(),
        })
        .ok();
    }

    ImageOutcome {
        name: image.name.clone(),
        record: Some(record),
        variants: statuses,
    }
}

/// Render every image with the given backend.
///
/// Runs on a dedicated pool sized by `maxProcesses`, returning once every
/// image and every variant has finished.
pub fn process_with_backend(
    backend: &impl ImageBackend,
    config: &ResolvedConfig,
    images: &[SourceImage],
    progress: Option<&Sender<ProcessEvent>>,
) -> Result<ProcessResult, ProcessError> {
    let threads = config::effective_threads(config.max_processes);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;
    tracing::debug!(threads, images = images.len(), "starting render pool");

    if let Some(tx) = progress {
        tx.send(ProcessEvent::Started {
            image_count: images.len(),
            threads,
        })
        .ok();
    }

    let outcomes: Vec<ImageOutcome> = pool.install(|| {
        images
            .par_iter()
            .enumerate()
            .map(|(i, image)| process_image(backend, config, image, i + 1, progress))
            .collect()
    });

    let mut result = ProcessResult::default();
    for outcome in outcomes {
        for status in &outcome.variants {
            result.stats.record(status);
        }
        match outcome.record {
            Some(record) => {
                result.records.insert(outcome.name, record);
            }
            None => result.failed_images.push(outcome.name),
        }
    }
    Ok(result)
}

// =============================================================================
// Whole run
// =============================================================================

/// Outcome of a full run.
#[derive(Debug)]
pub struct RunSummary {
    pub stats: ProcessStats,
    pub failed_images: Vec<String>,
    /// Result of the markup stage, when enabled.
    pub gallery: Option<Result<GalleryOutput, GenerateError>>,
}

impl RunSummary {
    /// True when every variant rendered and the markup (if any) was written.
    pub fn is_success(&self) -> bool {
        self.stats.failed == 0
            && self.failed_images.is_empty()
            && !matches!(self.gallery, Some(Err(_)))
    }
}

fn write_markup(
    html: &HtmlConfig,
    config: &ResolvedConfig,
    records: &RecordSet,
) -> Result<GalleryOutput, GenerateError> {
    let output = generate::write_gallery(config, html, records);
    if let Err(e) = &output {
        tracing::debug!("gallery write failed: {e}");
    }
    output
}

/// Enumerate, render and (optionally) assemble the gallery markup.
pub fn run(
    config: &ResolvedConfig,
    backend: &impl ImageBackend,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    let images = scan::enumerate(config)?;
    scan::prepare_output_dirs(config)?;

    let result = process_with_backend(backend, config, &images, progress.as_ref())?;
    // Close the channel so a printer thread can finish before the summary.
    drop(progress);

    let gallery = config
        .html
        .as_ref()
        .map(|html| write_markup(html, config, &result.records));

    Ok(RunSummary {
        stats: result.stats,
        failed_images: result.failed_images,
        gallery,
    })
}

/// Resampling plan of one image, for `check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlan {
    pub name: String,
    pub source_path: String,
    /// Source dimensions, or why they could not be read.
    pub dimensions: Result<(u32, u32), String>,
    /// Planned main sizes.
    pub sizes: Vec<(u32, u32)>,
    /// Output files, with whether each already exists.
    pub outputs: Vec<(PathBuf, bool)>,
}

/// Enumerate and plan every image without encoding anything.
pub fn plan(
    config: &ResolvedConfig,
    backend: &impl ImageBackend,
) -> Result<Vec<ImagePlan>, ProcessError> {
    let images = scan::enumerate(config)?;
    Ok(images
        .iter()
        .map(|image| {
            let source_path = image.path.display().to_string();
            match backend.identify(&image.path) {
                Ok(dimensions) => {
                    let packet = backend.read_xmp(&image.path).ok().flatten();
                    let descriptors = metadata::extract_descriptors(packet.as_deref());
                    let (sizes, jobs) = plan_jobs(config, image, dimensions, &descriptors);
                    ImagePlan {
                        name: image.name.clone(),
                        source_path,
                        dimensions: Ok(dimensions.as_tuple()),
                        sizes,
                        outputs: jobs
                            .iter()
                            .map(|job| (job.output().to_path_buf(), job.output().exists()))
                            .collect(),
                    }
                }
                Err(e) => ImagePlan {
                    name: image.name.clone(),
                    source_path,
                    dimensions: Err(e.to_string()),
                    sizes: Vec::new(),
                    outputs: Vec::new(),
                },
            }
        })
        .collect())
}
