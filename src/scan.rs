//! Source enumeration.
//!
//! Stage 1 of the pipeline. Lists the input folder (not recursively), keeps
//! the files whose extension is in the configured allow-list and makes sure
//! every output folder exists before any image is touched.
//!
//! ```text
//! img/                      # `from`
//! ├── dusk.JPG              # kept: extension matched case-insensitively
//! ├── harbour.png           # kept
//! ├── notes.txt             # ignored
//! └── raw/                  # ignored: subfolders are not walked
//! ```
//!
//! Each kept file becomes a [`SourceImage`] named after its file stem. The
//! stem is the key of the image's record, so two files sharing a stem
//! (`dusk.jpg` and `dusk.png`) are rejected.

use crate::config::{ResolvedConfig, normalize_extension};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input folder {} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("input path {} is not a folder", .0.display())]
    NotADirectory(PathBuf),
    #[error("no file in {} has one of the extensions {exts}", .dir.display())]
    NoImages { dir: PathBuf, exts: String },
    #[error("{} and {} share the name `{name}`", .first.display(), .second.display())]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// One file selected for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// File stem, used for output names and as the record key.
    pub name: String,
    pub path: PathBuf,
}

/// List the input folder and keep the files with an allowed extension,
/// sorted by name.
pub fn enumerate(config: &ResolvedConfig) -> Result<Vec<SourceImage>, ScanError> {
    let dir = config.input_dir();
    if !dir.exists() {
        return Err(ScanError::Missing(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let mut found: BTreeMap<String, PathBuf> = BTreeMap::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !has_allowed_extension(&path, &config.exts) {
            continue;
        }
        let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        if let Some(first) = found.get(&name) {
            // Report the pair in a stable order regardless of listing order.
            let (first, second) = if first < &path {
                (first.clone(), path)
            } else {
                (path, first.clone())
            };
            return Err(ScanError::DuplicateName {
                name,
                first,
                second,
            });
        }
        found.insert(name, path);
    }

    if found.is_empty() {
        return Err(ScanError::NoImages {
            dir: dir.to_path_buf(),
            exts: config.exts.join(", "),
        });
    }

    Ok(found
        .into_iter()
        .map(|(name, path)| SourceImage { name, path })
        .collect())
}

fn has_allowed_extension(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .map(|e| normalize_extension(&e.to_string_lossy()))
        .is_some_and(|ext| exts.contains(&ext))
}

/// Create the main output folder and, when enabled, the thumbnail and
/// HTML folders.
pub fn prepare_output_dirs(config: &ResolvedConfig) -> Result<(), ScanError> {
    fs::create_dir_all(config.output_dir())?;
    if let Some(thumbs) = &config.thumbnails {
        fs::create_dir_all(thumbs.output_dir())?;
    }
    if let Some(html) = &config.html {
        fs::create_dir_all(&html.to)?;
    }
    Ok(())
}
