//! Configuration loading and validation.
//!
//! A run is configured by an optional TOML file passed with `-c`/`--config`.
//! The file is read as an untyped [`toml::Value`] and turned into a
//! [`ResolvedConfig`] by [`resolve`], which checks every key before any
//! directory is read or any image decoded. The first bad key aborts the whole
//! resolution with a [`ConfigError::Invalid`] naming the key and the value it
//! received; nothing is partially applied.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! from = "img/"                      # Folder holding the source images
//! to = "imgProcessed/"               # Destination folder (created if missing)
//! exts = [".avif", ".gif", ".jpeg", ".jpg", ".png", ".webp"]
//! formats = ["avif", "webp", "jpg"] # Output formats: avif, webp, jpg
//! widths = [400, 800, 1200, 1600, 2000, 2400, 2800, 3200]
//! maxHeight = 3200
//! name = "{name}_{width}_{height}"   # Output basename template
//! verbose = true
//! force = false                      # Re-encode files that already exist
//! maxProcesses = 4                   # Worker threads (omit for CPU cores)
//!
//! [thumbnails]                       # or `thumbnails = true` for defaults
//! to = "imgProcessed/thumbs/"
//! name = "{name}_{width}"
//! widths = [100, 120]
//! queries = [1024]                   # one fewer than widths
//! square = true
//! formats = ["webp", "jpg"]
//!
//! [html]                             # or `html = true` for defaults
//! to = "imgProcessed/"
//! root = ""
//! name = "gallery.html"
//! container = "a"
//! caption = "{title}"
//! width = 2000                       # Fallback jpeg width
//! ```
//!
//! Both scalar and list forms are accepted for `exts`, `formats`, `widths`
//! and `queries` (`widths = 800` is the same as `widths = [800]`).
//!
//! Unknown keys are rejected to catch typos early.

use crate::naming::{IMAGE_NAME_FIELDS, Renderer, THUMBNAIL_NAME_FIELDS, Template};
use crate::types::OutputFormat;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml::Value;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("configuration file {} can't be found", .0.display())]
    NotFound(PathBuf),
    #[error("configuration file {} must have a .toml extension", .0.display())]
    Extension(PathBuf),
    #[error("`{key}` {reason} (received: {value})")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

pub const DEFAULT_FROM: &str = "img/";
pub const DEFAULT_TO: &str = "imgProcessed/";
pub const DEFAULT_EXTS: &[&str] = &[".avif", ".gif", ".jpeg", ".jpg", ".png", ".webp"];
pub const DEFAULT_FORMATS: &[OutputFormat] =
    &[OutputFormat::Avif, OutputFormat::Webp, OutputFormat::Jpeg];
pub const DEFAULT_WIDTHS: &[u32] = &[400, 800, 1200, 1600, 2000, 2400, 2800, 3200];
pub const DEFAULT_MAX_HEIGHT: u32 = 3200;
pub const DEFAULT_NAME: &str = "{name}_{width}_{height}";
pub const DEFAULT_THUMBNAIL_NAME: &str = "{name}_{width}";
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 100;
pub const DEFAULT_HTML_NAME: &str = "gallery.html";
pub const DEFAULT_FALLBACK_WIDTH: u32 = 2000;

const TOP_LEVEL_KEYS: &[&str] = &[
    "from",
    "to",
    "exts",
    "formats",
    "widths",
    "maxHeight",
    "name",
    "verbose",
    "force",
    "maxProcesses",
    "thumbnails",
    "html",
];

const THUMBNAIL_KEYS: &[&str] = &["to", "name", "widths", "square", "queries", "formats"];

const HTML_KEYS: &[&str] = &[
    "to",
    "root",
    "name",
    "wrapper",
    "wrapperAttr",
    "thumbnail",
    "container",
    "comment",
    "class",
    "title",
    "alt",
    "more",
    "caption",
    "start",
    "thumbnailAlt",
    "thumbnailTitle",
    "end",
    "width",
];

/// Every pipeline setting after validation. Never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Input folder, always ending with `/`.
    pub from: String,
    /// Output folder, always ending with `/`.
    pub to: String,
    /// Lower-case, dot-prefixed input extensions.
    pub exts: Vec<String>,
    pub formats: Vec<OutputFormat>,
    /// Ascending, deduplicated.
    pub widths: Vec<u32>,
    pub max_height: u32,
    pub name: Template,
    pub verbose: bool,
    pub force: bool,
    /// Worker cap; `None` means one per CPU core.
    pub max_processes: Option<usize>,
    pub thumbnails: Option<ThumbnailConfig>,
    pub html: Option<HtmlConfig>,
}

impl ResolvedConfig {
    pub fn input_dir(&self) -> &Path {
        Path::new(&self.from)
    }

    pub fn output_dir(&self) -> &Path {
        Path::new(&self.to)
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            from: DEFAULT_FROM.to_string(),
            to: DEFAULT_TO.to_string(),
            exts: DEFAULT_EXTS.iter().map(|e| e.to_string()).collect(),
            formats: DEFAULT_FORMATS.to_vec(),
            widths: DEFAULT_WIDTHS.to_vec(),
            max_height: DEFAULT_MAX_HEIGHT,
            name: Template::parse(DEFAULT_NAME, IMAGE_NAME_FIELDS)
                .expect("default name template must parse"),
            verbose: true,
            force: false,
            max_processes: None,
            thumbnails: None,
            html: None,
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailConfig {
    pub to: String,
    pub name: Template,
    /// Crop to `width × width` instead of keeping the aspect ratio.
    pub square: bool,
    pub formats: Vec<OutputFormat>,
    pub widths: Vec<u32>,
    /// `min-width` breakpoints, one per transition between adjacent widths.
    pub queries: Vec<u32>,
}

impl ThumbnailConfig {
    /// Defaults used for `thumbnails = true`, nested under the main output folder.
    pub fn defaults_for(output_dir: &str) -> Self {
        Self {
            to: format!("{output_dir}thumbs/"),
            name: Template::parse(DEFAULT_THUMBNAIL_NAME, THUMBNAIL_NAME_FIELDS)
                .expect("default thumbnail template must parse"),
            square: true,
            formats: DEFAULT_FORMATS.to_vec(),
            widths: vec![DEFAULT_THUMBNAIL_WIDTH],
            queries: Vec::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        Path::new(&self.to)
    }
}

/// Per-image HTML fields, each fixed or derived from the image's metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlRenderers {
    /// Element wrapping each image (`a` renders an `href`, others `data-href`).
    pub container: Renderer,
    pub comment: Renderer,
    pub class: Renderer,
    pub title: Renderer,
    pub alt: Renderer,
    /// Raw extra attributes.
    pub more: Renderer,
    pub caption: Renderer,
    /// Raw HTML inserted before the thumbnail.
    pub start: Renderer,
    pub thumbnail_alt: Renderer,
    pub thumbnail_title: Renderer,
    /// Raw HTML inserted after the thumbnail.
    pub end: Renderer,
}

impl Default for HtmlRenderers {
    fn default() -> Self {
        Self {
            container: Renderer::Constant("a".to_string()),
            comment: Renderer::empty(),
            class: Renderer::empty(),
            title: Renderer::empty(),
            alt: Renderer::empty(),
            more: Renderer::empty(),
            caption: Renderer::empty(),
            start: Renderer::empty(),
            thumbnail_alt: Renderer::empty(),
            thumbnail_title: Renderer::empty(),
            end: Renderer::empty(),
        }
    }
}

/// HTML output settings.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlConfig {
    pub to: String,
    /// Prefix stripped from output folders to build site-relative URLs.
    pub root: String,
    /// File name of the generated document.
    pub name: String,
    pub wrapper: Option<String>,
    /// Raw attribute string for the wrapper element.
    pub wrapper_attr: String,
    /// Include the thumbnail block (only when thumbnails are generated).
    pub thumbnail: bool,
    pub renderers: HtmlRenderers,
    /// Width of the fallback jpeg; never above the largest output width.
    pub width: u32,
}

impl HtmlConfig {
    pub fn defaults_for(output_dir: &str, thumbnails: bool, max_width: u32) -> Self {
        Self {
            to: output_dir.to_string(),
            root: String::new(),
            name: DEFAULT_HTML_NAME.to_string(),
            wrapper: None,
            wrapper_attr: String::new(),
            thumbnail: thumbnails,
            renderers: HtmlRenderers::default(),
            width: DEFAULT_FALLBACK_WIDTH.min(max_width),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        Path::new(&self.to).join(&self.name)
    }
}

// =============================================================================
// Resolution
// =============================================================================

fn invalid(key: &str, value: &Value, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn reject_unknown_keys(
    table: &toml::Table,
    allowed: &[&str],
    prefix: &str,
) -> Result<(), ConfigError> {
    match table.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(invalid(
            &format!("{prefix}{key}"),
            &table[key],
            "is not a recognised option",
        )),
        None => Ok(()),
    }
}

/// Add a trailing `/` if missing.
pub fn normalize_folder(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

/// Lower-case and dot-prefix an extension: `JPG` → `.jpg`.
pub fn normalize_extension(ext: &str) -> String {
    let lower = ext.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

/// Round to the nearest integer, keeping only values ≥ 1.
fn positive_round(n: f64) -> Option<u32> {
    let rounded = n.round();
    (rounded >= 1.0 && rounded <= u32::MAX as f64).then_some(rounded as u32)
}

fn folder_option(key: &str, value: &Value) -> Result<String, ConfigError> {
    match value.as_str() {
        Some(s) if !s.is_empty() => Ok(normalize_folder(s)),
        _ => Err(invalid(key, value, "must be a non-empty string")),
    }
}

fn bool_option(key: &str, value: &Value) -> Result<bool, ConfigError> {
    value
        .as_bool()
        .ok_or_else(|| invalid(key, value, "must be a boolean"))
}

fn non_empty_string(key: &str, value: &Value) -> Result<String, ConfigError> {
    match value.as_str() {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(invalid(key, value, "must be a non-empty string")),
    }
}

/// A string or an array of strings; non-string array items are dropped.
fn string_list(key: &str, value: &Value) -> Result<Vec<String>, ConfigError> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => {
            let strings: Vec<String> = items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            if strings.is_empty() {
                return Err(invalid(key, value, "does not contain any string"));
            }
            Ok(strings)
        }
        _ => Err(invalid(key, value, "must be a string or an array of strings")),
    }
}

fn extensions_option(key: &str, value: &Value) -> Result<Vec<String>, ConfigError> {
    let mut exts: Vec<String> = Vec::new();
    for ext in string_list(key, value)?
        .iter()
        .map(|e| normalize_extension(e))
        .filter(|e| e.len() > 1)
    {
        if !exts.contains(&ext) {
            exts.push(ext);
        }
    }
    if exts.is_empty() {
        return Err(invalid(key, value, "does not contain any extension"));
    }
    Ok(exts)
}

fn formats_option(key: &str, value: &Value) -> Result<Vec<OutputFormat>, ConfigError> {
    if let Value::String(s) = value {
        return OutputFormat::parse(s)
            .map(|f| vec![f])
            .ok_or_else(|| invalid(key, value, "is not a supported format (avif, webp, jpg)"));
    }
    let mut formats = Vec::new();
    for format in string_list(key, value)?
        .iter()
        .filter_map(|s| OutputFormat::parse(s))
    {
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    if formats.is_empty() {
        return Err(invalid(
            key,
            value,
            "does not contain any valid format (avif, webp, jpg)",
        ));
    }
    Ok(formats)
}

/// A positive number or an array of them, rounded, sorted and deduplicated.
fn positive_int_list(key: &str, value: &Value) -> Result<Vec<u32>, ConfigError> {
    let mut list: Vec<u32> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(as_number)
            .filter_map(positive_round)
            .collect(),
        other => match as_number(other) {
            Some(n) => vec![
                positive_round(n)
                    .ok_or_else(|| invalid(key, value, "must be an integer greater than 0"))?,
            ],
            None => {
                return Err(invalid(
                    key,
                    value,
                    "must be an integer or an array of integers",
                ));
            }
        },
    };
    if list.is_empty() {
        return Err(invalid(
            key,
            value,
            "does not contain any integer greater than 0",
        ));
    }
    list.sort_unstable();
    list.dedup();
    Ok(list)
}

fn positive_int(key: &str, value: &Value) -> Result<u32, ConfigError> {
    as_number(value)
        .and_then(positive_round)
        .ok_or_else(|| invalid(key, value, "must be an integer greater than 0"))
}

fn name_option(
    key: &str,
    value: &Value,
    allowed: &[crate::naming::Placeholder],
) -> Result<Template, ConfigError> {
    let source = value
        .as_str()
        .ok_or_else(|| invalid(key, value, "must be a template string"))?;
    let template =
        Template::parse(source, allowed).map_err(|e| invalid(key, value, e.to_string()))?;
    if template.sample().trim().is_empty() {
        return Err(invalid(key, value, "must produce a non-empty name"));
    }
    Ok(template)
}

fn renderer_option(key: &str, value: &Value) -> Result<Renderer, ConfigError> {
    match value.as_str() {
        Some(s) if !s.is_empty() => {
            Renderer::parse(s).map_err(|e| invalid(key, value, e.to_string()))
        }
        _ => Err(invalid(
            key,
            value,
            "must be a non-empty string or a template",
        )),
    }
}

/// Move `Jpeg` to the end of a format list, adding it if absent.
fn force_jpeg_last(formats: &mut Vec<OutputFormat>) {
    formats.retain(|f| *f != OutputFormat::Jpeg);
    formats.push(OutputFormat::Jpeg);
}

fn resolve_thumbnails(value: &Value, output_dir: &str) -> Result<ThumbnailConfig, ConfigError> {
    let mut thumbs = ThumbnailConfig::defaults_for(output_dir);
    let table = match value {
        Value::Boolean(true) => return Ok(thumbs),
        Value::Table(table) => table,
        _ => return Err(invalid("thumbnails", value, "must be a boolean or a table")),
    };
    reject_unknown_keys(table, THUMBNAIL_KEYS, "thumbnails.")?;

    if let Some(v) = table.get("to") {
        thumbs.to = folder_option("thumbnails.to", v)?;
    }
    if let Some(v) = table.get("name") {
        thumbs.name = name_option("thumbnails.name", v, THUMBNAIL_NAME_FIELDS)?;
    }
    if let Some(v) = table.get("widths") {
        thumbs.widths = positive_int_list("thumbnails.widths", v)?;
    }
    if let Some(v) = table.get("square") {
        thumbs.square = bool_option("thumbnails.square", v)?;
    }
    if let Some(v) = table.get("queries") {
        thumbs.queries = positive_int_list("thumbnails.queries", v)?;
    }
    if thumbs.queries.len() + 1 != thumbs.widths.len() {
        return Err(ConfigError::Invalid {
            key: "thumbnails.queries".to_string(),
            value: format!("{:?}", thumbs.queries),
            reason: format!(
                "must hold one value fewer than thumbnails.widths ({} widths need {} queries)",
                thumbs.widths.len(),
                thumbs.widths.len() - 1
            ),
        });
    }
    if let Some(v) = table.get("formats") {
        thumbs.formats = formats_option("thumbnails.formats", v)?;
    }
    Ok(thumbs)
}

fn resolve_html(
    value: &Value,
    output_dir: &str,
    thumbnails: bool,
    max_width: u32,
) -> Result<HtmlConfig, ConfigError> {
    let mut html = HtmlConfig::defaults_for(output_dir, thumbnails, max_width);
    let table = match value {
        Value::Boolean(true) => return Ok(html),
        Value::Table(table) => table,
        _ => return Err(invalid("html", value, "must be a boolean or a table")),
    };
    reject_unknown_keys(table, HTML_KEYS, "html.")?;

    if let Some(v) = table.get("to") {
        html.to = folder_option("html.to", v)?;
    }
    if let Some(v) = table.get("root") {
        html.root = v
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| invalid("html.root", v, "must be a string"))?;
    }
    if let Some(v) = table.get("name") {
        html.name = non_empty_string("html.name", v)?;
    }
    if let Some(v) = table.get("wrapper") {
        html.wrapper = Some(non_empty_string("html.wrapper", v)?);
    }
    if let Some(v) = table.get("wrapperAttr") {
        html.wrapper_attr = non_empty_string("html.wrapperAttr", v)?;
    }
    if let Some(v) = table.get("thumbnail") {
        html.thumbnail = bool_option("html.thumbnail", v)? && thumbnails;
    }

    let renderers = &mut html.renderers;
    let fields: [(&str, &mut Renderer); 11] = [
        ("container", &mut renderers.container),
        ("comment", &mut renderers.comment),
        ("class", &mut renderers.class),
        ("title", &mut renderers.title),
        ("alt", &mut renderers.alt),
        ("more", &mut renderers.more),
        ("caption", &mut renderers.caption),
        ("start", &mut renderers.start),
        ("thumbnailAlt", &mut renderers.thumbnail_alt),
        ("thumbnailTitle", &mut renderers.thumbnail_title),
        ("end", &mut renderers.end),
    ];
    for (key, slot) in fields {
        if let Some(v) = table.get(key) {
            *slot = renderer_option(&format!("html.{key}"), v)?;
        }
    }

    if let Some(v) = table.get("width") {
        html.width = positive_int("html.width", v)?.min(max_width);
    }
    Ok(html)
}

/// Validate a raw configuration table and build the resolved configuration.
pub fn resolve(raw: &Value) -> Result<ResolvedConfig, ConfigError> {
    let table = raw
        .as_table()
        .ok_or_else(|| invalid("configuration", raw, "must be a table"))?;
    reject_unknown_keys(table, TOP_LEVEL_KEYS, "")?;

    let mut config = ResolvedConfig::default();

    if let Some(v) = table.get("from") {
        config.from = folder_option("from", v)?;
    }
    if let Some(v) = table.get("to") {
        config.to = folder_option("to", v)?;
    }
    if let Some(v) = table.get("exts") {
        config.exts = extensions_option("exts", v)?;
    }
    if let Some(v) = table.get("formats") {
        config.formats = formats_option("formats", v)?;
    }
    if let Some(v) = table.get("widths") {
        config.widths = positive_int_list("widths", v)?;
    }
    if let Some(v) = table.get("maxHeight") {
        config.max_height = positive_int("maxHeight", v)?;
    }
    if let Some(v) = table.get("name") {
        config.name = name_option("name", v, IMAGE_NAME_FIELDS)?;
    }
    if let Some(v) = table.get("verbose") {
        config.verbose = bool_option("verbose", v)?;
    }
    if let Some(v) = table.get("force") {
        config.force = bool_option("force", v)?;
    }
    if let Some(v) = table.get("maxProcesses") {
        config.max_processes = Some(positive_int("maxProcesses", v)? as usize);
    }
    if let Some(v) = table.get("thumbnails") {
        config.thumbnails = match v {
            Value::Boolean(false) => None,
            other => Some(resolve_thumbnails(other, &config.to)?),
        };
    }
    if let Some(v) = table.get("html") {
        let max_width = config.widths.last().copied().unwrap_or(DEFAULT_FALLBACK_WIDTH);
        config.html = match v {
            Value::Boolean(false) => None,
            other => Some(resolve_html(
                other,
                &config.to,
                config.thumbnails.is_some(),
                max_width,
            )?),
        };
    }

    // The markup's non-script fallback always points at a jpeg.
    if config.html.is_some() {
        force_jpeg_last(&mut config.formats);
        if let Some(thumbs) = config.thumbnails.as_mut() {
            force_jpeg_last(&mut thumbs.formats);
        }
    }

    Ok(config)
}

// =============================================================================
// Loading and merging
// =============================================================================

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Table(mut base_table), Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a configuration file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<Value, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
    if !is_toml {
        return Err(ConfigError::Extension(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&content)?;
    Ok(Value::Table(table))
}

/// Load the optional configuration file, apply command-line overrides and
/// resolve the result.
pub fn load_config(
    path: Option<&Path>,
    overrides: Option<Value>,
) -> Result<ResolvedConfig, ConfigError> {
    let base = match path {
        Some(p) => load_raw_config(p)?,
        None => Value::Table(toml::Table::new()),
    };
    let merged = match overrides {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    resolve(&merged)
}

/// Resolve the effective worker count.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(max_processes: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    max_processes.map(|n| n.clamp(1, cores)).unwrap_or(cores)
}

/// Returns a fully-commented stock configuration with all keys and defaults.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallery Forge Configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys cause an error.

# Folder containing the images to process.
from = "img/"

# Destination folder; created if it does not exist.
to = "imgProcessed/"

# Extensions of the files to process (case-insensitive, dot optional).
exts = [".avif", ".gif", ".jpeg", ".jpg", ".png", ".webp"]

# Output formats: any of "avif", "webp", "jpg".
formats = ["avif", "webp", "jpg"]

# Output widths. Widths not smaller than the source are skipped.
widths = [400, 800, 1200, 1600, 2000, 2400, 2800, 3200]

# Widths whose proportional height reaches this value are skipped.
# An image taller than maxHeight that fits no width is scaled to this height.
maxHeight = 3200

# Output basename. Placeholders: {name} {width} {height} {title} {creator}
# {description}; the last three come from the XMP dc:title, dc:creator and
# dc:description fields.
name = "{name}_{width}_{height}"

# Report every processed and skipped file.
verbose = true

# Re-encode files that already exist in the destination folder.
force = false

# Maximum parallel image-processing workers.
# Omit to auto-detect (= number of CPU cores).
# maxProcesses = 4

# ---------------------------------------------------------------------------
# Thumbnails: `true` for the defaults below, or a [thumbnails] table.
# ---------------------------------------------------------------------------
thumbnails = false
# [thumbnails]
# to = "imgProcessed/thumbs/"
# name = "{name}_{width}"          # {name} {width} {title} {creator} {description}
# widths = [100]
#   queries: min-width breakpoints, one fewer than widths,
#   e.g. widths = [100, 200] with queries = [800]
# square = true
# formats = ["avif", "webp", "jpg"]

# ---------------------------------------------------------------------------
# HTML markup: `true` for the defaults below, or an [html] table.
# jpg is always generated (and listed last) when HTML is enabled.
# Renderer fields accept text or a template using {name} {title} {creator}
# {description}.
# ---------------------------------------------------------------------------
html = false
# [html]
# to = "imgProcessed/"
# root = ""                        # stripped from folders to build URLs
# name = "gallery.html"
# wrapper = "div"
# wrapperAttr = 'class="gallery"'
# thumbnail = true                 # only effective when thumbnails are generated
# container = "a"
# comment = "{name}"
# class = "gallery-item"
# title = "{title}"
# alt = "{description}"
# more = 'data-creator="{creator}"'
# caption = "{title}"
# start = "<span>"
# thumbnailAlt = "{title}"
# thumbnailTitle = "{title}"
# end = "</span>"
# width = 2000                     # fallback jpeg width
"##
}
