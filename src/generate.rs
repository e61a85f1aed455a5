//! Gallery markup generation.
//!
//! Stage 3 of the pipeline. Runs once every image has been rendered and
//! turns the [`RecordSet`] into one HTML fragment, written to
//! `<html.to>/<html.name>` in a single write.
//!
//! ## Markup
//!
//! One container per image, in name order:
//!
//! ```text
//! <!-- comment -->
//! <a class="..."
//!     href="imgProcessed/dusk_2000_1500.jpg"
//!     data-width="2000"
//!     data-height="1500"
//!     data-caption="..."
//!     >
//!     <script type="text/content">
//!         <source type="image/avif" srcset="imgProcessed/dusk_400_300.avif" media="(max-width: 400px), (max-height: 300px)">
//!         ...
//!     </script>
//!     <picture>
//!         <source type="image/avif" srcset="imgProcessed/thumbs/dusk_100.avif">
//!         <img src="imgProcessed/thumbs/dusk_100.jpg" alt="...">
//!     </picture>
//! </a>
//! ```
//!
//! - The `href` (or `data-href` when the container is not an `a`) points at
//!   the fallback jpeg: the widest one not above `html.width`, or the
//!   narrowest when all are wider.
//! - The `<script type="text/content">` list holds every other rendered
//!   variant. Every width but the last is matched by a `max-width`/`max-height`
//!   query, the last by `min-width`/`min-height` just above its predecessor.
//! - The thumbnail `<picture>` switches width on the configured `queries`.
//!
//! Renderer values are attribute-escaped; `more`, `start`, `end` and
//! `wrapperAttr` are inserted as raw HTML.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for the `<source>` and `<img>`
//! elements. The container tag is configurable, so its opening tag is
//! assembled by hand with maud's escaping.

use crate::config::{HtmlConfig, ResolvedConfig, ThumbnailConfig};
use crate::naming::NameContext;
use crate::types::{ImageRecord, OutputFormat, RecordSet};
use maud::{Markup, html};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The assembled document, before it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    pub markup: String,
    /// Images with a container in the markup.
    pub included: Vec<String>,
    /// Images left out because no jpeg variant was rendered.
    pub skipped: Vec<String>,
}

/// What was written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryOutput {
    pub path: PathBuf,
    pub images: usize,
    pub skipped: Vec<String>,
}

/// Strip the site root from an output folder to get its URL prefix.
pub fn url_prefix<'a>(dir: &'a str, root: &str) -> &'a str {
    dir.strip_prefix(root).unwrap_or(dir)
}

/// Attribute-escape `value`.
fn escape(value: &str) -> String {
    html! { (value) }.into_string()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Fallback width: the widest jpeg not above `limit`, else the narrowest jpeg.
pub fn fallback_width(record: &ImageRecord, limit: u32) -> Option<u32> {
    let jpegs = record
        .sizes
        .keys()
        .copied()
        .filter(|&w| record.has_variant(w, OutputFormat::Jpeg));
    let narrowest = jpegs.clone().next();
    jpegs.filter(|&w| w <= limit).next_back().or(narrowest)
}

/// Media query for the `index`-th of the image's planned sizes.
fn source_media(sizes: &[(u32, u32)], index: usize) -> Option<String> {
    if sizes.len() < 2 {
        return None;
    }
    let (w, h) = sizes[index];
    if index == sizes.len() - 1 {
        let (pw, ph) = sizes[index - 1];
        Some(format!(
            "(min-width: {}px) and (min-height: {}px)",
            pw + 1,
            ph + 1
        ))
    } else {
        Some(format!("(max-width: {w}px), (max-height: {h}px)"))
    }
}

fn source(format: OutputFormat, srcset: &str, media: Option<String>) -> Markup {
    html! {
        source type=(format.mime_type()) srcset=(srcset) media=[media];
    }
}

fn thumbnail_img(src: &str, alt: Option<String>, title: Option<String>) -> Markup {
    html! {
        img src=(src) alt=[alt] title=[title];
    }
}

/// Line-oriented document builder, indenting with tabs.
struct Document {
    out: String,
    base: usize,
}

impl Document {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..self.base + depth {
            self.out.push('\t');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}

fn render_thumbnail(
    doc: &mut Document,
    thumbs: &ThumbnailConfig,
    html: &HtmlConfig,
    prefix: &str,
    ctx: &NameContext<'_>,
) {
    let renderers = &html.renderers;
    let alt = non_empty(renderers.thumbnail_alt.render(ctx.name, ctx.descriptors));
    let title = non_empty(renderers.thumbnail_title.render(ctx.name, ctx.descriptors));
    let Some(&first) = thumbs.widths.first() else {
        return;
    };
    let fallback = format!(
        "{prefix}{}.jpg",
        thumbs.name.render_file_name(&ctx.sized(first, 0))
    );

    if thumbs.formats.len() == 1 && thumbs.widths.len() == 1 {
        doc.line(1, &thumbnail_img(&fallback, alt, title).into_string());
        return;
    }

    doc.line(1, "<picture>");
    for &format in &thumbs.formats {
        for (i, &width) in thumbs.widths.iter().enumerate() {
            let srcset = format!(
                "{prefix}{}.{}",
                thumbs.name.render_file_name(&ctx.sized(width, 0)),
                format.extension()
            );
            let media = i
                .checked_sub(1)
                .and_then(|q| thumbs.queries.get(q))
                .map(|q| format!("(min-width: {q}px)"));
            doc.line(2, &source(format, &srcset, media).into_string());
        }
    }
    doc.line(2, &thumbnail_img(&fallback, alt, title).into_string());
    doc.line(1, "</picture>");
}

fn render_image(
    doc: &mut Document,
    config: &ResolvedConfig,
    html: &HtmlConfig,
    name: &str,
    record: &ImageRecord,
    fallback: u32,
) {
    let d = &record.descriptors;
    let renderers = &html.renderers;
    let ctx = NameContext::new(name, d);
    let prefix = url_prefix(&config.to, &html.root);
    let sizes: Vec<(u32, u32)> = record.sizes.iter().map(|(&w, &h)| (w, h)).collect();
    let basename = |w: u32, h: u32| config.name.render_file_name(&ctx.sized(w, h));

    let comment = renderers.comment.render(name, d);
    if !comment.is_empty() {
        doc.line(0, &format!("<!-- {comment} -->"));
    }

    let container = renderers.container.render(name, d);
    let class = renderers.class.render(name, d);
    if class.is_empty() {
        doc.line(0, &format!("<{container}"));
    } else {
        doc.line(0, &format!("<{container} class=\"{}\"", escape(&class)));
    }
    let fallback_height = record.sizes.get(&fallback).copied().unwrap_or_default();
    let href = if container == "a" { "href" } else { "data-href" };
    doc.line(
        1,
        &format!(
            "{href}=\"{}{}.jpg\"",
            escape(prefix),
            escape(&basename(fallback, fallback_height))
        ),
    );
    doc.line(1, &format!("data-width=\"{fallback}\""));
    doc.line(1, &format!("data-height=\"{fallback_height}\""));
    for (attr, renderer) in [
        ("data-caption", &renderers.caption),
        ("data-title", &renderers.title),
        ("data-alt", &renderers.alt),
    ] {
        let value = renderer.render(name, d);
        if !value.is_empty() {
            doc.line(1, &format!("{attr}=\"{}\"", escape(&value)));
        }
    }
    let more = renderers.more.render(name, d);
    if !more.is_empty() {
        doc.line(1, &more);
    }
    doc.line(1, ">");

    let mut sources = Vec::new();
    for &format in &config.formats {
        for (i, &(w, h)) in sizes.iter().enumerate() {
            if !record.has_variant(w, format) {
                continue;
            }
            let srcset = format!("{prefix}{}.{}", basename(w, h), format.extension());
            sources.push(source(format, &srcset, source_media(&sizes, i)));
        }
    }
    if sources.len() > 1 {
        doc.line(1, "<script type=\"text/content\">");
        for s in sources {
            doc.line(2, &s.into_string());
        }
        doc.line(1, "</script>");
    }

    let start = renderers.start.render(name, d);
    if !start.is_empty() {
        doc.line(1, &start);
    }
    if let (true, Some(thumbs)) = (html.thumbnail, &config.thumbnails) {
        let thumb_prefix = url_prefix(&thumbs.to, &html.root);
        render_thumbnail(doc, thumbs, html, thumb_prefix, &ctx);
    }
    let end = renderers.end.render(name, d);
    if !end.is_empty() {
        doc.line(1, &end);
    }
    doc.line(0, &format!("</{container}>"));
}

/// Assemble the gallery markup for every record, in name order.
pub fn render_gallery(config: &ResolvedConfig, html: &HtmlConfig, records: &RecordSet) -> Gallery {
    let mut doc = Document {
        out: String::new(),
        base: 0,
    };
    if let Some(wrapper) = &html.wrapper {
        if html.wrapper_attr.is_empty() {
            doc.line(0, &format!("<{wrapper}>"));
        } else {
            doc.line(0, &format!("<{wrapper} {}>", html.wrapper_attr));
        }
        doc.base = 1;
    }

    let mut included = Vec::new();
    let mut skipped = Vec::new();
    for (name, record) in records {
        match fallback_width(record, html.width) {
            Some(fallback) => {
                render_image(&mut doc, config, html, name, record, fallback);
                included.push(name.clone());
            }
            None => {
                tracing::warn!(image = %name, "no jpeg variant, left out of gallery");
                skipped.push(name.clone());
            }
        }
    }

    if let Some(wrapper) = &html.wrapper {
        doc.base = 0;
        doc.line(0, &format!("</{wrapper}>"));
    }
    Gallery {
        markup: doc.out,
        included,
        skipped,
    }
}

/// Render the gallery and write it in one call.
pub fn write_gallery(
    config: &ResolvedConfig,
    html: &HtmlConfig,
    records: &RecordSet,
) -> Result<GalleryOutput, GenerateError> {
    let gallery = render_gallery(config, html, records);
    let path = html.output_path();
    fs::write(&path, &gallery.markup)?;
    tracing::debug!(path = %path.display(), images = gallery.included.len(), "gallery written");
    Ok(GalleryOutput {
        path,
        images: gallery.included.len(),
        skipped: gallery.skipped,
    })
}
