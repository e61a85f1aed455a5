//! Placeholder templates for output names and HTML renderer fields.
//!
//! Every option that "derives a string from an image" is a template with
//! `{placeholder}` fields:
//!
//! ```text
//! name               "{name}_{width}_{height}"   →  sunset_800_533
//! thumbnails.name    "{name}_{width}"            →  sunset_100
//! html.caption       "{title}, by {creator}"     →  Dusk, by A. Martin
//! ```
//!
//! Each option allows a different placeholder set (thumbnail names have no
//! height, renderer fields have neither width nor height). Using a
//! placeholder outside that set is a parse error, so bad templates are
//! rejected while the configuration is resolved rather than halfway through a
//! run. `{{` and `}}` produce literal braces.

use crate::types::Descriptors;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unclosed `{{` at byte {0}")]
    Unclosed(usize),
    #[error("unmatched `}}` at byte {0}")]
    Unmatched(usize),
    #[error("unknown placeholder `{{{0}}}`")]
    Unknown(String),
    #[error("placeholder `{{{0}}}` is not available for this option")]
    NotAllowed(String),
}

/// A field that can be substituted into a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Name,
    Width,
    Height,
    Title,
    Creator,
    Description,
}

impl Placeholder {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "name" => Some(Self::Name),
            "width" => Some(Self::Width),
            "height" => Some(Self::Height),
            "title" => Some(Self::Title),
            "creator" => Some(Self::Creator),
            "description" => Some(Self::Description),
            _ => None,
        }
    }
}

/// Placeholders available to the main `name` option.
pub const IMAGE_NAME_FIELDS: &[Placeholder] = &[
    Placeholder::Name,
    Placeholder::Width,
    Placeholder::Height,
    Placeholder::Title,
    Placeholder::Creator,
    Placeholder::Description,
];

/// Placeholders available to `thumbnails.name`.
pub const THUMBNAIL_NAME_FIELDS: &[Placeholder] = &[
    Placeholder::Name,
    Placeholder::Width,
    Placeholder::Title,
    Placeholder::Creator,
    Placeholder::Description,
];

/// Placeholders available to HTML renderer fields.
pub const RENDERER_FIELDS: &[Placeholder] = &[
    Placeholder::Name,
    Placeholder::Title,
    Placeholder::Creator,
    Placeholder::Description,
];

/// Values substituted into a template for one image.
#[derive(Debug, Clone, Copy)]
pub struct NameContext<'a> {
    /// Source file stem.
    pub name: &'a str,
    pub width: u32,
    pub height: u32,
    pub descriptors: &'a Descriptors,
}

impl<'a> NameContext<'a> {
    pub fn new(name: &'a str, descriptors: &'a Descriptors) -> Self {
        Self {
            name,
            width: 0,
            height: 0,
            descriptors,
        }
    }

    pub fn sized(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

/// A parsed placeholder template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source`, allowing only the placeholders in `allowed`.
    pub fn parse(source: &str, allowed: &[Placeholder]) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, ch)) => key.push(ch),
                            None => return Err(TemplateError::Unclosed(pos)),
                        }
                    }
                    let key = key.trim();
                    let field =
                        Placeholder::parse(key).ok_or_else(|| TemplateError::Unknown(key.into()))?;
                    if !allowed.contains(&field) {
                        return Err(TemplateError::NotAllowed(key.into()));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => return Err(TemplateError::Unmatched(pos)),
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// True when the template has no placeholders.
    pub fn is_constant(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn render(&self, ctx: &NameContext<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(Placeholder::Name) => out.push_str(ctx.name),
                Segment::Field(Placeholder::Width) => out.push_str(&ctx.width.to_string()),
                Segment::Field(Placeholder::Height) => out.push_str(&ctx.height.to_string()),
                Segment::Field(Placeholder::Title) => out.push_str(&ctx.descriptors.title),
                Segment::Field(Placeholder::Creator) => out.push_str(&ctx.descriptors.creator),
                Segment::Field(Placeholder::Description) => {
                    out.push_str(&ctx.descriptors.description)
                }
            }
        }
        out
    }

    /// Render an output file stem. Descriptor values come from untrusted
    /// XMP, so path separators and `..` in them become `_` and the stem
    /// stays inside the output folder.
    pub fn render_file_name(&self, ctx: &NameContext<'_>) -> String {
        let descriptors = Descriptors {
            title: file_name_safe(&ctx.descriptors.title),
            creator: file_name_safe(&ctx.descriptors.creator),
            description: file_name_safe(&ctx.descriptors.description),
        };
        self.render(&NameContext {
            descriptors: &descriptors,
            ..*ctx
        })
    }

    /// Render with stand-in arguments (`a`, 1, 1, `t`, `c`, `d`).
    ///
    /// Used while resolving the configuration to check that a template
    /// produces something usable before any image is touched.
    pub fn sample(&self) -> String {
        let descriptors = Descriptors {
            title: "t".into(),
            creator: "c".into(),
            description: "d".into(),
        };
        self.render(&NameContext::new("a", &descriptors).sized(1, 1))
    }
}

fn file_name_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .replace("..", "_")
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// An HTML field that is either fixed text or derived from image metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renderer {
    Constant(String),
    Derived(Template),
}

impl Renderer {
    pub fn empty() -> Self {
        Self::Constant(String::new())
    }

    /// Parse a renderer field; text without placeholders becomes a constant.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let template = Template::parse(source, RENDERER_FIELDS)?;
        if template.is_constant() {
            Ok(Self::Constant(template.sample()))
        } else {
            Ok(Self::Derived(template))
        }
    }

    pub fn render(&self, name: &str, descriptors: &Descriptors) -> String {
        match self {
            Self::Constant(text) => text.clone(),
            Self::Derived(template) => template.render(&NameContext::new(name, descriptors)),
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::empty()
    }
}
