//! Descriptive metadata from embedded XMP.
//!
//! Three Dublin Core fields feed output names and the gallery markup:
//!
//! - **title**: `dc:title`, the "Title" field in Lightroom and most DAM tools
//! - **creator**: `dc:creator`, the author or photographer
//! - **description**: `dc:description`, the "Caption" field in Lightroom
//!
//! The XMP packet is located by [`imaging::xmp_parser`](crate::imaging) and
//! parsed here with `roxmltree`. Each field is then looked up independently:
//!
//! ## Lookup rules
//!
//! - The tree is walked in document order; the **first** element or attribute
//!   with the field's name and a non-empty value wins. Later duplicates at
//!   any depth are ignored.
//! - Both forms XMP writers use are recognised: the element form
//!   (`<dc:title>...</dc:title>`) and the attribute shorthand on
//!   `rdf:Description` (`dc:title="..."`).
//! - Language alternatives (`rdf:Alt`) yield the `x-default` entry, or the
//!   first entry when none is marked default.
//! - Ordered and unordered lists (`rdf:Seq`, `rdf:Bag`) are joined with `", "`,
//!   so several creators become `"A. Martin, B. Chen"`.
//! - Names are matched by namespace URI, so a packet binding Dublin Core to
//!   a prefix other than `dc` still resolves.
//!
//! A missing field is the empty string. A packet that is not well-formed
//! XML is an error; the caller logs it and uses empty fields.

use crate::types::Descriptors;
use roxmltree::{Document, Node, ParsingOptions};
use thiserror::Error;

const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("malformed XMP packet: {0}")]
    Parse(#[from] roxmltree::Error),
}

/// Concatenated text below `node`, CDATA included.
fn text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Value of a property element, flattening RDF containers.
fn property_value(element: Node) -> String {
    for container in element.children().filter(|n| n.is_element()) {
        let items: Vec<Node> = container
            .children()
            .filter(|n| n.has_tag_name((RDF_NS, "li")))
            .collect();
        if container.has_tag_name((RDF_NS, "Alt")) {
            let chosen = items
                .iter()
                .find(|li| li.attribute((XML_NS, "lang")) == Some("x-default"))
                .or_else(|| items.first());
            return chosen
                .map(|li| text(*li).trim().to_string())
                .unwrap_or_default();
        }
        if container.has_tag_name((RDF_NS, "Seq")) || container.has_tag_name((RDF_NS, "Bag")) {
            return items
                .iter()
                .map(|li| text(*li).trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
        }
    }
    text(element).trim().to_string()
}

/// First non-empty value for the Dublin Core property `name` in document
/// order. On each element the element form is checked before the attribute
/// shorthand.
fn find_field(doc: &Document, name: &str) -> Option<String> {
    doc.descendants().filter(|n| n.is_element()).find_map(|node| {
        if node.has_tag_name((DC_NS, name)) {
            let value = property_value(node);
            if !value.is_empty() {
                return Some(value);
            }
        }
        node.attribute((DC_NS, name))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// Parse an XMP packet and read the three descriptive fields.
pub fn parse_descriptors(packet: &str) -> Result<Descriptors, XmlError> {
    // JPEG writers pad the packet with NULs up to the segment size
    let packet = packet.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(packet, options)?;
    let field = |name: &str| find_field(&doc, name).unwrap_or_default();
    Ok(Descriptors {
        title: field("title"),
        creator: field("creator"),
        description: field("description"),
    })
}

/// Descriptors for an optional packet; empty fields when absent or
/// unreadable.
pub fn extract_descriptors(packet: Option<&str>) -> Descriptors {
    match packet.map(parse_descriptors) {
        Some(Ok(descriptors)) => descriptors,
        Some(Err(e)) => {
            tracing::warn!("ignoring {e}");
            Descriptors::default()
        }
        None => Descriptors::default(),
    }
}
