//! Shared test utilities for the gallery-forge test suite.
//!
//! Synthetic source images and XMP packets, plus a configuration builder
//! pointing at a scratch directory.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! create_test_jpeg(&tmp.path().join("img/dusk.jpg"), 800, 600);
//! let config = scratch_config(tmp.path());
//! ```

use crate::config::ResolvedConfig;
use image::{ImageEncoder, RgbImage};
use std::path::Path;

pub use tempfile::TempDir;

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
}

/// Write a small valid JPEG with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a small valid PNG with the given dimensions.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    gradient(width, height).save(path).unwrap();
}

/// Write a JPEG carrying `packet` in an XMP APP1 segment.
pub fn create_test_jpeg_with_xmp(path: &Path, width: u32, height: u32, packet: &str) {
    create_test_jpeg(path, width, height);
    let jpeg = std::fs::read(path).unwrap();

    let mut payload = b"http://ns.adobe.com/xap/1.0/\0".to_vec();
    payload.extend_from_slice(packet.as_bytes());
    let len = (payload.len() + 2) as u16;

    // SOI, then the APP1 segment, then the rest of the original file.
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    std::fs::write(path, out).unwrap();
}

/// A Lightroom-style XMP packet with the three Dublin Core fields.
pub fn xmp_packet(title: &str, creator: &str, description: &str) -> String {
    format!(
        r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
   <dc:title><rdf:Alt><rdf:li xml:lang="x-default">{title}</rdf:li></rdf:Alt></dc:title>
   <dc:creator><rdf:Seq><rdf:li>{creator}</rdf:li></rdf:Seq></dc:creator>
   <dc:description><rdf:Alt><rdf:li xml:lang="x-default">{description}</rdf:li></rdf:Alt></dc:description>
  </rdf:Description>
 </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#
    )
}

// =========================================================================
// Configuration
// =========================================================================

/// Default configuration reading from `<root>/img/` and writing to
/// `<root>/out/`, with quiet output.
pub fn scratch_config(root: &Path) -> ResolvedConfig {
    ResolvedConfig {
        from: format!("{}/img/", root.display()),
        to: format!("{}/out/", root.display()),
        verbose: false,
        ..ResolvedConfig::default()
    }
}
