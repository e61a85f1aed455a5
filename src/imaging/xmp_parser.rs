//! Locates the XMP packet embedded in an image file.
//!
//! The container is detected from its magic bytes, not the file extension:
//! - JPEG: APP1 segment starting with the Adobe XMP namespace header.
//! - PNG: uncompressed `iTXt` chunk with keyword `XML:com.adobe.xmp`.
//! - WebP: RIFF `XMP ` chunk.
//! - Anything else (AVIF, GIF...): a scan for the `<x:xmpmeta>` element.
//!
//! Only the packet is extracted here; [`metadata`](crate::metadata) parses it.

use std::path::Path;

const JPEG_SOI: &[u8] = &[0xFF, 0xD8];
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const XMP_APP1_HEADER: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";
const PNG_XMP_KEYWORD: &[u8] = b"XML:com.adobe.xmp";
const XMPMETA_OPEN: &[u8] = b"<x:xmpmeta";
const XMPMETA_CLOSE: &[u8] = b"</x:xmpmeta>";

/// Read the XMP packet from a file. `Ok(None)` when the file has none.
pub fn read_xmp(path: &Path) -> std::io::Result<Option<String>> {
    let bytes = std::fs::read(path)?;
    Ok(extract_xmp(&bytes))
}

/// Extract the XMP packet from an in-memory image file.
pub fn extract_xmp(data: &[u8]) -> Option<String> {
    let packet = if data.starts_with(JPEG_SOI) {
        find_jpeg_xmp(data)
    } else if data.starts_with(PNG_SIGNATURE) {
        find_png_xmp(data)
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        find_webp_xmp(data)
    } else {
        None
    };
    packet
        .or_else(|| scan_for_xmpmeta(data))
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

// ---------------------------------------------------------------------------
// JPEG: APP1 segments
// ---------------------------------------------------------------------------

fn find_jpeg_xmp(data: &[u8]) -> Option<&[u8]> {
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let marker = data[pos + 1];
        // Fill bytes and markers without a length field
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        // Start of scan or end of image: no metadata past this point
        if marker == 0xDA || marker == 0xD9 {
            return None;
        }

        let seg_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if seg_len < 2 {
            return None;
        }
        let seg_start = pos + 4;
        let seg_end = (pos + 2 + seg_len).min(data.len());
        let segment = &data[seg_start..seg_end];

        if marker == 0xE1 && segment.starts_with(XMP_APP1_HEADER) {
            return Some(&segment[XMP_APP1_HEADER.len()..]);
        }
        pos = pos + 2 + seg_len;
    }
    None
}

// ---------------------------------------------------------------------------
// PNG: iTXt chunks
// ---------------------------------------------------------------------------

fn find_png_xmp(data: &[u8]) -> Option<&[u8]> {
    let mut pos = PNG_SIGNATURE.len();
    while pos + 8 <= data.len() {
        let len = u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
            as usize;
        let kind = &data[pos + 4..pos + 8];
        let body_start = pos + 8;
        let body_end = body_start.checked_add(len)?;
        if body_end > data.len() {
            return None;
        }
        if kind == b"IEND" {
            return None;
        }
        if kind == b"iTXt" {
            if let Some(text) = itxt_xmp_text(&data[body_start..body_end]) {
                return Some(text);
            }
        }
        // data + CRC
        pos = body_end + 4;
    }
    None
}

/// `keyword \0 compression-flag compression-method language \0 translated \0 text`
fn itxt_xmp_text(chunk: &[u8]) -> Option<&[u8]> {
    let keyword_end = chunk.iter().position(|&b| b == 0)?;
    if &chunk[..keyword_end] != PNG_XMP_KEYWORD {
        return None;
    }
    let compressed = *chunk.get(keyword_end + 1)? != 0;
    if compressed {
        tracing::debug!("compressed PNG XMP chunk is not supported");
        return None;
    }
    let rest = chunk.get(keyword_end + 3..)?;
    let language_end = rest.iter().position(|&b| b == 0)?;
    let rest = &rest[language_end + 1..];
    let translated_end = rest.iter().position(|&b| b == 0)?;
    Some(&rest[translated_end + 1..])
}

// ---------------------------------------------------------------------------
// WebP: RIFF chunks
// ---------------------------------------------------------------------------

fn find_webp_xmp(data: &[u8]) -> Option<&[u8]> {
    let mut pos = 12;
    while pos + 8 <= data.len() {
        let fourcc = &data[pos..pos + 4];
        let size = u32::from_le_bytes([data[pos + 4], data[pos + 5], data[pos + 6], data[pos + 7]])
            as usize;
        let body_start = pos + 8;
        let body_end = body_start.checked_add(size)?.min(data.len());
        if fourcc == b"XMP " {
            return Some(&data[body_start..body_end]);
        }
        // Chunks are padded to an even size
        pos = body_end + (size & 1);
    }
    None
}

// ---------------------------------------------------------------------------
// Fallback: raw scan
// ---------------------------------------------------------------------------

fn scan_for_xmpmeta(data: &[u8]) -> Option<&[u8]> {
    let start = find(data, XMPMETA_OPEN)?;
    let end = start + find(&data[start..], XMPMETA_CLOSE)? + XMPMETA_CLOSE.len();
    Some(&data[start..end])
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKET: &str = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/"><rdf:RDF/></x:xmpmeta>"#;

    fn jpeg_with_app1(payload: &[u8]) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        // An APP0 segment before the XMP one
        data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x06, b'J', b'F', b'I', b'F']);
        let len = (payload.len() + 2) as u16;
        data.extend_from_slice(&[0xFF, 0xE1]);
        data.extend_from_slice(&len.to_be_bytes());
        data.extend_from_slice(payload);
        data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02, 0xFF, 0xD9]);
        data
    }

    fn png_chunk(kind: &[u8], body: &[u8]) -> Vec<u8> {
        let mut chunk = (body.len() as u32).to_be_bytes().to_vec();
        chunk.extend_from_slice(kind);
        chunk.extend_from_slice(body);
        chunk.extend_from_slice(&[0, 0, 0, 0]);
        chunk
    }

    fn png_with_itxt(keyword: &[u8], compressed: u8, text: &str) -> Vec<u8> {
        let mut body = keyword.to_vec();
        body.extend_from_slice(&[0, compressed, 0]);
        body.extend_from_slice(b"\0\0");
        body.extend_from_slice(text.as_bytes());

        let mut data = PNG_SIGNATURE.to_vec();
        data.extend(png_chunk(b"IHDR", &[0; 13]));
        data.extend(png_chunk(b"iTXt", &body));
        data.extend(png_chunk(b"IEND", &[]));
        data
    }

    #[test]
    fn jpeg_app1_packet() {
        let mut payload = XMP_APP1_HEADER.to_vec();
        payload.extend_from_slice(PACKET.as_bytes());
        let data = jpeg_with_app1(&payload);
        assert_eq!(extract_xmp(&data).as_deref(), Some(PACKET));
    }

    #[test]
    fn jpeg_exif_app1_is_skipped() {
        let data = jpeg_with_app1(b"Exif\0\0not xmp");
        assert_eq!(extract_xmp(&data), None);
    }

    #[test]
    fn png_itxt_packet() {
        let data = png_with_itxt(PNG_XMP_KEYWORD, 0, PACKET);
        assert_eq!(extract_xmp(&data).as_deref(), Some(PACKET));
    }

    #[test]
    fn png_other_itxt_keyword_is_ignored() {
        let data = png_with_itxt(b"Comment", 0, "hello");
        assert_eq!(extract_xmp(&data), None);
    }

    #[test]
    fn webp_xmp_chunk() {
        let mut data = b"RIFF\0\0\0\0WEBP".to_vec();
        // An odd-sized chunk first, to exercise padding
        data.extend_from_slice(b"VP8X");
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&[1, 2, 3, 0]);
        data.extend_from_slice(b"XMP ");
        data.extend_from_slice(&(PACKET.len() as u32).to_le_bytes());
        data.extend_from_slice(PACKET.as_bytes());
        assert_eq!(extract_xmp(&data).as_deref(), Some(PACKET));
    }

    #[test]
    fn unknown_container_falls_back_to_scan() {
        let mut data = b"\0\0\0\x1cftypavif garbage ".to_vec();
        data.extend_from_slice(PACKET.as_bytes());
        data.extend_from_slice(b" trailing bytes");
        assert_eq!(extract_xmp(&data).as_deref(), Some(PACKET));
    }

    #[test]
    fn no_packet_is_none() {
        assert_eq!(extract_xmp(b"GIF89a....."), None);
        assert_eq!(extract_xmp(&[]), None);
    }

    #[test]
    fn truncated_jpeg_does_not_panic() {
        assert_eq!(extract_xmp(&[0xFF, 0xD8, 0xFF, 0xE1, 0x40]), None);
    }

    #[test]
    fn read_xmp_nonexistent_file_is_io_error() {
        assert!(read_xmp(Path::new("/nonexistent/image.jpg")).is_err());
    }
}
