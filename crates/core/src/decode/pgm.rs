//! Binary grayscale raster (`P5`) parsing.
//!
//! The header is ASCII: the magic token, then width, height and max value,
//! separated by whitespace and `#` comments running to end of line. Exactly
//! one whitespace byte separates the max value from the binary payload.

use super::samples::{SampleWidth, read_samples};
use crate::error::{EditorError, Result};
use tracing::debug;

const MAGIC: &[u8] = b"P5";

/// Only this many leading bytes are searched for the header.
pub const HEADER_SCAN_LIMIT: usize = 100;

/// Header fields plus the offset of the first payload byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedHeader {
    pub width: u32,
    pub height: u32,
    pub max_value: u32,
    pub payload_offset: usize,
}

/// A parsed raster with samples already normalized to 8 bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayscaleRaster {
    pub width: u32,
    pub height: u32,
    pub max_value: u32,
    pub samples: Vec<u8>,
}

/// Parses the header from the leading bytes of `bytes`.
///
/// No range checks are made on the values; zero dimensions are left for
/// the pixel conversion to reject.
///
/// # Errors
///
/// Returns [`EditorError::InvalidFormat`] if the header grammar does not match.
pub fn parse_header(bytes: &[u8]) -> Result<DecodedHeader> {
    let window = &bytes[..bytes.len().min(HEADER_SCAN_LIMIT)];
    if !window.starts_with(MAGIC) {
        return Err(EditorError::format("missing P5 magic number"));
    }

    let mut pos = MAGIC.len();
    let mut fields = [0u32; 3];
    for (field, name) in fields.iter_mut().zip(["width", "height", "max value"]) {
        let after = skip_separators(window, pos)
            .ok_or_else(|| EditorError::format(format!("unterminated comment before {name}")))?;
        if after == pos {
            return Err(EditorError::format(format!("expected separator before {name}")));
        }
        let (value, end) = read_number(window, after)
            .ok_or_else(|| EditorError::format(format!("expected {name}")))?;
        *field = value;
        pos = end;
    }

    match window.get(pos) {
        Some(b) if b.is_ascii_whitespace() => {}
        _ => return Err(EditorError::format("expected separator after max value")),
    }

    let [width, height, max_value] = fields;
    Ok(DecodedHeader {
        width,
        height,
        max_value,
        payload_offset: pos + 1,
    })
}

/// Parses a whole `P5` file into 8-bit samples.
///
/// Payload bytes beyond `width * height` samples are ignored; a short
/// payload yields fewer samples.
pub fn parse_grayscale(bytes: &[u8]) -> Result<GrayscaleRaster> {
    let header = parse_header(bytes)?;
    let sample_width = SampleWidth::for_max_value(header.max_value);
    debug!(
        width = header.width,
        height = header.height,
        max_value = header.max_value,
        payload_offset = header.payload_offset,
        ?sample_width,
        "Parsed grayscale header"
    );

    let payload = bytes.get(header.payload_offset..).unwrap_or_default();
    let mut samples = read_samples(payload, sample_width, Some(header.max_value));
    samples.truncate(header.width as usize * header.height as usize);

    Ok(GrayscaleRaster {
        width: header.width,
        height: header.height,
        max_value: header.max_value,
        samples,
    })
}

/// Skips whitespace and comments; `None` if a comment hits the window end.
fn skip_separators(window: &[u8], mut pos: usize) -> Option<usize> {
    while let Some(&b) = window.get(pos) {
        if b.is_ascii_whitespace() {
            pos += 1;
        } else if b == b'#' {
            let newline = window[pos..].iter().position(|&c| c == b'\n')?;
            pos += newline + 1;
        } else {
            break;
        }
    }
    Some(pos)
}

fn read_number(window: &[u8], start: usize) -> Option<(u32, usize)> {
    let digits = window[start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    let end = start + digits;
    let text = std::str::from_utf8(&window[start..end]).ok()?;
    Some((text.parse().ok()?, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(header: &str, payload: &[u8]) -> Vec<u8> {
        let mut bytes = header.as_bytes().to_vec();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn parses_plain_header() {
        let bytes = file("P5\n3 2\n255\n", &[1, 2, 3, 4, 5, 6]);
        let header = parse_header(&bytes).unwrap();
        assert_eq!(
            header,
            DecodedHeader {
                width: 3,
                height: 2,
                max_value: 255,
                payload_offset: 11,
            }
        );
    }

    #[test]
    fn skips_comments_between_fields() {
        let bytes = file("P5\n# CREATOR: GIMP\n4 # w\n  1\n# max\n255\n", &[9, 8, 7, 6]);
        let raster = parse_grayscale(&bytes).unwrap();
        assert_eq!((raster.width, raster.height, raster.max_value), (4, 1, 255));
        assert_eq!(raster.samples, vec![9, 8, 7, 6]);
    }

    #[test]
    fn payload_may_start_with_whitespace_bytes() {
        let bytes = file("P5 2 1 255 ", &[b' ', b'\n']);
        let raster = parse_grayscale(&bytes).unwrap();
        assert_eq!(raster.samples, vec![b' ', b'\n']);
    }

    #[test]
    fn sixteen_bit_payload_is_normalized() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&1023u16.to_le_bytes());
        payload.extend_from_slice(&0u16.to_le_bytes());
        let bytes = file("P5\n2 1\n1023\n", &payload);
        let raster = parse_grayscale(&bytes).unwrap();
        assert_eq!(raster.samples, vec![255, 0]);
    }

    #[test]
    fn trailing_payload_is_ignored() {
        let bytes = file("P5\n1 1\n255\n", &[42, 43, 44]);
        assert_eq!(parse_grayscale(&bytes).unwrap().samples, vec![42]);
    }

    #[test]
    fn rejects_wrong_magic() {
        let bytes = file("P2\n1 1\n255\n", &[0]);
        assert!(matches!(parse_grayscale(&bytes), Err(EditorError::InvalidFormat(_))));
        assert!(matches!(parse_header(b"GIF89a"), Err(EditorError::InvalidFormat(_))));
    }

    #[test]
    fn rejects_incomplete_header() {
        assert!(matches!(parse_header(b"P5\n10 10\n"), Err(EditorError::InvalidFormat(_))));
        assert!(matches!(parse_header(b"P5\n10 x 255\n"), Err(EditorError::InvalidFormat(_))));
        assert!(matches!(parse_header(b"P510 10 255\n"), Err(EditorError::InvalidFormat(_))));
        assert!(matches!(parse_header(b"P5\n10 10 255"), Err(EditorError::InvalidFormat(_))));
    }

    #[test]
    fn header_must_fit_in_scan_window() {
        let comment = "#".repeat(HEADER_SCAN_LIMIT);
        let bytes = file(&format!("P5\n{comment}\n1 1\n255\n"), &[0]);
        assert!(matches!(parse_header(&bytes), Err(EditorError::InvalidFormat(_))));
    }

    #[test]
    fn zero_dimensions_pass_header_validation() {
        let header = parse_header(b"P5\n0 0\n255\n").unwrap();
        assert_eq!((header.width, header.height), (0, 0));
    }
}
