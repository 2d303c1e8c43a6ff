//! Reading raw payload bytes as 8-bit samples.

use crate::coords::round_half_up;

/// Byte width of one sample in a raster payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    One,
    Two,
}

impl SampleWidth {
    /// Grayscale rasters store one byte per sample below 256 levels, two otherwise.
    pub fn for_max_value(max_value: u32) -> Self {
        if max_value < 256 { Self::One } else { Self::Two }
    }
}

/// Reads `bytes` as unsigned samples, normalizing to 8 bits.
///
/// One-byte samples pass through unchanged. Two-byte samples are
/// little-endian; with a positive `max_value` each is scaled to
/// `round(v / max_value * 255)` and saturated at 255, otherwise the high byte
/// is kept. A trailing odd byte in two-byte mode is dropped, so the output
/// always holds `bytes.len() / 2` samples.
pub fn read_samples(bytes: &[u8], width: SampleWidth, max_value: Option<u32>) -> Vec<u8> {
    match width {
        SampleWidth::One => bytes.to_vec(),
        SampleWidth::Two => {
            let max = max_value.filter(|&m| m > 0).map(f64::from);
            bytes
                .chunks_exact(2)
                .map(|pair| {
                    let v = u16::from_le_bytes([pair[0], pair[1]]);
                    match max {
                        Some(max) => round_half_up(v as f64 / max * 255.0).min(255.0) as u8,
                        None => (v >> 8) as u8,
                    }
                })
                .collect()
        }
    }
}
