//! Sample grid to RGBA conversion.
//!
//! Each source kind has its own color and alpha rule. Output rasters store
//! their bottom row first. Grayscale rasters arrive top row first and are
//! flipped; grid sources already start at the bottom and keep their order.

use crate::coords::round_half_up;
use crate::error::{EditorError, Result};
use crate::raster::{CHANNELS, RasterImage, byte_len};

/// How raw samples map to color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSource {
    /// 8-bit gray, already normalized from `max_value` upstream.
    Grayscale { max_value: u32 },
    /// Occupancy probabilities: -1 unknown, 0 free, 100 occupied.
    OccupancyGrid,
    /// Live costmap cost values.
    LiveCostmap,
}

/// A flat, row-major grid of samples.
#[derive(Debug, Clone, Copy)]
pub enum SampleGrid<'a> {
    Gray(&'a [u8]),
    Signed(&'a [i8]),
}

impl SampleGrid<'_> {
    fn len(&self) -> usize {
        match self {
            SampleGrid::Gray(samples) => samples.len(),
            SampleGrid::Signed(samples) => samples.len(),
        }
    }
}

/// Gray level drawn for unknown occupancy cells.
pub const UNKNOWN_GRAY: u8 = 235;

/// Converts a sample grid into an RGBA raster.
///
/// Grayscale rules take unsigned samples and grid rules signed ones; a
/// mismatched pairing reinterprets the bytes.
///
/// # Errors
///
/// Returns [`EditorError::InvalidDimensions`] for a zero dimension and
/// [`EditorError::SampleCount`] if the grid holds fewer than
/// `width * height` samples.
pub fn convert(
    grid: SampleGrid<'_>,
    width: u32,
    height: u32,
    source: SampleSource,
) -> Result<RasterImage> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .filter(|&count| count > 0 && byte_len(width, height).is_some())
        .ok_or(EditorError::InvalidDimensions { width, height })?;
    if grid.len() < expected {
        return Err(EditorError::SampleCount {
            expected,
            actual: grid.len(),
        });
    }

    let pixels = match (source, grid) {
        (SampleSource::Grayscale { .. }, SampleGrid::Gray(samples)) => {
            grayscale_to_rgba(samples, width, height)
        }
        (SampleSource::Grayscale { .. }, SampleGrid::Signed(samples)) => {
            let gray: Vec<u8> = samples[..expected].iter().map(|&v| v as u8).collect();
            grayscale_to_rgba(&gray, width, height)
        }
        (SampleSource::OccupancyGrid, grid) => map_signed(grid, expected, occupancy_rgba),
        (SampleSource::LiveCostmap, grid) => map_signed(grid, expected, costmap_rgba),
    };
    RasterImage::new(width, height, pixels)
}

/// Destination row `y` takes source row `height - 1 - y`.
fn grayscale_to_rgba(samples: &[u8], width: u32, height: u32) -> Vec<u8> {
    let (width, height) = (width as usize, height as usize);
    let mut pixels = vec![0u8; width * height * CHANNELS];
    for (y, row) in pixels.chunks_exact_mut(width * CHANNELS).enumerate() {
        let src_row = &samples[(height - 1 - y) * width..][..width];
        for (px, &gray) in row.chunks_exact_mut(CHANNELS).zip(src_row) {
            px.copy_from_slice(&[gray, gray, gray, 255]);
        }
    }
    pixels
}

fn map_signed(grid: SampleGrid<'_>, count: usize, rule: fn(i8) -> [u8; 4]) -> Vec<u8> {
    match grid {
        SampleGrid::Signed(samples) => samples[..count].iter().flat_map(|&v| rule(v)).collect(),
        SampleGrid::Gray(samples) => samples[..count]
            .iter()
            .flat_map(|&v| rule(v as i8))
            .collect(),
    }
}

/// Occupancy value to opaque gray.
pub fn occupancy_rgba(value: i8) -> [u8; 4] {
    let gray = match value {
        -1 => UNKNOWN_GRAY,
        0 => 255,
        100 => 0,
        v => (255.0 - round_half_up(v as f64 * 255.0 / 100.0)).clamp(0.0, 255.0) as u8,
    };
    [gray, gray, gray, 255]
}

/// Costmap value to the costmap palette. Gradient channels truncate.
pub fn costmap_rgba(value: i8) -> [u8; 4] {
    match value {
        0 => [0, 0, 0, 0],
        1..=98 => {
            let v = value as u32;
            [(255 * v / 100) as u8, 0, ((25500 - 255 * v) / 100) as u8, 255]
        }
        99 => [0, 255, 255, 255],
        100 => [255, 0, 255, 255],
        v if v < 0 => [112, 137, 134, 15],
        _ => [0, 0, 0, 255],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grays(image: &RasterImage) -> Vec<u8> {
        image.pixels().chunks_exact(4).map(|px| px[0]).collect()
    }

    #[test]
    fn grayscale_rows_are_inverted() {
        let samples = [10, 20, 30, 40];
        let image = convert(
            SampleGrid::Gray(&samples),
            2,
            2,
            SampleSource::Grayscale { max_value: 255 },
        )
        .unwrap();
        assert_eq!(
            image.pixels(),
            &[
                30, 30, 30, 255, 40, 40, 40, 255, //
                10, 10, 10, 255, 20, 20, 20, 255,
            ]
        );
    }

    #[test]
    fn occupancy_boundary_values() {
        let samples = [-1i8, 0, 50, 100];
        let image =
            convert(SampleGrid::Signed(&samples), 4, 1, SampleSource::OccupancyGrid).unwrap();
        assert_eq!(grays(&image), vec![235, 255, 127, 0]);
        assert!(image.pixels().chunks_exact(4).all(|px| px[3] == 255));
        assert!(image.pixels().chunks_exact(4).all(|px| px[0] == px[1] && px[1] == px[2]));
    }

    #[test]
    fn occupancy_keeps_row_order() {
        let samples = [0i8, 100];
        let image =
            convert(SampleGrid::Signed(&samples), 1, 2, SampleSource::OccupancyGrid).unwrap();
        assert_eq!(grays(&image), vec![255, 0]);
    }

    #[test]
    fn occupancy_interpolates_and_clamps() {
        assert_eq!(occupancy_rgba(1)[0], 252); // 255 - round(2.55)
        assert_eq!(occupancy_rgba(99)[0], 3); // 255 - round(252.45)
        assert_eq!(occupancy_rgba(127)[0], 0);
        assert_eq!(occupancy_rgba(-50)[0], 255);
    }

    #[test]
    fn costmap_palette() {
        assert_eq!(costmap_rgba(0), [0, 0, 0, 0]);
        assert_eq!(costmap_rgba(50), [127, 0, 127, 255]);
        assert_eq!(costmap_rgba(98), [249, 0, 5, 255]);
        assert_eq!(costmap_rgba(99), [0, 255, 255, 255]);
        assert_eq!(costmap_rgba(100), [255, 0, 255, 255]);
        assert_eq!(costmap_rgba(-1), [112, 137, 134, 15]);
        assert_eq!(costmap_rgba(-128), [112, 137, 134, 15]);
        assert_eq!(costmap_rgba(120), [0, 0, 0, 255]);
    }

    #[test]
    fn output_length_matches_dimensions() {
        let samples = vec![7u8; 12];
        let image = convert(
            SampleGrid::Gray(&samples),
            4,
            3,
            SampleSource::Grayscale { max_value: 255 },
        )
        .unwrap();
        assert_eq!(image.pixels().len(), 4 * 3 * 4);
    }

    #[test]
    fn short_grid_is_rejected() {
        let samples = [0i8; 3];
        let err =
            convert(SampleGrid::Signed(&samples), 2, 2, SampleSource::LiveCostmap).unwrap_err();
        assert!(matches!(err, EditorError::SampleCount { expected: 4, actual: 3 }));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let err = convert(SampleGrid::Gray(&[]), 0, 5, SampleSource::OccupancyGrid).unwrap_err();
        assert!(matches!(err, EditorError::InvalidDimensions { width: 0, height: 5 }));
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        let err = convert(
            SampleGrid::Signed(&[0]),
            u32::MAX,
            u32::MAX,
            SampleSource::OccupancyGrid,
        )
        .unwrap_err();
        assert!(matches!(err, EditorError::InvalidDimensions { .. }));
    }
}
