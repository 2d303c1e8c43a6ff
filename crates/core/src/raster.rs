//! The RGBA raster threaded through the whole pipeline.
//!
//! A [`RasterImage`] is created once per load or crop and never mutated
//! afterwards; a crop produces a fresh image.

use crate::error::{EditorError, Result};
use image::{RgbaImage, imageops};

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// An opaque RGB color, used as the crop background fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `r,g,b`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            if hex.len() != 6 {
                return None;
            }
            let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            return Some(Self::new(channel(0)?, channel(2)?, channel(4)?));
        }

        let mut parts = text.split(',').map(|p| p.trim().parse::<u8>());
        let color = Self::new(
            parts.next()?.ok()?,
            parts.next()?.ok()?,
            parts.next()?.ok()?,
        );
        if parts.next().is_some() {
            return None;
        }
        Some(color)
    }
}

/// Row-major RGBA8 image stored bottom row first: row 0 is the lower edge
/// of the map as displayed.
///
/// `pixels.len() == width * height * 4` holds for every value of this type;
/// the only way to build one is through [`RasterImage::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wraps an RGBA buffer, checking it against the dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidDimensions`] if either dimension is zero
    /// or the buffer length is not `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || byte_len(width, height) != Some(pixels.len()) {
            return Err(EditorError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Returns the RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let px = &self.pixels[offset..offset + CHANNELS];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Size of the image in world units when displayed with a uniform scale.
    pub fn display_size(&self, scale: f64) -> (f64, f64) {
        (self.width as f64 * scale, self.height as f64 * scale)
    }

    /// Takes ownership of an [`image::RgbaImage`]'s buffer, reordering its
    /// top-down rows to bottom row first.
    pub fn from_rgba_image(mut image: RgbaImage) -> Result<Self> {
        imageops::flip_vertical_in_place(&mut image);
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }
}

/// Buffer length for `width` x `height` pixels, `None` if it overflows.
pub(crate) fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(CHANNELS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        let err = RasterImage::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            EditorError::InvalidDimensions {
                width: 2,
                height: 2
            }
        ));
        assert!(RasterImage::new(0, 3, Vec::new()).is_err());
    }

    #[test]
    fn pixel_lookup_is_row_major() {
        let pixels: Vec<u8> = (0..16).collect();
        let image = RasterImage::new(2, 2, pixels).unwrap();
        assert_eq!(image.pixel(1, 0), Some([4, 5, 6, 7]));
        assert_eq!(image.pixel(0, 1), Some([8, 9, 10, 11]));
        assert_eq!(image.pixel(2, 0), None);
    }

    #[test]
    fn image_crate_buffers_are_stored_bottom_up() {
        let rgba = RgbaImage::from_raw(1, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let image = RasterImage::from_rgba_image(rgba).unwrap();
        assert_eq!(image.pixel(0, 0), Some([5, 6, 7, 8]));
        assert_eq!(image.pixel(0, 1), Some([1, 2, 3, 4]));
    }

    #[test]
    fn oversized_dimensions_do_not_overflow() {
        assert_eq!(byte_len(3, 2), Some(24));
        assert_eq!(byte_len(u32::MAX, u32::MAX), None);
        assert!(RasterImage::new(u32::MAX, u32::MAX, Vec::new()).is_err());
    }

    #[test]
    fn parses_background_colors() {
        assert_eq!(Rgb::parse("#ff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::parse(" 12, 34 ,56 "), Some(Rgb::new(12, 34, 56)));
        assert_eq!(Rgb::parse("1,2"), None);
        assert_eq!(Rgb::parse("1,2,3,4"), None);
        assert_eq!(Rgb::parse("#fff"), None);
        assert_eq!(Rgb::parse("300,0,0"), None);
    }
}
