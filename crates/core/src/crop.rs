//! Rotation-aware cropping.
//!
//! The displayed image is rotated at the transform level; its pixel buffer
//! never is. A selection drawn over the rotated image is therefore resolved
//! per destination pixel: each pixel's world position is rotated back by the
//! display angle and looked up in the unrotated source. Pixels that land
//! outside the source become the background color with zero alpha, so the
//! corners a rotation exposes stay see-through.

use crate::coords::{InverseRotation, WorldPoint, WorldRect, world_to_texture};
use crate::raster::{CHANNELS, RasterImage, Rgb, byte_len};
use tracing::{debug, warn};

/// Parameters of a crop against one displayed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRequest {
    /// Displayed width in world units.
    pub display_width: f64,
    /// Displayed height in world units.
    pub display_height: f64,
    /// Display rotation applied to the image, in degrees.
    pub rotation_degrees: f64,
    /// Selection in world units, origin at the image center.
    pub selection: WorldRect,
    /// RGB written (with alpha 0) where the selection leaves the image.
    pub background: Rgb,
}

impl CropRequest {
    /// A request for `image` displayed at `scale` world units per pixel.
    pub fn for_image(
        image: &RasterImage,
        scale: f64,
        rotation_degrees: f64,
        selection: WorldRect,
    ) -> Self {
        let (display_width, display_height) = image.display_size(scale);
        Self {
            display_width,
            display_height,
            rotation_degrees,
            selection,
            background: Rgb::BLACK,
        }
    }

    pub fn with_background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }
}

/// Why a crop produced no image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropRejection {
    /// The selection resolves to zero or negative pixel dimensions.
    Degenerate,
    /// The target has no source image bound.
    MissingTexture,
    /// The displayed size is not a positive finite number.
    InvalidDisplaySize,
    /// The selection covers more than [`MAX_CROP_PIXELS`] output pixels.
    TooLarge,
}

/// Upper bound on the pixel count of one crop.
pub const MAX_CROP_PIXELS: u64 = 1 << 28;

/// Crops `source`, reporting why when nothing is produced.
pub fn try_crop(
    source: Option<&RasterImage>,
    request: &CropRequest,
) -> Result<RasterImage, CropRejection> {
    let source = source.ok_or(CropRejection::MissingTexture)?;
    let (crop_width, crop_height) = crop_dimensions(&request.selection)?;
    if !(request.display_width > 0.0 && request.display_height > 0.0)
        || !request.display_width.is_finite()
        || !request.display_height.is_finite()
    {
        return Err(CropRejection::InvalidDisplaySize);
    }

    debug!(
        crop_width,
        crop_height,
        rotation = request.rotation_degrees,
        "Resampling crop"
    );

    let rotation = InverseRotation::from_degrees(request.rotation_degrees);
    let center = request.selection.center();
    let (half_w, half_h) = (crop_width as f64 / 2.0, crop_height as f64 / 2.0);
    let (src_w, src_h) = (source.width(), source.height());
    let src = source.pixels();
    let fill = [request.background.r, request.background.g, request.background.b, 0];

    let len = byte_len(crop_width, crop_height).ok_or(CropRejection::TooLarge)?;
    let mut pixels = vec![0u8; len];
    for (y, row) in pixels.chunks_exact_mut(crop_width as usize * CHANNELS).enumerate() {
        let world_y = y as f64 - half_h + center.y;
        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let world = WorldPoint::new(x as f64 - half_w + center.x, world_y);
            let local = rotation.apply(world);
            let (tex_x, tex_y) = world_to_texture(
                local.x,
                local.y,
                request.display_width,
                request.display_height,
                src_w,
                src_h,
            );

            if (0..src_w as i64).contains(&tex_x) && (0..src_h as i64).contains(&tex_y) {
                let offset = (tex_y as usize * src_w as usize + tex_x as usize) * CHANNELS;
                px.copy_from_slice(&src[offset..offset + CHANNELS]);
            } else {
                px.copy_from_slice(&fill);
            }
        }
    }

    RasterImage::new(crop_width, crop_height, pixels).map_err(|_| CropRejection::Degenerate)
}

/// Crops `source`; `None` means leave the current image as it is.
pub fn crop(source: Option<&RasterImage>, request: &CropRequest) -> Option<RasterImage> {
    match try_crop(source, request) {
        Ok(image) => Some(image),
        Err(reason) => {
            warn!(?reason, selection = ?request.selection, "Crop rejected");
            None
        }
    }
}

/// Integer output size of a selection: the floor of each span.
fn crop_dimensions(selection: &WorldRect) -> Result<(u32, u32), CropRejection> {
    let span_x = selection.max_x - selection.min_x;
    let span_y = selection.max_y - selection.min_y;
    if !(span_x.ceil() > 0.0 && span_y.ceil() > 0.0) {
        return Err(CropRejection::Degenerate);
    }

    let (width, height) = (span_x.floor(), span_y.floor());
    if width < 1.0 || height < 1.0 {
        return Err(CropRejection::Degenerate);
    }
    if width * height > MAX_CROP_PIXELS as f64 {
        return Err(CropRejection::TooLarge);
    }
    Ok((width as u32, height as u32))
}
