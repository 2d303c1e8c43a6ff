//! Decoding map sources into RGBA rasters.
//!
//! - [`samples`]: raw bytes to 8-bit samples
//! - [`pgm`]: binary grayscale raster header and payload
//! - [`convert`]: sample grids to RGBA with per-source color rules
//!
//! [`DecodeRequest`] is the message handed to the decode worker; it is a
//! closed set of source kinds, each carrying its own payload, and
//! [`decode_request`] is the single dispatch point over it.

pub mod convert;
pub mod pgm;
pub mod samples;

pub use convert::{SampleGrid, SampleSource, convert};
pub use pgm::{DecodedHeader, GrayscaleRaster, parse_grayscale, parse_header};
pub use samples::{SampleWidth, read_samples};

use crate::error::{EditorError, Result};
use crate::raster::RasterImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Grid dimensions as carried by occupancy-grid messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridInfo {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// A pre-parsed occupancy grid: `info` plus signed row-major samples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPayload {
    #[serde(default)]
    pub info: Option<GridInfo>,
    #[serde(default)]
    pub data: Vec<i8>,
}

impl GridPayload {
    pub fn new(width: u32, height: u32, data: Vec<i8>) -> Self {
        Self {
            info: Some(GridInfo {
                width: Some(width),
                height: Some(height),
            }),
            data,
        }
    }

    /// Returns `(width, height)`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::MissingInfo`] if either value is absent.
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        let info = self
            .info
            .ok_or_else(|| EditorError::missing_info("grid has no info block"))?;
        let width = info
            .width
            .ok_or_else(|| EditorError::missing_info("grid info has no width"))?;
        let height = info
            .height
            .ok_or_else(|| EditorError::missing_info("grid info has no height"))?;
        Ok((width, height))
    }
}

/// A decode job, tagged by source kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sourceType", content = "mapData", rename_all = "camelCase")]
pub enum DecodeRequest {
    /// Full bytes of a `P5` grayscale raster.
    PgmFile { bytes: Vec<u8> },
    /// Occupancy grid with -1/0..100 probabilities.
    RosMap(GridPayload),
    /// Live costmap values.
    LiveCostmap(GridPayload),
    /// A PNG or JPEG map image.
    EncodedImage { bytes: Vec<u8> },
}

impl DecodeRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeRequest::PgmFile { .. } => "pgmFile",
            DecodeRequest::RosMap(_) => "rosMap",
            DecodeRequest::LiveCostmap(_) => "liveCostmap",
            DecodeRequest::EncodedImage { .. } => "encodedImage",
        }
    }
}

/// A decoded RGBA buffer as returned by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeResponse {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl From<RasterImage> for DecodeResponse {
    fn from(image: RasterImage) -> Self {
        let (width, height) = (image.width(), image.height());
        Self {
            data: image.into_pixels(),
            width,
            height,
        }
    }
}

impl TryFrom<DecodeResponse> for RasterImage {
    type Error = EditorError;

    fn try_from(response: DecodeResponse) -> Result<Self> {
        RasterImage::new(response.width, response.height, response.data)
    }
}

/// Decodes any supported source into an RGBA raster.
pub fn decode_request(request: &DecodeRequest) -> Result<RasterImage> {
    debug!(kind = request.kind(), "Decoding map source");
    match request {
        DecodeRequest::PgmFile { bytes } => {
            let raster = parse_grayscale(bytes)?;
            convert(
                SampleGrid::Gray(&raster.samples),
                raster.width,
                raster.height,
                SampleSource::Grayscale {
                    max_value: raster.max_value,
                },
            )
        }
        DecodeRequest::RosMap(grid) => {
            let (width, height) = grid.dimensions()?;
            convert(SampleGrid::Signed(&grid.data), width, height, SampleSource::OccupancyGrid)
        }
        DecodeRequest::LiveCostmap(grid) => {
            let (width, height) = grid.dimensions()?;
            convert(SampleGrid::Signed(&grid.data), width, height, SampleSource::LiveCostmap)
        }
        DecodeRequest::EncodedImage { bytes } => {
            let decoded = image::load_from_memory(bytes)
                .map_err(|e| EditorError::ImageDecode(e.to_string()))?;
            RasterImage::from_rgba_image(decoded.to_rgba8())
        }
    }
}
