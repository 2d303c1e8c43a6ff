//! Map Editor Core Library
//!
//! This library provides the decoding and cropping pipeline behind the map
//! editor: occupancy-grid style images are loaded into RGBA rasters,
//! displayed with a rotation, and cropped by selecting a rectangle over the
//! rotated display.
//!
//! # Overview
//!
//! - **Decoding**: `P5` grayscale rasters, occupancy grids, live costmaps and
//!   PNG/JPEG images via the [`decode`] module
//! - **Background work**: an ordered single-worker queue via [`worker`]
//! - **Cropping**: inverse-rotation resampling via [`crop`]
//! - **Coordinates**: display/world/texture mapping via [`coords`]
//! - **User Interface**: a thin editor window via [`ui`]
//!
//! # Quick Start
//!
//! ```ignore
//! use map_editor_core::{EditorConfig, MapEditor, SourceLocation};
//!
//! let editor = MapEditor::new(EditorConfig::load()?)?;
//! let image = editor.load_pgm(&SourceLocation::parse("map.pgm")?).await?;
//! let cropped = editor.crop(Some(&image), 90.0, selection);
//! ```
//!
//! # Module Structure
//!
//! - [`config`]: Configuration loading and management
//! - [`coords`]: Coordinate spaces and camera
//! - [`crop`]: Rotation-aware crop engine
//! - [`decode`]: Sample reading, raster parsing and RGBA conversion
//! - [`error`]: Error types and result aliases
//! - [`loader`]: Source location parsing and file reads
//! - [`raster`]: The RGBA image type
//! - [`texture`]: Shape-keyed resource cache
//! - [`ui`]: Editor window
//! - [`worker`]: FIFO decode queue

pub mod config;
pub mod coords;
pub mod crop;
pub mod decode;
pub mod error;
pub mod loader;
pub mod raster;
pub mod texture;
pub mod ui;
pub mod worker;

// Re-export primary types for convenience
pub use config::EditorConfig;
pub use coords::{WorldPoint, WorldRect};
pub use crop::{CropRejection, CropRequest};
pub use decode::{DecodeRequest, DecodeResponse, GridPayload};
pub use error::{EditorError, Result};
pub use loader::SourceLocation;
pub use raster::{RasterImage, Rgb};
pub use worker::{DecodeQueue, PipelineWorker};

use tracing::{info, warn};

/// Which decoder a grid payload is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    RosMap,
    LiveCostmap,
}

/// Main entry point: configuration plus the decode queue.
///
/// Must be created inside a tokio runtime.
pub struct MapEditor {
    config: EditorConfig,
    queue: DecodeQueue,
}

impl MapEditor {
    /// Creates an editor backed by the standard decode pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Runtime`] outside a tokio runtime.
    pub fn new(config: EditorConfig) -> Result<Self> {
        Ok(Self::with_queue(config, DecodeQueue::spawn(PipelineWorker)?))
    }

    /// Creates an editor around an existing queue.
    pub fn with_queue(config: EditorConfig, queue: DecodeQueue) -> Self {
        Self { config, queue }
    }

    /// Decodes `request` on the background worker.
    ///
    /// A failure affects only this load; previously returned images stay valid.
    pub async fn load(&self, request: DecodeRequest) -> Result<RasterImage> {
        let kind = request.kind();
        let image = RasterImage::try_from(self.queue.submit(request).await?)?;
        info!(kind, width = image.width(), height = image.height(), "Map loaded");
        Ok(image)
    }

    /// Reads and decodes a `P5` raster file.
    pub async fn load_pgm(&self, location: &SourceLocation) -> Result<RasterImage> {
        let bytes = location.read().await?;
        self.load(DecodeRequest::PgmFile { bytes }).await
    }

    /// Reads and decodes a PNG or JPEG map image.
    pub async fn load_encoded(&self, location: &SourceLocation) -> Result<RasterImage> {
        let bytes = location.read().await?;
        self.load(DecodeRequest::EncodedImage { bytes }).await
    }

    /// Decodes a JSON grid payload (`{"info": {...}, "data": [...]}`).
    pub async fn load_grid_json(&self, kind: GridKind, json: &str) -> Result<RasterImage> {
        let grid: GridPayload = serde_json::from_str(json)?;
        let request = match kind {
            GridKind::RosMap => DecodeRequest::RosMap(grid),
            GridKind::LiveCostmap => DecodeRequest::LiveCostmap(grid),
        };
        self.load(request).await
    }

    /// Crops the image as displayed with `rotation_degrees`, using the
    /// configured scale and background.
    ///
    /// `None` means the selection was degenerate or there was no image; the
    /// caller keeps what it has.
    pub fn crop(
        &self,
        image: Option<&RasterImage>,
        rotation_degrees: f64,
        selection: WorldRect,
    ) -> Option<RasterImage> {
        let Some(source) = image else {
            warn!(reason = ?CropRejection::MissingTexture, "Crop rejected");
            return None;
        };
        let request = CropRequest::for_image(
            source,
            self.config.display_scale,
            rotation_degrees,
            selection,
        )
        .with_background(self.config.background);
        let cropped = crop::crop(Some(source), &request)?;
        info!(width = cropped.width(), height = cropped.height(), "Crop produced");
        Some(cropped)
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
}
