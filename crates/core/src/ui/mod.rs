//! User interface for map-editor.
//!
//! This module provides a thin editor window around the crop engine: the
//! map is displayed rotated about its center, a rectangle is selected by
//! dragging, and Enter replaces the map with the cropped region.
//!
//! # Architecture
//!
//! The UI is split into focused submodules:
//! - [`state`]: Status and outcome types
//! - [`rendering`]: Drawing utilities for the rotated image and overlays
//! - [`selection`]: User interaction handling
//! - [`editor`]: Main application logic
//!
//! # Usage
//!
//! ```ignore
//! use map_editor_core::{ui, EditorConfig};
//!
//! let config = EditorConfig::load()?;
//! let outcome = ui::run_editor_ui(image, 0.0, config)?;
//! println!("{} crops, final width {}", outcome.crops, outcome.image.width());
//! ```

mod editor;
mod rendering;
mod selection;
mod state;

// Public API exports
pub use editor::MapEditorApp;
pub use state::{EditorOutcome, EditorStatus};

use crate::config::EditorConfig;
use crate::error::Result;
use crate::raster::RasterImage;

/// Launches the editor window and blocks until it is closed.
///
/// # Arguments
/// * `image` - The decoded map to display
/// * `rotation_degrees` - Initial display rotation
/// * `config` - Editor configuration
///
/// # Returns
/// - `Ok(outcome)` - The image on screen when the window closed
/// - `Err(e)` - An error occurred launching or running the UI
pub fn run_editor_ui(
    image: RasterImage,
    rotation_degrees: f64,
    config: EditorConfig,
) -> Result<EditorOutcome> {
    editor::run(image, rotation_degrees, config)
}
