//! UI state types.

use crate::raster::RasterImage;

/// What the status line reports after the last user action.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorStatus {
    /// Nothing has happened yet.
    Idle,
    /// A crop replaced the displayed image.
    Cropped { width: u32, height: u32 },
    /// The last crop produced nothing; the image is unchanged.
    Rejected,
}

impl EditorStatus {
    pub fn message(&self) -> String {
        match self {
            EditorStatus::Idle => "Drag to select, Enter to crop".to_string(),
            EditorStatus::Cropped { width, height } => format!("Cropped to {}x{}", width, height),
            EditorStatus::Rejected => "Selection too small, nothing cropped".to_string(),
        }
    }
}

/// What the editor window leaves behind when it closes.
#[derive(Clone, Debug)]
pub struct EditorOutcome {
    /// The image on screen at close time (the last crop, if any).
    pub image: RasterImage,
    /// Display rotation at close time, in degrees.
    pub rotation_degrees: f64,
    /// Number of successful crops.
    pub crops: usize,
}
