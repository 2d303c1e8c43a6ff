//! Error types for the map-editor-core library.
//!
//! Decode failures are local to a single load attempt. Crop rejections are
//! not errors at all: the crop API returns `None` for them.

use thiserror::Error;

/// Errors that can occur within the map-editor-core library.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The byte stream does not match the grayscale raster header grammar.
    #[error("Invalid raster format: {0}")]
    InvalidFormat(String),

    /// An occupancy-grid payload lacks its width/height metadata.
    #[error("Missing grid info: {0}")]
    MissingInfo(String),

    /// The sample grid is shorter than `width * height`.
    #[error("Sample count mismatch: expected {expected}, got {actual}")]
    SampleCount { expected: usize, actual: usize },

    /// Width or height is zero, or the pixel buffer does not match them.
    #[error("Invalid image dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The load target is neither a filesystem path nor a `file://` URL.
    #[error("Unsupported source location: {0}")]
    UnsupportedLocation(String),

    /// An encoded (PNG/JPEG) map image failed to decode.
    #[error("Image decoding failed: {0}")]
    ImageDecode(String),

    /// The decode queue's worker is gone.
    #[error("Decode worker is no longer running")]
    WorkerClosed,

    /// No async runtime was available, or a worker task failed to join.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Configuration-related errors (malformed environment values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// UI-related errors (window creation, event loop).
    #[error("UI error: {0}")]
    Ui(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    /// Creates an invalid-format error with the given message.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Creates a missing-info error with the given message.
    pub fn missing_info(msg: impl Into<String>) -> Self {
        Self::MissingInfo(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }
}

/// A convenient alias for Result with [`EditorError`].
pub type Result<T> = std::result::Result<T, EditorError>;
