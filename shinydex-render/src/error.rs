use std::path::PathBuf;

use thiserror::Error;

/// Errors originating from snapshot capture and export.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("capture backend is not available")]
    CaptureUnavailable,

    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("failed to parse snapshot document: {0}")]
    Svg(String),

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
