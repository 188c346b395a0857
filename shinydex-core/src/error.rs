use std::path::PathBuf;

use thiserror::Error;

/// Errors originating from catalog loading and durable storage.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not a list of regions: {0}")]
    CatalogFormat(#[from] serde_json::Error),

    #[error("storage I/O failed for {path}: {source}")]
    StorageIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize storage: {0}")]
    StorageSerialize(String),
}
