//! Sidecar error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for sidecar operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

#[derive(Debug, Error)]
pub enum MetadataError {
    /// The sidecar file could not be created.
    #[error("Cannot create metadata file {}: {source}", path.display())]
    CreateFailed { path: PathBuf, source: io::Error },

    /// Serialising or flushing the document failed.
    #[error("Failed to write metadata file {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The sidecar file could not be opened.
    #[error("Cannot read metadata file {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// The sidecar file is not a valid document.
    #[error("Invalid metadata file {}: {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },
}
