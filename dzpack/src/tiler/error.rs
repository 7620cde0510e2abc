//! Tiler errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a pyramid generator.
///
/// The pipeline only uses the message; variants exist for diagnostics.
#[derive(Debug, Error)]
pub enum TilerError {
    /// The source image could not be opened or decoded.
    #[error("Failed to load image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The source image has a zero dimension.
    #[error("Image {} has no pixels", path.display())]
    EmptyImage { path: PathBuf },

    /// An output directory or file could not be created.
    #[error("Failed to create {}: {source}", path.display())]
    CreateFailed { path: PathBuf, source: io::Error },

    /// A tile could not be encoded.
    #[error("Failed to encode tile {}: {source}", path.display())]
    EncodeFailed {
        path: PathBuf,
        source: image::ImageError,
    },

    /// Generator-specific failure.
    #[error("{0}")]
    Failed(String),
}
