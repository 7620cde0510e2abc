//! Error types for tile archiving.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Codec failures while compressing or decompressing a single tile.
#[derive(Debug, Error)]
pub enum CompressionError {
    /// The encoder reported a failure.
    #[error("gzip compression failed: {0}")]
    Encode(#[source] io::Error),

    /// The decoder reported a failure.
    #[error("gzip decompression failed: {0}")]
    Decode(#[source] io::Error),
}

/// Errors that abort archiving for one image.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The pyramid directory tree could not be listed.
    #[error("failed to scan {}: {source}", path.display())]
    ScanFailed { path: PathBuf, source: io::Error },

    /// The container file could not be created.
    #[error("cannot create container file {}: {source}", path.display())]
    CreateContainerFailed { path: PathBuf, source: io::Error },

    /// A tile file could not be read.
    #[error("failed to read tile {}: {source}", path.display())]
    ReadTileFailed { path: PathBuf, source: io::Error },

    /// Writing to the container failed.
    #[error("failed to write container {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Reading from an existing container failed.
    #[error("failed to read container {}: {source}", path.display())]
    ReadContainerFailed { path: PathBuf, source: io::Error },

    /// A tile could not be compressed or decompressed.
    #[error("tile {}: {source}", path.display())]
    Compression {
        path: PathBuf,
        source: CompressionError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_read_tile_failed_display() {
        let err = ArchiveError::ReadTileFailed {
            path: PathBuf::from("/dz/1/0/0.jpg"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/dz/1/0/0.jpg"));
        assert!(msg.contains("denied"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_compression_error_chain() {
        let err = ArchiveError::Compression {
            path: PathBuf::from("/dz/0/0/0.png"),
            source: CompressionError::Encode(io::Error::other("codec")),
        };
        assert!(err.to_string().contains("gzip compression failed"));
        assert!(err.source().is_some());
    }
}
