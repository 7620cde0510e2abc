//! Writes the per-image sidecar.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::archive::TileIndex;
use crate::config::BatchConfig;

use super::{MetadataError, MetadataResult, SidecarDocument};

/// Serialises image dimensions and a [`TileIndex`] to `metadata.json`.
#[derive(Debug, Clone)]
pub struct MetadataWriter {
    sidecar_name: String,
}

impl MetadataWriter {
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            sidecar_name: config.sidecar_name().to_string(),
        }
    }

    /// Path of the sidecar for an output folder.
    pub fn sidecar_path(&self, folder: &Path) -> PathBuf {
        folder.join(&self.sidecar_name)
    }

    /// Write the sidecar into `folder`, replacing any existing one.
    pub fn write(
        &self,
        folder: &Path,
        width: u32,
        height: u32,
        tile_size: u32,
        index: &TileIndex,
    ) -> MetadataResult<PathBuf> {
        let path = self.sidecar_path(folder);
        let document = SidecarDocument::from_index(width, height, tile_size, index);

        let file = File::create(&path).map_err(|source| MetadataError::CreateFailed {
            path: path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, &document)
            .and_then(|_| writeln!(writer).map_err(serde_json::Error::io))
            .and_then(|_| writer.flush().map_err(serde_json::Error::io))
            .map_err(|source| MetadataError::WriteFailed {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), tiles = index.len(), "Metadata written");
        Ok(path)
    }
}
