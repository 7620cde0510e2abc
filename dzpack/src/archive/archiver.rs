//! Streams a tile tree into a single container file.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::BatchConfig;

use super::layout::{discover_tiles, is_numeric_name, TileFile};
use super::{compress_tile, ArchiveError, ArchiveResult, TileIndex};

/// Tiles read and compressed in parallel before being appended in order.
const TILE_BATCH_SIZE: usize = 64;

/// Container write buffer size.
const WRITE_BUFFER_SIZE: usize = 256 * 1024;

/// A non-fatal failure while discarding the tile tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupWarning {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for CleanupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to remove {}: {}", self.path.display(), self.message)
    }
}

/// Result of archiving one image's tile tree.
#[derive(Debug, Clone)]
pub struct ArchiveReport {
    /// Path of the written container.
    pub container_path: PathBuf,
    /// Records in container append order.
    pub index: TileIndex,
    /// Deletion failures from the discard step, if any.
    pub cleanup_warnings: Vec<CleanupWarning>,
}

impl ArchiveReport {
    pub fn tile_count(&self) -> usize {
        self.index.len()
    }

    /// Length of the container file in bytes.
    pub fn container_bytes(&self) -> u64 {
        self.index.total_bytes()
    }
}

/// Packs a `level/row/column.ext` tree into one container.
///
/// Tiles are read and compressed in parallel batches with rayon, then
/// appended strictly in discovery order so offsets stay deterministic.
#[derive(Debug, Clone)]
pub struct TileArchiver {
    container_name: String,
    blank_tile_name: String,
    extensions: Vec<String>,
    keep_tiles: bool,
}

impl TileArchiver {
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            container_name: config.container_name().to_string(),
            blank_tile_name: config.blank_tile_name().to_string(),
            extensions: config.tile_extensions().to_vec(),
            keep_tiles: config.keep_tiles(),
        }
    }

    /// Override the keep/discard policy.
    pub fn with_keep_tiles(mut self, keep_tiles: bool) -> Self {
        self.keep_tiles = keep_tiles;
        self
    }

    /// Archive every tile under `folder` into `folder/<container_name>`.
    ///
    /// Any read, write or compression failure aborts the archive. Failures
    /// while discarding the tile tree afterwards are only reported.
    pub fn archive(&self, folder: &Path) -> ArchiveResult<ArchiveReport> {
        let tiles = discover_tiles(folder, &self.extensions)?;
        debug!(
            folder = %folder.display(),
            tiles = tiles.len(),
            "Discovered tiles"
        );

        let container_path = folder.join(&self.container_name);
        let index = self.write_container(&container_path, &tiles)?;

        info!(
            container = %container_path.display(),
            tiles = index.len(),
            bytes = index.total_bytes(),
            "Container written"
        );

        let cleanup_warnings = if self.keep_tiles {
            Vec::new()
        } else {
            self.clear_tiles(folder)
        };

        Ok(ArchiveReport {
            container_path,
            index,
            cleanup_warnings,
        })
    }

    fn write_container(&self, path: &Path, tiles: &[TileFile]) -> ArchiveResult<TileIndex> {
        let file = File::create(path).map_err(|source| ArchiveError::CreateContainerFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
        let write_failed = |source: std::io::Error| ArchiveError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let mut index = TileIndex::new();
        for batch in tiles.chunks(TILE_BATCH_SIZE) {
            let compressed: Vec<ArchiveResult<Vec<u8>>> =
                batch.par_iter().map(read_and_compress).collect();

            for (tile, payload) in batch.iter().zip(compressed) {
                let payload = payload?;
                writer.write_all(&payload).map_err(write_failed)?;
                index.append(
                    tile.coordinate.key(),
                    self.container_name.as_str(),
                    payload.len() as u64,
                );
            }
        }

        writer.flush().map_err(write_failed)?;
        Ok(index)
    }

    /// Remove numeric level directories and the blank placeholder tile.
    ///
    /// Used after archiving to discard the tree, and before tiling so a
    /// previous run's tiles never end up in a new container. A missing
    /// folder has nothing to clear.
    pub fn clear_tiles(&self, folder: &Path) -> Vec<CleanupWarning> {
        let mut warnings = Vec::new();
        if !folder.is_dir() {
            return warnings;
        }

        match fs::read_dir(folder) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if !path.is_dir() || !is_numeric_name(&entry.file_name()) {
                        continue;
                    }
                    if let Err(e) = fs::remove_dir_all(&path) {
                        warnings.push(cleanup_warning(path, e));
                    }
                }
            }
            Err(e) => warnings.push(cleanup_warning(folder.to_path_buf(), e)),
        }

        let blank = folder.join(&self.blank_tile_name);
        if blank.is_file() {
            if let Err(e) = fs::remove_file(&blank) {
                warnings.push(cleanup_warning(blank, e));
            }
        }

        warnings
    }
}

fn read_and_compress(tile: &TileFile) -> ArchiveResult<Vec<u8>> {
    let raw = fs::read(&tile.path).map_err(|source| ArchiveError::ReadTileFailed {
        path: tile.path.clone(),
        source,
    })?;
    compress_tile(&raw).map_err(|source| ArchiveError::Compression {
        path: tile.path.clone(),
        source,
    })
}

fn cleanup_warning(path: PathBuf, error: std::io::Error) -> CleanupWarning {
    warn!(path = %path.display(), error = %error, "Failed to discard tile data");
    CleanupWarning {
        path,
        message: error.to_string(),
    }
}
