//! Typed form of the sidecar document.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::archive::{TileIndex, TileRecord};

use super::{MetadataError, MetadataResult};

/// Location of one tile, as stored in the sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileEntry {
    #[serde(rename = "binaryName")]
    pub binary_name: String,
    #[serde(rename = "startOffset")]
    pub start_offset: u64,
    pub size: u64,
}

impl From<&TileRecord> for TileEntry {
    fn from(record: &TileRecord) -> Self {
        Self {
            binary_name: record.container_name.clone(),
            start_offset: record.start_offset,
            size: record.byte_size,
        }
    }
}

/// Sidecar contents: output dimensions plus the tile map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidecarDocument {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub tiles: IndexMap<String, TileEntry>,
}

impl SidecarDocument {
    /// Build a document from a tile index, keeping its order.
    pub fn from_index(width: u32, height: u32, tile_size: u32, index: &TileIndex) -> Self {
        let tiles = index
            .iter()
            .map(|r| (r.coordinate_key.clone(), TileEntry::from(r)))
            .collect();
        Self {
            width,
            height,
            tile_size,
            tiles,
        }
    }

    /// Parse a sidecar previously written by [`MetadataWriter`](super::MetadataWriter).
    pub fn load(path: &Path) -> MetadataResult<Self> {
        let file = File::open(path).map_err(|source| MetadataError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            MetadataError::ParseFailed {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Convert the tile map back to records, in document order.
    pub fn to_records(&self) -> Vec<TileRecord> {
        self.tiles
            .iter()
            .map(|(key, entry)| TileRecord {
                coordinate_key: key.clone(),
                container_name: entry.binary_name.clone(),
                start_offset: entry.start_offset,
                byte_size: entry.size,
            })
            .collect()
    }
}
