//! Random access to tiles inside a container.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::{decompress_tile, ArchiveError, ArchiveResult, TileRecord};

/// Reads individual tiles from a container by byte range.
///
/// Only `[start_offset, start_offset + byte_size)` is read for each tile;
/// the rest of the container is never touched.
#[derive(Debug)]
pub struct ContainerReader {
    path: PathBuf,
    file: File,
}

impl ContainerReader {
    /// Open a container for reading.
    pub fn open(path: impl AsRef<Path>) -> ArchiveResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| ArchiveError::ReadContainerFailed {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the compressed bytes of one tile.
    pub fn read_raw(&mut self, record: &TileRecord) -> ArchiveResult<Vec<u8>> {
        let mut buf = vec![0u8; record.byte_size as usize];
        self.file
            .seek(SeekFrom::Start(record.start_offset))
            .and_then(|_| self.file.read_exact(&mut buf))
            .map_err(|source| ArchiveError::ReadContainerFailed {
                path: self.path.clone(),
                source,
            })?;
        Ok(buf)
    }

    /// Read and decompress one tile.
    pub fn read_tile(&mut self, record: &TileRecord) -> ArchiveResult<Vec<u8>> {
        let raw = self.read_raw(record)?;
        decompress_tile(&raw).map_err(|source| ArchiveError::Compression {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{compress_tile, TileIndex};
    use tempfile::TempDir;

    fn build_container(dir: &Path, tiles: &[&[u8]]) -> (PathBuf, TileIndex) {
        let mut index = TileIndex::new();
        let mut bytes = Vec::new();
        for (i, tile) in tiles.iter().enumerate() {
            let payload = compress_tile(tile).unwrap();
            index.append(format!("0_0_{}", i), "tiles_000.binz", payload.len() as u64);
            bytes.extend_from_slice(&payload);
        }
        let path = dir.join("tiles_000.binz");
        std::fs::write(&path, bytes).unwrap();
        (path, index)
    }

    #[test]
    fn test_reads_tiles_in_any_order() {
        let temp = TempDir::new().unwrap();
        let (path, index) = build_container(temp.path(), &[b"alpha", b"beta", b"gamma"]);

        let mut reader = ContainerReader::open(&path).unwrap();
        assert_eq!(reader.read_tile(&index.records()[2]).unwrap(), b"gamma");
        assert_eq!(reader.read_tile(&index.records()[0]).unwrap(), b"alpha");
        assert_eq!(reader.read_tile(&index.records()[1]).unwrap(), b"beta");
    }

    #[test]
    fn test_read_raw_returns_gzip_member() {
        let temp = TempDir::new().unwrap();
        let (path, index) = build_container(temp.path(), &[b"alpha"]);

        let mut reader = ContainerReader::open(&path).unwrap();
        let raw = reader.read_raw(&index.records()[0]).unwrap();
        assert_eq!(raw.len() as u64, index.records()[0].byte_size);
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn test_record_past_end_fails() {
        let temp = TempDir::new().unwrap();
        let (path, _) = build_container(temp.path(), &[b"alpha"]);
        let bogus = TileRecord {
            coordinate_key: "9_9_9".to_string(),
            container_name: "tiles_000.binz".to_string(),
            start_offset: 10_000,
            byte_size: 16,
        };

        let mut reader = ContainerReader::open(&path).unwrap();
        let err = reader.read_tile(&bogus).unwrap_err();
        assert!(matches!(err, ArchiveError::ReadContainerFailed { .. }));
    }

    #[test]
    fn test_open_missing_container() {
        let temp = TempDir::new().unwrap();
        assert!(ContainerReader::open(temp.path().join("none.binz")).is_err());
    }
}
