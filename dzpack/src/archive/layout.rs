//! Tile tree layout parsing.
//!
//! The tiler writes tiles as `root/{level}/{row}/{column}.{ext}`. Discovery
//! validates each component instead of trusting the nesting: a level or row
//! directory whose name is not a non-negative integer, or a file whose stem
//! is not, is skipped rather than treated as an error.
//!
//! Two files can parse to the same coordinate (`0/0/0.jpg` next to
//! `0/0/0.png`, or `01.jpg` next to `1.jpg`). Only the first in path order is
//! kept, so every coordinate key appears at most once in a container.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{ArchiveError, ArchiveResult};

/// Position of one tile in the pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoordinate {
    pub level: u32,
    pub row: u32,
    pub column: u32,
}

impl TileCoordinate {
    pub fn new(level: u32, row: u32, column: u32) -> Self {
        Self { level, row, column }
    }

    /// Key used in the sidecar: `"{level}_{row}_{column}"`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.level, self.row, self.column)
    }
}

/// A tile file found on disk together with its parsed coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileFile {
    pub path: PathBuf,
    pub coordinate: TileCoordinate,
}

/// Parse a path component as a tile index.
///
/// Only plain ASCII digits are accepted, so `+1`, `-0` or `1e3` are rejected.
pub(crate) fn parse_index(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Whether a directory entry name is a numeric tile directory.
pub(crate) fn is_numeric_name(name: &std::ffi::OsStr) -> bool {
    name.to_str().and_then(parse_index).is_some()
}

/// Find every tile file under `root`, sorted by full path.
///
/// `extensions` are compared case-insensitively and given without the dot.
pub fn discover_tiles(root: &Path, extensions: &[String]) -> ArchiveResult<Vec<TileFile>> {
    let mut tiles = Vec::new();

    for (level, level_dir) in numeric_subdirs(root)? {
        for (row, row_dir) in numeric_subdirs(&level_dir)? {
            for entry in read_dir(&row_dir)? {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                match parse_tile_file(&path, extensions) {
                    Some(column) => tiles.push(TileFile {
                        path,
                        coordinate: TileCoordinate::new(level, row, column),
                    }),
                    None => debug!(path = %path.display(), "Skipping non-tile file"),
                }
            }
        }
    }

    tiles.sort_by(|a, b| a.path.cmp(&b.path));

    let mut seen = HashSet::with_capacity(tiles.len());
    tiles.retain(|tile| {
        let first = seen.insert(tile.coordinate);
        if !first {
            warn!(
                path = %tile.path.display(),
                coordinate = %tile.coordinate,
                "Skipping tile with duplicate coordinate"
            );
        }
        first
    });

    Ok(tiles)
}

fn parse_tile_file(path: &Path, extensions: &[String]) -> Option<u32> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    if !extensions.iter().any(|e| *e == ext) {
        return None;
    }
    parse_index(path.file_stem()?.to_str()?)
}

fn numeric_subdirs(dir: &Path) -> ArchiveResult<Vec<(u32, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in read_dir(dir)? {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().to_str().and_then(parse_index) {
            Some(index) => dirs.push((index, path)),
            None => debug!(path = %path.display(), "Skipping non-numeric directory"),
        }
    }
    Ok(dirs)
}

fn read_dir(dir: &Path) -> ArchiveResult<Vec<fs::DirEntry>> {
    let scan_failed = |source: std::io::Error| ArchiveError::ScanFailed {
        path: dir.to_path_buf(),
        source,
    };
    fs::read_dir(dir)
        .map_err(scan_failed)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(scan_failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exts() -> Vec<String> {
        vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()]
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel.as_bytes()).unwrap();
    }

    #[test]
    fn test_coordinate_key() {
        assert_eq!(TileCoordinate::new(3, 1, 2).key(), "3_1_2");
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("0012"), Some(12));
        assert_eq!(parse_index(""), None);
        assert_eq!(parse_index("+1"), None);
        assert_eq!(parse_index("1a"), None);
        assert_eq!(parse_index("99999999999"), None);
    }

    #[test]
    fn test_discovers_tiles_with_coordinates() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "0/0/0.jpg");
        touch(temp.path(), "1/0/1.jpg");
        touch(temp.path(), "1/1/0.jpg");

        let tiles = discover_tiles(temp.path(), &exts()).unwrap();
        let keys: Vec<_> = tiles.iter().map(|t| t.coordinate.key()).collect();
        assert_eq!(keys, vec!["0_0_0", "1_0_1", "1_1_0"]);
    }

    #[test]
    fn test_order_is_lexical_by_path() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "2/0/10.png");
        touch(temp.path(), "2/0/2.png");
        touch(temp.path(), "10/0/0.png");

        let tiles = discover_tiles(temp.path(), &exts()).unwrap();
        let keys: Vec<_> = tiles.iter().map(|t| t.coordinate.key()).collect();
        assert_eq!(keys, vec!["10_0_0", "2_0_10", "2_0_2"]);
    }

    #[test]
    fn test_skips_unexpected_names_and_extensions() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "0/0/0.png");
        touch(temp.path(), "blank.png");
        touch(temp.path(), "thumbs/0/0.png");
        touch(temp.path(), "0/x/0.png");
        touch(temp.path(), "0/0/a.png");
        touch(temp.path(), "0/0/1.txt");
        touch(temp.path(), "0/0/2.PNG");
        touch(temp.path(), "0/0/3.JpEg");

        let tiles = discover_tiles(temp.path(), &exts()).unwrap();
        let keys: Vec<_> = tiles.iter().map(|t| t.coordinate.key()).collect();
        assert_eq!(keys, vec!["0_0_0", "0_0_2", "0_0_3"]);
    }

    #[test]
    fn test_duplicate_coordinates_keep_first_path() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "0/0/0.jpg");
        touch(temp.path(), "0/0/0.png");
        touch(temp.path(), "1/0/01.jpg");
        touch(temp.path(), "1/0/1.jpg");
        touch(temp.path(), "01/0/0.jpg");
        touch(temp.path(), "1/0/0.jpg");

        let tiles = discover_tiles(temp.path(), &exts()).unwrap();
        let keys: Vec<_> = tiles.iter().map(|t| t.coordinate.key()).collect();
        assert_eq!(keys, vec!["0_0_0", "1_0_0", "1_0_1"]);

        let kept: Vec<_> = tiles
            .iter()
            .map(|t| t.path.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            kept,
            vec![
                PathBuf::from("0/0/0.jpg"),
                PathBuf::from("01/0/0.jpg"),
                PathBuf::from("1/0/01.jpg"),
            ]
        );
    }

    #[test]
    fn test_empty_root_has_no_tiles() {
        let temp = TempDir::new().unwrap();
        assert!(discover_tiles(temp.path(), &exts()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_scan_error() {
        let temp = TempDir::new().unwrap();
        let err = discover_tiles(&temp.path().join("absent"), &exts()).unwrap_err();
        assert!(matches!(err, ArchiveError::ScanFailed { .. }));
    }
}
