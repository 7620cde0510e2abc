//! Tile archiving: many small tile files into one offset-indexed container.
//!
//! A deep-zoom pyramid is written by the tiler as thousands of small files
//! laid out as `level/row/column.ext`. The archiver turns that tree into:
//!
//! - one container file (`tiles_000.binz`), a flat concatenation of
//!   independently gzip-framed tile payloads, and
//! - a [`TileIndex`] recording each tile's coordinate key, offset and size.
//!
//! Because every tile is compressed on its own, any tile can be recovered by
//! reading `[start_offset, start_offset + byte_size)` and gunzipping just that
//! slice (see [`ContainerReader`]).
//!
//! # Container layout
//!
//! ```text
//! offset 0                                                  EOF
//! ├── gzip(tile A) ──┼── gzip(tile B) ──┼── ... ──┼── gzip(tile N) ──┤
//!     record A            record B                     record N
//!     start=0             start=|A|                    start=Σ|..|
//! ```
//!
//! The container supports no updates or deletions: it is produced once per
//! image and read-only afterwards.

mod archiver;
mod compress;
mod error;
mod index;
mod layout;
mod reader;

pub use archiver::{ArchiveReport, CleanupWarning, TileArchiver};
pub use compress::{compress_tile, decompress_tile};
pub use error::{ArchiveError, ArchiveResult, CompressionError};
pub use index::{TileIndex, TileRecord};
pub use layout::{discover_tiles, TileCoordinate, TileFile};
pub use reader::ContainerReader;
