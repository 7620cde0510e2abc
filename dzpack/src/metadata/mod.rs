//! JSON sidecar describing a container.
//!
//! Each output folder gets a `metadata.json` next to its container:
//!
//! ```json
//! {
//!   "width": 512,
//!   "height": 512,
//!   "tile_size": 256,
//!   "tiles": {
//!     "0_0_0": {
//!       "binaryName": "tiles_000.binz",
//!       "startOffset": 0,
//!       "size": 1234
//!     }
//!   }
//! }
//! ```
//!
//! Tile entries appear in container append order, so writing the same index
//! twice produces byte-identical files.

mod document;
mod error;
mod writer;

pub use document::{SidecarDocument, TileEntry};
pub use error::{MetadataError, MetadataResult};
pub use writer::MetadataWriter;
