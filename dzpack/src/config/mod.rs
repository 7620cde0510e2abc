//! Configuration for batch tiling runs.
//!
//! Groups every knob the core consumes into a single [`BatchConfig`] value:
//!
//! - **Tiling**: tile size, output format, lossy quality
//! - **Scheduling**: number of concurrently running image jobs
//! - **Archiving**: keep/discard the per-tile tree, accepted tile extensions,
//!   container and sidecar file names
//!
//! Values come from three layers, highest precedence first: CLI flags,
//! an optional INI file ([`ConfigFile`]), and the defaults in [`defaults`].
//!
//! # Example
//!
//! ```
//! use dzpack::config::{BatchConfig, TileFormat};
//!
//! let config = BatchConfig::default()
//!     .with_tile_size(256)
//!     .with_format(TileFormat::Png)
//!     .with_workers(2);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.format().suffix(), ".png");
//! ```

mod batch;
pub mod defaults;
mod error;
mod file;
mod format;

pub use batch::BatchConfig;
pub use error::ConfigError;
pub use file::ConfigFile;
pub use format::TileFormat;
