//! Deep-zoom pyramid generation.
//!
//! The batch pipeline treats pyramid generation as an opaque capability
//! behind [`PyramidGenerator`]: given a source image and a destination
//! folder it writes a `level/row/column.ext` tree and reports the output
//! canvas size. [`ImageTiler`] is the built-in implementation on top of the
//! `image` crate; tests substitute fakes that write synthetic trees.

mod error;
mod generator;
mod image_tiler;
pub mod sizing;

#[cfg(test)]
pub(crate) mod fake;

pub use error::TilerError;
pub use generator::{PyramidGenerator, PyramidInfo, PyramidOptions, DEFAULT_BLANK_THRESHOLD};
pub use image_tiler::ImageTiler;
