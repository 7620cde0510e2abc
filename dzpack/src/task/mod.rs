//! Work items for a batch run.
//!
//! A run starts from two line-aligned text files: line *i* of the inputs
//! list is a source image, line *i* of the outputs list is the folder its
//! pyramid and container are written to. [`TaskLoader`] pairs them into
//! [`Task`] values; every task finishes as exactly one [`TaskOutcome`].

mod loader;
mod types;

pub use loader::{LoadError, TaskLoader};
pub use types::{Task, TaskOutcome};
