//! Progress reporting and result aggregation.
//!
//! Workers never write to the console or touch shared counters directly.
//! They send [`ProgressEvent`]s through a cloneable [`ProgressReporter`] to
//! a single consumer task owned by the [`ResultAggregator`]. That task:
//!
//! - keeps the completed / succeeded / failed counts,
//! - renders each event to one line and hands it to a [`ProgressSink`],
//! - publishes a [`ProgressSnapshot`] after every event,
//! - returns the final [`RunSummary`] once every reporter is dropped.
//!
//! Lines are emitted whole and one at a time, so output from concurrent
//! tasks never interleaves, while the image work itself runs unserialised.

mod aggregator;
mod event;
mod sink;
mod summary;

pub use aggregator::ResultAggregator;
pub use event::{ProgressEvent, ProgressReporter};
pub use sink::{MemorySink, ProgressSink, WriterSink};
pub use summary::{ProgressSnapshot, RunSummary};
