//! dzpack - Batch deep-zoom tiling with compact tile containers
//!
//! This library converts a list of source images into deep-zoom tile
//! pyramids and repackages each pyramid into a single compressed container
//! (`tiles_000.binz`) plus a JSON sidecar (`metadata.json`) that maps every
//! tile coordinate to a byte range inside the container.
//!
//! # Architecture
//!
//! ```text
//! TaskLoader ──► TaskScheduler ──► ImagePipeline (per task, up to W at once)
//!                     │                 │
//!                     │                 ├─► PyramidGenerator (external tiler)
//!                     │                 ├─► TileArchiver ──► compress_tile
//!                     │                 └─► MetadataWriter
//!                     │
//!                     └──────────► ResultAggregator (single consumer, mpsc)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dzpack::config::BatchConfig;
//! use dzpack::pipeline::ImagePipeline;
//! use dzpack::progress::{ResultAggregator, WriterSink};
//! use dzpack::scheduler::TaskScheduler;
//! use dzpack::task::TaskLoader;
//! use dzpack::tiler::ImageTiler;
//!
//! let config = BatchConfig::default();
//! let tasks = TaskLoader::new("inputs.txt", "outputs.txt").load()?;
//!
//! let aggregator = ResultAggregator::start(tasks.len(), WriterSink::stdout());
//! let pipeline = Arc::new(ImagePipeline::new(Arc::new(ImageTiler::new()), &config));
//! let scheduler = TaskScheduler::new(pipeline, config.workers());
//!
//! scheduler.run(tasks, aggregator.reporter()).await;
//! let summary = aggregator.finish().await;
//! std::process::exit(summary.exit_code());
//! ```

pub mod archive;
pub mod config;
pub mod logging;
pub mod metadata;
pub mod pipeline;
pub mod progress;
pub mod scheduler;
pub mod task;
pub mod tiler;

/// Crate version, reported in the CLI banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
