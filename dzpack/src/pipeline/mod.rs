//! Per-image processing: tile, archive, describe.

mod error;
mod image_pipeline;

pub use error::PipelineError;
pub use image_pipeline::ImagePipeline;
pub(crate) use image_pipeline::report_completed;
