//! Per-task error taxonomy.

use std::fmt;

use crate::archive::ArchiveError;
use crate::metadata::MetadataError;
use crate::tiler::TilerError;

/// Any failure that ends one image's processing.
///
/// None of these abort the run; the pipeline turns them into a failed
/// [`TaskOutcome`](crate::task::TaskOutcome).
#[derive(Debug)]
pub enum PipelineError {
    /// The tiling collaborator failed.
    ExternalTool(TilerError),
    /// Reading tiles or writing the container failed.
    Io(ArchiveError),
    /// A tile could not be compressed.
    Compression(ArchiveError),
    /// The sidecar could not be written.
    Metadata(MetadataError),
}

impl PipelineError {
    /// Short name of the error category, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::ExternalTool(_) => "external_tool",
            PipelineError::Io(_) => "io",
            PipelineError::Compression(_) => "compression",
            PipelineError::Metadata(_) => "metadata",
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::ExternalTool(e) => write!(f, "{}", e),
            PipelineError::Io(e) => write!(f, "{}", e),
            PipelineError::Compression(e) => write!(f, "{}", e),
            PipelineError::Metadata(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::ExternalTool(e) => Some(e),
            PipelineError::Io(e) | PipelineError::Compression(e) => Some(e),
            PipelineError::Metadata(e) => Some(e),
        }
    }
}

impl From<TilerError> for PipelineError {
    fn from(e: TilerError) -> Self {
        PipelineError::ExternalTool(e)
    }
}

impl From<ArchiveError> for PipelineError {
    fn from(e: ArchiveError) -> Self {
        match e {
            ArchiveError::Compression { .. } => PipelineError::Compression(e),
            _ => PipelineError::Io(e),
        }
    }
}

impl From<MetadataError> for PipelineError {
    fn from(e: MetadataError) -> Self {
        PipelineError::Metadata(e)
    }
}
