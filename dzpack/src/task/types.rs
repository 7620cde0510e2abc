//! Task and outcome types.

use std::path::{Path, PathBuf};

/// One image to tile and archive.
///
/// Created once by the loader and never mutated. `sequence_index` is the
/// 0-based position among the *retained* pairs and is only used for ordered
/// progress reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    source_path: PathBuf,
    dest_folder: PathBuf,
    sequence_index: usize,
}

impl Task {
    /// Create a new task.
    pub fn new(
        source_path: impl Into<PathBuf>,
        dest_folder: impl Into<PathBuf>,
        sequence_index: usize,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            dest_folder: dest_folder.into(),
            sequence_index,
        }
    }

    /// Path of the source image.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Folder receiving the pyramid, container and sidecar.
    pub fn dest_folder(&self) -> &Path {
        &self.dest_folder
    }

    /// Position of this task in the loaded sequence.
    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }
}

/// Final result of processing one [`Task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    /// Sequence index of the task this outcome belongs to.
    pub sequence_index: usize,
    /// Whether every step of the pipeline succeeded.
    pub success: bool,
    /// Human-readable failure description, set when `success` is false.
    pub error_message: Option<String>,
    /// Output canvas width (a power of two), 0 on failure.
    pub output_width: u32,
    /// Output canvas height (a power of two), 0 on failure.
    pub output_height: u32,
    /// Number of tiles archived into the container.
    pub tile_count: usize,
}

impl TaskOutcome {
    /// Outcome for a task that completed every step.
    pub fn succeeded(sequence_index: usize, width: u32, height: u32, tile_count: usize) -> Self {
        Self {
            sequence_index,
            success: true,
            error_message: None,
            output_width: width,
            output_height: height,
            tile_count,
        }
    }

    /// Outcome for a task that failed at some step.
    pub fn failed(sequence_index: usize, message: impl Into<String>) -> Self {
        Self {
            sequence_index,
            success: false,
            error_message: Some(message.into()),
            output_width: 0,
            output_height: 0,
            tile_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_accessors() {
        let task = Task::new("/img/a.tif", "/out/a", 3);
        assert_eq!(task.source_path(), Path::new("/img/a.tif"));
        assert_eq!(task.dest_folder(), Path::new("/out/a"));
        assert_eq!(task.sequence_index(), 3);
    }

    #[test]
    fn test_outcome_succeeded() {
        let outcome = TaskOutcome::succeeded(1, 512, 512, 5);
        assert!(outcome.success);
        assert!(outcome.error_message.is_none());
        assert_eq!(outcome.output_width, 512);
        assert_eq!(outcome.tile_count, 5);
    }

    #[test]
    fn test_outcome_failed() {
        let outcome = TaskOutcome::failed(2, "cannot decode");
        assert!(!outcome.success);
        assert_eq!(outcome.error_message.as_deref(), Some("cannot decode"));
        assert_eq!(outcome.output_width, 0);
        assert_eq!(outcome.tile_count, 0);
    }
}
