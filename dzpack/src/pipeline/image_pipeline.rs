//! The per-image pipeline.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::archive::{CleanupWarning, TileArchiver};
use crate::config::BatchConfig;
use crate::metadata::MetadataWriter;
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::task::{Task, TaskOutcome};
use crate::tiler::{PyramidGenerator, PyramidOptions};

use super::PipelineError;

/// Runs one task end to end: pyramid generation, archiving, sidecar.
///
/// Shared across workers behind an `Arc`; holds no per-task state.
pub struct ImagePipeline {
    generator: Arc<dyn PyramidGenerator>,
    archiver: TileArchiver,
    metadata: MetadataWriter,
    options: PyramidOptions,
}

impl ImagePipeline {
    pub fn new(generator: Arc<dyn PyramidGenerator>, config: &BatchConfig) -> Self {
        Self {
            generator,
            archiver: TileArchiver::new(config),
            metadata: MetadataWriter::new(config),
            options: PyramidOptions::from_config(config),
        }
    }

    /// Process `task` and report its outcome.
    ///
    /// Never fails: every error becomes a failed [`TaskOutcome`], which is
    /// also sent to `reporter` as a [`ProgressEvent::Completed`].
    pub fn process(&self, task: &Task, reporter: &ProgressReporter) -> TaskOutcome {
        let start = Instant::now();
        let outcome = match self.run(task, reporter) {
            Ok(outcome) => {
                info!(
                    task = task.sequence_index(),
                    source = %task.source_path().display(),
                    tiles = outcome.tile_count,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Image processed"
                );
                outcome
            }
            Err(e) => {
                error!(
                    task = task.sequence_index(),
                    source = %task.source_path().display(),
                    kind = e.kind(),
                    error = %e,
                    "Image failed"
                );
                TaskOutcome::failed(task.sequence_index(), e.to_string())
            }
        };

        report_completed(reporter, task, outcome.clone());
        outcome
    }

    fn run(&self, task: &Task, reporter: &ProgressReporter) -> Result<TaskOutcome, PipelineError> {
        let index = task.sequence_index();
        let source = task.source_path();
        let dest = task.dest_folder();

        let stale = self.archiver.clear_tiles(dest);
        report_warnings(reporter, task, &stale);

        let info = self.generator.generate_pyramid(source, dest, &self.options)?;
        reporter.report(ProgressEvent::Started {
            sequence_index: index,
            source: source.to_path_buf(),
            source_width: info.source_width,
            source_height: info.source_height,
            canvas: info.width.max(info.height),
        });

        reporter.report(ProgressEvent::Archiving {
            sequence_index: index,
        });
        let report = self.archiver.archive(dest)?;
        report_warnings(reporter, task, &report.cleanup_warnings);

        let sidecar = self.metadata.write(
            dest,
            info.width,
            info.height,
            self.options.tile_size,
            &report.index,
        )?;
        debug!(task = index, sidecar = %sidecar.display(), "Sidecar written");

        Ok(TaskOutcome::succeeded(
            index,
            info.width,
            info.height,
            report.tile_count(),
        ))
    }
}

fn report_warnings(reporter: &ProgressReporter, task: &Task, warnings: &[CleanupWarning]) {
    for warning in warnings {
        reporter.report(ProgressEvent::Warning {
            sequence_index: task.sequence_index(),
            source: task.source_path().to_path_buf(),
            message: warning.to_string(),
        });
    }
}

/// Send the final event for a task.
pub(crate) fn report_completed(reporter: &ProgressReporter, task: &Task, outcome: TaskOutcome) {
    reporter.report(ProgressEvent::Completed {
        source: task.source_path().to_path_buf(),
        dest: task.dest_folder().to_path_buf(),
        outcome,
    });
}
