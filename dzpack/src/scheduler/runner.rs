//! Semaphore-bounded task runner.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::pipeline::{report_completed, ImagePipeline};
use crate::progress::ProgressReporter;
use crate::task::{Task, TaskOutcome};

/// Runs [`ImagePipeline`] over every task with at most `workers` in flight.
///
/// Each job runs on tokio's blocking pool. A failing or panicking job
/// produces a failed outcome and never affects the others; there is no
/// cancellation once a job has been admitted.
pub struct TaskScheduler {
    pipeline: Arc<ImagePipeline>,
    workers: usize,
}

impl TaskScheduler {
    /// Create a scheduler. A worker count of 0 is treated as 1.
    pub fn new(pipeline: Arc<ImagePipeline>, workers: usize) -> Self {
        Self {
            pipeline,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Process all tasks and return one outcome per task, ordered by
    /// sequence index.
    pub async fn run(&self, tasks: Vec<Task>, reporter: ProgressReporter) -> Vec<TaskOutcome> {
        let total = tasks.len();
        info!(tasks = total, workers = self.workers, "Starting batch");

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut jobs = JoinSet::new();
        let mut pending = HashMap::with_capacity(total);
        let mut outcomes = Vec::with_capacity(total);

        for task in tasks {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    let outcome = TaskOutcome::failed(task.sequence_index(), e.to_string());
                    report_completed(&reporter, &task, outcome.clone());
                    outcomes.push(outcome);
                    continue;
                }
            };

            debug!(
                task = task.sequence_index(),
                source = %task.source_path().display(),
                available = semaphore.available_permits(),
                "Dispatching task"
            );

            let pipeline = Arc::clone(&self.pipeline);
            let job_reporter = reporter.clone();
            let job_task = task.clone();
            let handle = jobs.spawn_blocking(move || {
                let _permit = permit;
                run_isolated(&pipeline, &job_task, &job_reporter)
            });
            pending.insert(handle.id(), task);
        }

        outcomes.extend(collect_outcomes(&mut jobs, pending, &reporter).await);

        outcomes.sort_by_key(|o| o.sequence_index);
        let failed = outcomes.iter().filter(|o| !o.success).count();
        info!(
            tasks = total,
            succeeded = outcomes.len() - failed,
            failed,
            "Batch finished"
        );
        outcomes
    }
}

/// Drain `jobs`, one outcome per spawned task.
///
/// A job that ends without returning an outcome still gets a failed one,
/// found through its task id in `pending`.
async fn collect_outcomes(
    jobs: &mut JoinSet<TaskOutcome>,
    mut pending: HashMap<Id, Task>,
    reporter: &ProgressReporter,
) -> Vec<TaskOutcome> {
    let mut outcomes = Vec::with_capacity(pending.len());
    while let Some(joined) = jobs.join_next_with_id().await {
        match joined {
            Ok((id, outcome)) => {
                pending.remove(&id);
                outcomes.push(outcome);
            }
            Err(e) => match pending.remove(&e.id()) {
                Some(task) => outcomes.push(lost_outcome(&task, e, reporter)),
                None => warn!(error = %e, "Unknown task failed to join"),
            },
        }
    }
    outcomes
}

fn lost_outcome(task: &Task, error: JoinError, reporter: &ProgressReporter) -> TaskOutcome {
    let message = if error.is_panic() {
        let payload = error.into_panic();
        format!("panicked: {}", panic_message(payload.as_ref()))
    } else {
        format!("did not complete: {}", error)
    };
    error!(
        task = task.sequence_index(),
        source = %task.source_path().display(),
        error = %message,
        "Task join failed"
    );
    let outcome = TaskOutcome::failed(task.sequence_index(), message);
    report_completed(reporter, task, outcome.clone());
    outcome
}

/// Run one task, turning a panic into a failed outcome.
fn run_isolated(
    pipeline: &ImagePipeline,
    task: &Task,
    reporter: &ProgressReporter,
) -> TaskOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| pipeline.process(task, reporter))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = format!("panicked: {}", panic_message(payload.as_ref()));
            error!(
                task = task.sequence_index(),
                source = %task.source_path().display(),
                error = %message,
                "Task panicked"
            );
            let outcome = TaskOutcome::failed(task.sequence_index(), message);
            report_completed(reporter, task, outcome.clone());
            outcome
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
