//! Single-consumer aggregation of progress events.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::task::TaskOutcome;

use super::{ProgressEvent, ProgressReporter, ProgressSink, ProgressSnapshot, RunSummary};

/// Owns the run counters and the output sink.
///
/// Created with [`start`](Self::start), which spawns the consumer task on
/// the current tokio runtime. Hand [`reporter`](Self::reporter) clones to
/// workers, then call [`finish`](Self::finish) once the scheduler returns.
pub struct ResultAggregator {
    total: usize,
    reporter: ProgressReporter,
    snapshot_rx: watch::Receiver<ProgressSnapshot>,
    handle: JoinHandle<RunSummary>,
}

impl ResultAggregator {
    /// Spawn the consumer task for a run of `total` tasks.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<S: ProgressSink>(total: usize, sink: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(ProgressSnapshot::new(total));
        let handle = tokio::spawn(consume(RunState::new(total), rx, sink, snapshot_tx));

        Self {
            total,
            reporter: ProgressReporter::new(tx),
            snapshot_rx,
            handle,
        }
    }

    /// A new handle for sending events.
    pub fn reporter(&self) -> ProgressReporter {
        self.reporter.clone()
    }

    /// Counts as of the most recently processed event.
    pub fn snapshot(&self) -> ProgressSnapshot {
        *self.snapshot_rx.borrow()
    }

    /// Receiver notified after every processed event.
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Wait for all outstanding events and return the final tally.
    ///
    /// Every reporter handed out must have been dropped, otherwise this
    /// waits for them.
    pub async fn finish(self) -> RunSummary {
        let Self {
            total,
            reporter,
            handle,
            ..
        } = self;
        drop(reporter);

        match handle.await {
            Ok(summary) => summary,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                warn!(error = %e, "Progress aggregator was cancelled");
                RunSummary::from_outcomes(total, Vec::new())
            }
        }
    }
}

async fn consume<S: ProgressSink>(
    mut state: RunState,
    mut rx: mpsc::UnboundedReceiver<ProgressEvent>,
    mut sink: S,
    snapshot_tx: watch::Sender<ProgressSnapshot>,
) -> RunSummary {
    while let Some(event) = rx.recv().await {
        match state.apply(event) {
            Some(Line::Info(line)) => sink.emit(&line),
            Some(Line::Error(line)) => sink.emit_error(&line),
            None => {}
        }
        sink.update(&state.snapshot);
        snapshot_tx.send_replace(state.snapshot);
    }

    sink.close();
    debug!(
        completed = state.snapshot.completed,
        failed = state.snapshot.failed,
        "Progress aggregator finished"
    );
    RunSummary::from_outcomes(state.snapshot.total, state.outcomes)
}

/// A rendered progress line.
enum Line {
    Info(String),
    Error(String),
}

/// Counters and outcomes owned by the consumer task.
struct RunState {
    snapshot: ProgressSnapshot,
    outcomes: Vec<TaskOutcome>,
}

impl RunState {
    fn new(total: usize) -> Self {
        Self {
            snapshot: ProgressSnapshot::new(total),
            outcomes: Vec::with_capacity(total),
        }
    }

    /// Update counters and render the line for `event`, if it has one.
    fn apply(&mut self, event: ProgressEvent) -> Option<Line> {
        match event {
            ProgressEvent::Started {
                sequence_index,
                source,
                source_width,
                source_height,
                canvas,
            } => Some(Line::Info(format!(
                "[{}] {}: {}x{} -> {}x{}",
                sequence_index + 1,
                source.display(),
                source_width,
                source_height,
                canvas,
                canvas
            ))),
            ProgressEvent::Archiving { .. } => {
                Some(Line::Info("  Merging tiles to binary...".to_string()))
            }
            ProgressEvent::Warning {
                source, message, ..
            } => Some(Line::Info(format!(
                "  [WARN] {}: {}",
                source.display(),
                message
            ))),
            ProgressEvent::Completed {
                source,
                dest,
                outcome,
            } => {
                self.snapshot.completed += 1;
                let line = if outcome.success {
                    self.snapshot.succeeded += 1;
                    Line::Info(format!(
                        "[{}/{}] ✓ {} -> {} ({} tiles)",
                        self.snapshot.completed,
                        self.snapshot.total,
                        source.display(),
                        dest.display(),
                        outcome.tile_count
                    ))
                } else {
                    self.snapshot.failed += 1;
                    Line::Error(format!(
                        "[ERROR] {}: {}",
                        source.display(),
                        outcome.error_message.as_deref().unwrap_or("unknown error")
                    ))
                };
                self.outcomes.push(outcome);
                Some(line)
            }
        }
    }
}
