//! Events sent from workers to the aggregator.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::trace;

use crate::task::TaskOutcome;

/// Something worth reporting about one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The source was decoded and tiled onto a canvas.
    Started {
        sequence_index: usize,
        source: PathBuf,
        source_width: u32,
        source_height: u32,
        canvas: u32,
    },
    /// Tiles are being merged into the container.
    Archiving { sequence_index: usize },
    /// Non-fatal problem, such as a failed cleanup.
    Warning {
        sequence_index: usize,
        source: PathBuf,
        message: String,
    },
    /// The task produced its outcome.
    Completed {
        source: PathBuf,
        dest: PathBuf,
        outcome: TaskOutcome,
    },
}

/// Cloneable handle workers use to send [`ProgressEvent`]s.
///
/// Sending never blocks. Events sent after the aggregator has stopped are
/// dropped.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressReporter {
    pub(crate) fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// A reporter whose events go nowhere.
    pub fn disconnected() -> Self {
        let (tx, _rx) = mpsc::unbounded_channel();
        Self { tx }
    }

    pub fn report(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            trace!("Progress event dropped, aggregator closed");
        }
    }
}
