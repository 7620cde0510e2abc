//! Destinations for rendered progress lines.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::ProgressSnapshot;

/// Receives progress lines from the aggregator's consumer task.
///
/// Only one task ever calls a sink, so implementations need no locking of
/// their own.
pub trait ProgressSink: Send + 'static {
    /// Emit one complete line (without trailing newline).
    fn emit(&mut self, line: &str);

    /// Emit a line reporting a failed task. Defaults to [`emit`](Self::emit).
    fn emit_error(&mut self, line: &str) {
        self.emit(line);
    }

    /// Called after every event with the updated counts.
    fn update(&mut self, _snapshot: &ProgressSnapshot) {}

    /// Called once when the run is over.
    fn close(&mut self) {}
}

/// Writes each line to an [`io::Write`] and flushes.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write + Send + 'static> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    /// Sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> ProgressSink for WriterSink<W> {
    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.writer, "{}", line).and_then(|_| self.writer.flush()) {
            debug!(error = %e, "Failed to write progress line");
        }
    }
}

/// Collects lines in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines emitted so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ProgressSink for MemorySink {
    fn emit(&mut self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}
