//! Logging setup for dzpack.
//!
//! Two outputs are installed:
//! - a plain-text log file (truncated at session start), filtered by
//!   `RUST_LOG` and defaulting to `info`
//! - stderr, showing warnings only unless verbose mode is on
//!
//! Standard output is left to the progress lines.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Keeps the background log writer alive.
///
/// Dropping it flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
    log_path: PathBuf,
}

impl LoggingGuard {
    /// Path of the active log file.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

/// Install the global subscriber.
///
/// Call once, early, before any runtime threads are started so the local
/// UTC offset can be determined.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the log file
/// cannot be truncated.
pub fn init_logging(log_dir: &Path, log_file: &str, verbose: bool) -> io::Result<LoggingGuard> {
    let log_path = prepare_log_file(log_dir, log_file)?;

    let timer = OffsetTime::local_rfc_3339()
        .unwrap_or_else(|_| OffsetTime::new(UtcOffset::UTC, Rfc3339));

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_timer(timer.clone())
        .with_thread_ids(true)
        .with_filter(env_filter);

    let stderr_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_timer(timer)
        .with_target(false)
        .compact()
        .with_filter(stderr_level);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
        log_path,
    })
}

/// Create the log directory and truncate the log file.
fn prepare_log_file(log_dir: &Path, log_file: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file);
    fs::write(&log_path, "")?;
    Ok(log_path)
}

/// Default log directory.
pub fn default_log_dir() -> &'static str {
    "logs"
}

/// Default log file name.
pub fn default_log_file() -> &'static str {
    "dzpack.log"
}
