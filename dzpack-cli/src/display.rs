//! Console output: banner, live progress and final summary.

use std::io::IsTerminal;

use console::style;
use dzpack::config::BatchConfig;
use dzpack::progress::{ProgressSink, ProgressSnapshot, RunSummary};
use indicatif::{ProgressBar, ProgressStyle};

/// Prints progress lines to stdout and failures to stderr, above an
/// optional progress bar on stderr.
pub struct ConsoleSink {
    bar: Option<ProgressBar>,
}

impl ConsoleSink {
    /// The bar is only shown when requested and stderr is a terminal.
    pub fn new(total: usize, show_bar: bool) -> Self {
        let bar = (show_bar && std::io::stderr().is_terminal()).then(|| {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
            );
            bar
        });
        Self { bar }
    }
}

impl ProgressSink for ConsoleSink {
    fn emit(&mut self, line: &str) {
        match &self.bar {
            Some(bar) => bar.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }

    fn emit_error(&mut self, line: &str) {
        match &self.bar {
            Some(bar) => bar.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }

    fn update(&mut self, snapshot: &ProgressSnapshot) {
        if let Some(bar) = &self.bar {
            bar.set_position(snapshot.completed as u64);
            if snapshot.failed > 0 {
                bar.set_message(format!("({} failed)", snapshot.failed));
            }
        }
    }

    fn close(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Configuration banner printed before processing starts.
pub fn banner(config: &BatchConfig, task_count: usize) -> String {
    format!(
        "Configuration:\n  Tile size: {}\n  Format: {}\n  JPEG quality: {}\n  Threads: {}\n  Keep tiles: {}\n\nProcessing {} images...\n",
        config.tile_size(),
        config.format(),
        config.raw_quality(),
        config.workers(),
        if config.keep_tiles() { "yes" } else { "no" },
        task_count
    )
}

pub fn print_banner(config: &BatchConfig, task_count: usize) {
    println!("{}", banner(config, task_count));
}

/// Final summary lines.
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("Completed: {}/{} images", summary.succeeded, summary.total);

    if summary.all_succeeded() {
        println!("{}", style("All images processed successfully!").green());
    } else {
        let missing = summary.total - summary.succeeded;
        eprintln!(
            "{}",
            style(format!("Warning: {} images failed to process", missing)).yellow()
        );
    }
}
