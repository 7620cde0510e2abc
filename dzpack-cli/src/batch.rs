//! Configuration resolution and the batch run itself.

use std::path::PathBuf;
use std::sync::Arc;

use dzpack::config::{BatchConfig, ConfigFile, TileFormat};
use dzpack::pipeline::ImagePipeline;
use dzpack::progress::{ResultAggregator, RunSummary};
use dzpack::scheduler::TaskScheduler;
use dzpack::task::Task;
use dzpack::tiler::ImageTiler;
use tracing::info;

use crate::display::ConsoleSink;
use crate::error::CliError;

/// Settings given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub tile_size: Option<u32>,
    pub format: Option<TileFormat>,
    pub quality: Option<u8>,
    pub workers: Option<usize>,
    pub keep_tiles: bool,
}

/// Resolve the effective configuration: flags over INI file over defaults.
pub fn resolve_config(overrides: &Overrides) -> Result<BatchConfig, CliError> {
    let mut config = BatchConfig::default();

    if let Some(path) = &overrides.config_file {
        config = ConfigFile::load_from(path)?.apply(config);
    }
    if let Some(tile_size) = overrides.tile_size {
        config = config.with_tile_size(tile_size);
    }
    if let Some(format) = overrides.format {
        config = config.with_format(format);
    }
    if let Some(quality) = overrides.quality {
        config = config.with_quality(quality);
    }
    if let Some(workers) = overrides.workers {
        config = config.with_workers(workers);
    }
    if overrides.keep_tiles {
        config = config.with_keep_tiles(true);
    }

    config.validate()?;
    Ok(config)
}

/// Run every task and return the final tally.
pub async fn run_batch(tasks: Vec<Task>, config: &BatchConfig, show_bar: bool) -> RunSummary {
    let total = tasks.len();
    let aggregator = ResultAggregator::start(total, ConsoleSink::new(total, show_bar));
    let pipeline = Arc::new(ImagePipeline::new(Arc::new(ImageTiler::new()), config));
    let scheduler = TaskScheduler::new(pipeline, config.workers());

    scheduler.run(tasks, aggregator.reporter()).await;
    let summary = aggregator.finish().await;

    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Run complete"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_overrides() {
        let config = resolve_config(&Overrides::default()).unwrap();
        assert_eq!(config.tile_size(), 512);
        assert_eq!(config.format(), TileFormat::Jpg);
        assert!(!config.keep_tiles());
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dzpack.ini");
        std::fs::write(
            &path,
            "[tiles]\nsize = 128\nformat = png\nkeep = true\n\n[scheduler]\nworkers = 2\n",
        )
        .unwrap();

        let overrides = Overrides {
            config_file: Some(path),
            tile_size: Some(256),
            ..Default::default()
        };
        let config = resolve_config(&overrides).unwrap();

        assert_eq!(config.tile_size(), 256);
        assert_eq!(config.format(), TileFormat::Png);
        assert_eq!(config.workers(), 2);
        assert!(config.keep_tiles());
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let temp = TempDir::new().unwrap();
        let overrides = Overrides {
            config_file: Some(temp.path().join("missing.ini")),
            ..Default::default()
        };
        assert!(matches!(
            resolve_config(&overrides),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_tile_size_rejected() {
        let overrides = Overrides {
            tile_size: Some(0),
            ..Default::default()
        };
        assert!(resolve_config(&overrides).is_err());
    }
}
