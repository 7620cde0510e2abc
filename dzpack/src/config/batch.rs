//! Batch run configuration.

use super::defaults::{
    default_workers, BLANK_TILE_NAME, CONTAINER_NAME, DEFAULT_QUALITY, DEFAULT_TILE_EXTENSIONS,
    DEFAULT_TILE_SIZE, MAX_QUALITY, MIN_QUALITY, SIDECAR_NAME,
};
use super::{ConfigError, TileFormat};

/// Configuration consumed by the tiling pipeline and scheduler.
///
/// Construct with [`BatchConfig::default`] and refine with the `with_*`
/// builder methods. Call [`validate`](Self::validate) before starting a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Tile edge length in pixels.
    tile_size: u32,
    /// Output tile format.
    format: TileFormat,
    /// Quality for lossy formats (1-100).
    quality: u8,
    /// Maximum number of images processed concurrently.
    workers: usize,
    /// Keep the per-tile directory tree after archiving.
    keep_tiles: bool,
    /// Extensions (lowercase, no dot) recognised as tile files.
    tile_extensions: Vec<String>,
    /// File name of the container written into each output folder.
    container_name: String,
    /// File name of the sidecar written into each output folder.
    sidecar_name: String,
    /// File name of the placeholder tile removed on discard.
    blank_tile_name: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            format: TileFormat::default(),
            quality: DEFAULT_QUALITY,
            workers: default_workers(),
            keep_tiles: false,
            tile_extensions: DEFAULT_TILE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            container_name: CONTAINER_NAME.to_string(),
            sidecar_name: SIDECAR_NAME.to_string(),
            blank_tile_name: BLANK_TILE_NAME.to_string(),
        }
    }
}

impl BatchConfig {
    /// Set the tile size.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the tile format.
    pub fn with_format(mut self, format: TileFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the lossy quality.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Keep or discard the per-tile tree after archiving.
    pub fn with_keep_tiles(mut self, keep_tiles: bool) -> Self {
        self.keep_tiles = keep_tiles;
        self
    }

    /// Replace the list of recognised tile extensions.
    pub fn with_tile_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tile_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Tile edge length in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Output tile format.
    pub fn format(&self) -> TileFormat {
        self.format
    }

    /// Quality for lossy formats.
    ///
    /// Returns `None` for lossless formats where quality has no meaning.
    pub fn quality(&self) -> Option<u8> {
        self.format.is_lossy().then_some(self.quality)
    }

    /// Raw quality value regardless of format.
    pub fn raw_quality(&self) -> u8 {
        self.quality
    }

    /// Maximum number of concurrently running image jobs.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Whether the per-tile tree survives archiving.
    pub fn keep_tiles(&self) -> bool {
        self.keep_tiles
    }

    /// Recognised tile extensions (lowercase, no dot).
    pub fn tile_extensions(&self) -> &[String] {
        &self.tile_extensions
    }

    /// Container file name.
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Sidecar file name.
    pub fn sidecar_name(&self) -> &str {
        &self.sidecar_name
    }

    /// Placeholder tile file name.
    pub fn blank_tile_name(&self) -> &str {
        &self.blank_tile_name
    }

    /// Check all settings are within their accepted ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "tile_size",
                reason: "must be positive".to_string(),
            });
        }
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.quality) {
            return Err(ConfigError::InvalidSetting {
                field: "quality",
                reason: format!(
                    "must be between {} and {}, got {}",
                    MIN_QUALITY, MAX_QUALITY, self.quality
                ),
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "workers",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.tile_extensions.is_empty() {
            return Err(ConfigError::InvalidSetting {
                field: "tile_extensions",
                reason: "at least one extension is required".to_string(),
            });
        }
        Ok(())
    }
}
