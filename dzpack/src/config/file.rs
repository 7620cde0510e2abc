//! Optional INI configuration file.
//!
//! ```ini
//! [tiles]
//! size = 256
//! format = png
//! quality = 90
//! keep = false
//!
//! [scheduler]
//! workers = 8
//! ```
//!
//! Every key is optional. Values found in the file override defaults and are
//! in turn overridden by explicit CLI flags.

use std::path::Path;
use std::str::FromStr;

use ini::Ini;

use super::{BatchConfig, ConfigError, TileFormat};

const POSITIVE_INTEGER: &str = "must be a positive integer";

/// Settings read from an INI file. `None` means "not set in the file".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub tile_size: Option<u32>,
    pub format: Option<TileFormat>,
    pub quality: Option<u8>,
    pub keep_tiles: Option<bool>,
    pub workers: Option<usize>,
}

impl ConfigFile {
    /// Load settings from the given path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let ini = Ini::load_from_file(path)?;
        Self::from_ini(&ini)
    }

    /// Parse settings from INI text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let ini =
            Ini::load_from_str(content).map_err(|e| ConfigError::ReadError(ini::Error::Parse(e)))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut file = ConfigFile::default();

        if let Some(section) = ini.section(Some("tiles")) {
            if let Some(v) = section.get("size") {
                file.tile_size = Some(parse_value("tiles", "size", v, POSITIVE_INTEGER)?);
            }
            if let Some(v) = section.get("format") {
                let format = TileFormat::from_str(v)
                    .map_err(|_| invalid("tiles", "format", v, "must be one of: png, jpg, jpeg"))?;
                file.format = Some(format);
            }
            if let Some(v) = section.get("quality") {
                file.quality = Some(parse_value(
                    "tiles",
                    "quality",
                    v,
                    "must be between 1 and 100",
                )?);
            }
            if let Some(v) = section.get("keep") {
                file.keep_tiles = Some(parse_bool("tiles", "keep", v)?);
            }
        }

        if let Some(section) = ini.section(Some("scheduler")) {
            if let Some(v) = section.get("workers") {
                file.workers = Some(parse_value("scheduler", "workers", v, POSITIVE_INTEGER)?);
            }
        }

        Ok(file)
    }

    /// Overlay the values present in this file onto `config`.
    pub fn apply(&self, mut config: BatchConfig) -> BatchConfig {
        if let Some(size) = self.tile_size {
            config = config.with_tile_size(size);
        }
        if let Some(format) = self.format {
            config = config.with_format(format);
        }
        if let Some(quality) = self.quality {
            config = config.with_quality(quality);
        }
        if let Some(keep) = self.keep_tiles {
            config = config.with_keep_tiles(keep);
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        config
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    v: &str,
    reason: &str,
) -> Result<T, ConfigError> {
    v.trim().parse().map_err(|_| invalid(section, key, v, reason))
}

fn parse_bool(section: &str, key: &str, v: &str) -> Result<bool, ConfigError> {
    match v.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(invalid(section, key, v, "must be true or false")),
    }
}
