//! Tile output formats.

use std::fmt;
use std::str::FromStr;

use super::ConfigError;

/// Image format the tiler writes individual tiles in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileFormat {
    /// Lossless PNG tiles.
    Png,
    /// JPEG tiles with the `.jpg` suffix (default).
    #[default]
    Jpg,
    /// JPEG tiles with the `.jpeg` suffix.
    Jpeg,
}

impl TileFormat {
    /// File suffix including the leading dot (e.g. `.jpg`).
    pub fn suffix(&self) -> &'static str {
        match self {
            TileFormat::Png => ".png",
            TileFormat::Jpg => ".jpg",
            TileFormat::Jpeg => ".jpeg",
        }
    }

    /// Whether the quality setting applies to this format.
    pub fn is_lossy(&self) -> bool {
        matches!(self, TileFormat::Jpg | TileFormat::Jpeg)
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for TileFormat {
    type Err = ConfigError;

    /// Accepts `png`, `jpg`, `jpeg`, with or without the leading dot.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('.').to_lowercase();
        match normalized.as_str() {
            "png" => Ok(TileFormat::Png),
            "jpg" => Ok(TileFormat::Jpg),
            "jpeg" => Ok(TileFormat::Jpeg),
            _ => Err(ConfigError::InvalidSetting {
                field: "suffix",
                reason: format!("'{}' is not one of .png, .jpg, .jpeg", s),
            }),
        }
    }
}
