//! The pyramid generation capability.

use std::path::Path;

use crate::config::{BatchConfig, TileFormat};

use super::TilerError;

/// Tiles whose channels all lie within this distance of white are blank.
pub const DEFAULT_BLANK_THRESHOLD: u8 = 5;

/// Parameters for one pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyramidOptions {
    /// Square tile edge in pixels.
    pub tile_size: u32,
    /// Tile file format.
    pub format: TileFormat,
    /// Encoder quality, `None` for lossless formats.
    pub quality: Option<u8>,
    /// Blank-tile elision threshold, `None` to write every tile.
    pub skip_blanks: Option<u8>,
}

impl PyramidOptions {
    /// Options for a batch run. Blank elision is always on.
    pub fn from_config(config: &BatchConfig) -> Self {
        Self {
            tile_size: config.tile_size(),
            format: config.format(),
            quality: config.quality(),
            skip_blanks: Some(DEFAULT_BLANK_THRESHOLD),
        }
    }
}

/// Dimensions reported after a pyramid was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyramidInfo {
    /// Width of the decoded source image.
    pub source_width: u32,
    /// Height of the decoded source image.
    pub source_height: u32,
    /// Width of the tiled canvas.
    pub width: u32,
    /// Height of the tiled canvas.
    pub height: u32,
}

/// Something that turns one image into a tile tree.
///
/// Implementations write `dest/{level}/{row}/{column}{suffix}` and may also
/// write a placeholder blank tile at `dest`. They are invoked concurrently
/// for different images and must be thread-safe.
pub trait PyramidGenerator: Send + Sync {
    /// Generate the pyramid for `source` under `dest`.
    ///
    /// # Errors
    ///
    /// Any failure is returned as a [`TilerError`]; the caller records it
    /// against the image and moves on.
    fn generate_pyramid(
        &self,
        source: &Path,
        dest: &Path,
        options: &PyramidOptions,
    ) -> Result<PyramidInfo, TilerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct MockGenerator {
        should_fail: bool,
    }

    impl PyramidGenerator for MockGenerator {
        fn generate_pyramid(
            &self,
            _source: &Path,
            _dest: &Path,
            options: &PyramidOptions,
        ) -> Result<PyramidInfo, TilerError> {
            if self.should_fail {
                return Err(TilerError::Failed("mock failure".to_string()));
            }
            Ok(PyramidInfo {
                source_width: 10,
                source_height: 10,
                width: options.tile_size,
                height: options.tile_size,
            })
        }
    }

    #[test]
    fn test_options_from_config() {
        let config = BatchConfig::default().with_tile_size(256).with_quality(70);
        let options = PyramidOptions::from_config(&config);
        assert_eq!(options.tile_size, 256);
        assert_eq!(options.format, TileFormat::Jpg);
        assert_eq!(options.quality, Some(70));
        assert_eq!(options.skip_blanks, Some(DEFAULT_BLANK_THRESHOLD));
    }

    #[test]
    fn test_options_lossless_has_no_quality() {
        let config = BatchConfig::default().with_format(TileFormat::Png);
        assert_eq!(PyramidOptions::from_config(&config).quality, None);
    }

    #[test]
    fn test_trait_object_generate() {
        let generator: Arc<dyn PyramidGenerator> = Arc::new(MockGenerator { should_fail: false });
        let options = PyramidOptions::from_config(&BatchConfig::default());
        let info = generator
            .generate_pyramid(Path::new("a.png"), Path::new("out"), &options)
            .unwrap();
        assert_eq!(info.width, 512);
    }

    #[test]
    fn test_trait_object_failure() {
        let generator: Arc<dyn PyramidGenerator> = Arc::new(MockGenerator { should_fail: true });
        let options = PyramidOptions::from_config(&BatchConfig::default());
        let err = generator
            .generate_pyramid(Path::new("a.png"), Path::new("out"), &options)
            .unwrap_err();
        assert_eq!(err.to_string(), "mock failure");
    }

    #[test]
    fn test_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn PyramidGenerator>();
    }
}
