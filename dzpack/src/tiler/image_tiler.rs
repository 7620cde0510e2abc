//! Pyramid generator built on the `image` crate.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{GenericImageView, Rgb, RgbImage};
use rayon::prelude::*;
use tracing::debug;

use crate::config::defaults::{BLANK_TILE_NAME, DEFAULT_QUALITY};
use crate::config::TileFormat;

use super::sizing::{canvas_size, level_size, max_level, tiles_per_side};
use super::{PyramidGenerator, PyramidInfo, PyramidOptions, TilerError};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Writes Google-layout deep-zoom pyramids.
///
/// The source is stretched independently on each axis to a square
/// power-of-two canvas, then cut into `tile_size` tiles at every level from
/// the full canvas down to the level that fits in one tile. Tiles at the
/// edge of a level smaller than a tile are padded with white.
#[derive(Debug, Clone)]
pub struct ImageTiler {
    resize_filter: FilterType,
    level_filter: FilterType,
}

impl Default for ImageTiler {
    fn default() -> Self {
        Self {
            resize_filter: FilterType::Lanczos3,
            level_filter: FilterType::Triangle,
        }
    }
}

impl ImageTiler {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_level(
        &self,
        level_image: &RgbImage,
        level_dir: &Path,
        options: &PyramidOptions,
    ) -> Result<usize, TilerError> {
        let tile = options.tile_size;
        let per_side = tiles_per_side(level_image.width(), tile);

        for row in 0..per_side {
            let row_dir = level_dir.join(row.to_string());
            fs::create_dir_all(&row_dir).map_err(|source| TilerError::CreateFailed {
                path: row_dir.clone(),
                source,
            })?;
        }

        let written: Vec<bool> = (0..per_side * per_side)
            .into_par_iter()
            .map(|i| -> Result<bool, TilerError> {
                let (row, column) = (i / per_side, i % per_side);
                let tile_image = cut_tile(level_image, column * tile, row * tile, tile);
                if let Some(threshold) = options.skip_blanks {
                    if is_blank(&tile_image, threshold) {
                        return Ok(false);
                    }
                }
                let path = level_dir
                    .join(row.to_string())
                    .join(format!("{}{}", column, options.format.suffix()));
                save_tile(&tile_image, &path, options)?;
                Ok(true)
            })
            .collect::<Result<_, _>>()?;

        Ok(written.into_iter().filter(|w| *w).count())
    }
}

impl PyramidGenerator for ImageTiler {
    fn generate_pyramid(
        &self,
        source: &Path,
        dest: &Path,
        options: &PyramidOptions,
    ) -> Result<PyramidInfo, TilerError> {
        let image = image::open(source).map_err(|e| TilerError::Decode {
            path: source.to_path_buf(),
            source: e,
        })?;
        let (source_width, source_height) = image.dimensions();
        if source_width == 0 || source_height == 0 {
            return Err(TilerError::EmptyImage {
                path: source.to_path_buf(),
            });
        }

        let canvas = canvas_size(source_width, source_height).ok_or_else(|| {
            TilerError::Failed(format!(
                "{}x{} is too large to tile",
                source_width, source_height
            ))
        })?;
        let canvas_image = image
            .resize_exact(canvas, canvas, self.resize_filter)
            .to_rgb8();
        drop(image);

        fs::create_dir_all(dest).map_err(|e| TilerError::CreateFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        let deepest = max_level(canvas, options.tile_size);
        let mut written = 0;
        for level in 0..=deepest {
            let size = level_size(canvas, deepest, level);
            let scaled;
            let level_image = if size == canvas {
                &canvas_image
            } else {
                scaled = imageops::resize(&canvas_image, size, size, self.level_filter);
                &scaled
            };
            written += self.write_level(level_image, &dest.join(level.to_string()), options)?;
        }

        if options.skip_blanks.is_some() {
            let blank = RgbImage::from_pixel(options.tile_size, options.tile_size, BACKGROUND);
            let png = PyramidOptions {
                format: TileFormat::Png,
                quality: None,
                ..*options
            };
            save_tile(&blank, &dest.join(BLANK_TILE_NAME), &png)?;
        }

        debug!(
            source = %source.display(),
            dest = %dest.display(),
            canvas,
            levels = deepest + 1,
            tiles = written,
            "Pyramid written"
        );

        Ok(PyramidInfo {
            source_width,
            source_height,
            width: canvas,
            height: canvas,
        })
    }
}

/// Copy a `tile`-sized square at (`x`, `y`), padding past the edge.
fn cut_tile(level: &RgbImage, x: u32, y: u32, tile: u32) -> RgbImage {
    let width = tile.min(level.width() - x);
    let height = tile.min(level.height() - y);
    let cropped = imageops::crop_imm(level, x, y, width, height).to_image();
    if width == tile && height == tile {
        return cropped;
    }
    let mut padded = RgbImage::from_pixel(tile, tile, BACKGROUND);
    imageops::replace(&mut padded, &cropped, 0, 0);
    padded
}

fn is_blank(tile: &RgbImage, threshold: u8) -> bool {
    let floor = 255 - threshold;
    tile.as_raw().iter().all(|&c| c >= floor)
}

fn save_tile(tile: &RgbImage, path: &Path, options: &PyramidOptions) -> Result<(), TilerError> {
    let file = File::create(path).map_err(|source| TilerError::CreateFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let writer = BufWriter::new(file);
    let encode_failed = |source: image::ImageError| TilerError::EncodeFailed {
        path: PathBuf::from(path),
        source,
    };

    match options.format {
        TileFormat::Png => tile
            .write_with_encoder(PngEncoder::new(writer))
            .map_err(encode_failed),
        TileFormat::Jpg | TileFormat::Jpeg => {
            let quality = options.quality.unwrap_or(DEFAULT_QUALITY);
            tile.write_with_encoder(JpegEncoder::new_with_quality(writer, quality))
                .map_err(encode_failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BatchConfig;
    use tempfile::TempDir;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 200) as u8])
        })
    }

    fn options(tile_size: u32, format: TileFormat) -> PyramidOptions {
        PyramidOptions::from_config(
            &BatchConfig::default()
                .with_tile_size(tile_size)
                .with_format(format),
        )
    }

    #[test]
    fn test_generates_power_of_two_pyramid() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.png");
        gradient(300, 200).save(&source).unwrap();
        let dest = temp.path().join("out");

        let info = ImageTiler::new()
            .generate_pyramid(&source, &dest, &options(256, TileFormat::Jpg))
            .unwrap();

        assert_eq!((info.source_width, info.source_height), (300, 200));
        assert_eq!((info.width, info.height), (512, 512));
        assert!(dest.join("0/0/0.jpg").is_file());
        for tile in ["1/0/0.jpg", "1/0/1.jpg", "1/1/0.jpg", "1/1/1.jpg"] {
            assert!(dest.join(tile).is_file(), "missing {}", tile);
        }
        assert!(!dest.join("2").exists());
        assert!(dest.join("blank.png").is_file());
    }

    #[test]
    fn test_tiles_are_full_size() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("small.png");
        gradient(40, 30).save(&source).unwrap();
        let dest = temp.path().join("out");

        let info = ImageTiler::new()
            .generate_pyramid(&source, &dest, &options(256, TileFormat::Png))
            .unwrap();

        assert_eq!(info.width, 64);
        let tile = image::open(dest.join("0/0/0.png")).unwrap();
        assert_eq!(tile.dimensions(), (256, 256));
    }

    #[test]
    fn test_white_image_elides_all_tiles() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("white.png");
        RgbImage::from_pixel(100, 100, BACKGROUND)
            .save(&source)
            .unwrap();
        let dest = temp.path().join("out");

        ImageTiler::new()
            .generate_pyramid(&source, &dest, &options(64, TileFormat::Png))
            .unwrap();

        assert!(!dest.join("0/0/0.png").exists());
        assert!(!dest.join("1/1/1.png").exists());
        assert!(dest.join("blank.png").is_file());
    }

    #[test]
    fn test_without_elision_writes_every_tile() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("white.png");
        RgbImage::from_pixel(100, 100, BACKGROUND)
            .save(&source)
            .unwrap();
        let dest = temp.path().join("out");
        let opts = PyramidOptions {
            skip_blanks: None,
            ..options(64, TileFormat::Png)
        };

        ImageTiler::new().generate_pyramid(&source, &dest, &opts).unwrap();

        assert!(dest.join("0/0/0.png").is_file());
        assert!(dest.join("1/1/1.png").is_file());
        assert!(!dest.join("blank.png").exists());
    }

    #[test]
    fn test_corrupt_source_is_decode_error() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("broken.png");
        fs::write(&source, b"\x89PNG\r\n\x1a\nnot really").unwrap();

        let err = ImageTiler::new()
            .generate_pyramid(&source, &temp.path().join("out"), &options(256, TileFormat::Jpg))
            .unwrap_err();

        assert!(matches!(err, TilerError::Decode { .. }));
        assert!(err.to_string().contains("broken.png"));
    }

    #[test]
    fn test_missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let result = ImageTiler::new().generate_pyramid(
            &temp.path().join("nope.jpg"),
            &temp.path().join("out"),
            &options(256, TileFormat::Jpg),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_is_blank_threshold() {
        let near_white = RgbImage::from_pixel(4, 4, Rgb([251, 252, 255]));
        assert!(is_blank(&near_white, 5));
        assert!(!is_blank(&near_white, 3));
    }

    #[test]
    fn test_cut_tile_pads_edges() {
        let level = gradient(100, 100);
        let tile = cut_tile(&level, 64, 64, 64);
        assert_eq!(tile.dimensions(), (64, 64));
        assert_eq!(*tile.get_pixel(63, 63), BACKGROUND);
        assert_eq!(*tile.get_pixel(0, 0), *level.get_pixel(64, 64));
    }
}
