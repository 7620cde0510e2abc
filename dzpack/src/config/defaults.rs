//! Default values for batch configuration.

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 512;

/// Default quality for lossy tile formats.
pub const DEFAULT_QUALITY: u8 = 85;

/// Lowest accepted quality value.
pub const MIN_QUALITY: u8 = 1;

/// Highest accepted quality value.
pub const MAX_QUALITY: u8 = 100;

/// Worker count used when the host parallelism cannot be determined.
pub const FALLBACK_WORKERS: usize = 4;

/// Name of the single container file produced per image.
pub const CONTAINER_NAME: &str = "tiles_000.binz";

/// Name of the JSON sidecar produced per image.
pub const SIDECAR_NAME: &str = "metadata.json";

/// Placeholder tile the tiler may leave at the pyramid root.
pub const BLANK_TILE_NAME: &str = "blank.png";

/// Tile file extensions picked up by the archiver (compared case-insensitively).
pub const DEFAULT_TILE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Number of workers to use when none is configured.
///
/// Uses the host's available parallelism, falling back to
/// [`FALLBACK_WORKERS`] when it cannot be determined.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(FALLBACK_WORKERS)
}
