//! Canvas and level geometry.

/// Square canvas edge for an image: the smallest power of two that is at
/// least the larger of `width` and `height`.
///
/// Returns `None` if that value does not fit in a `u32`.
pub fn canvas_size(width: u32, height: u32) -> Option<u32> {
    width.max(height).max(1).checked_next_power_of_two()
}

/// Deepest level index so that level 0 fits in a single tile.
pub fn max_level(canvas: u32, tile_size: u32) -> u32 {
    let mut level = 0;
    let mut covered = u64::from(tile_size.max(1));
    while covered < u64::from(canvas) {
        covered *= 2;
        level += 1;
    }
    level
}

/// Edge length of `level` when `max_level` is the full-resolution canvas.
pub fn level_size(canvas: u32, max_level: u32, level: u32) -> u32 {
    let shift = max_level.saturating_sub(level);
    canvas.checked_shr(shift).unwrap_or(0).max(1)
}

/// Number of tiles along one edge of a level.
pub fn tiles_per_side(size: u32, tile_size: u32) -> u32 {
    size.div_ceil(tile_size.max(1))
}
