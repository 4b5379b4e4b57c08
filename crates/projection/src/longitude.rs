//! Longitude wraparound.
//!
//! GFS grids start at 0°E. Clients sample textures whose left edge is the
//! antimeridian (180°W), so every output column is read from half a grid
//! width further along.

/// Source column for output column `x` on a grid `width` points wide.
///
/// Any `x` is accepted; columns beyond the width wrap around.
#[inline]
pub fn source_column(x: usize, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    (x % width + width / 2) % width
}

/// Longitude in degrees east (-180..180) of output column `x`.
pub fn column_longitude(x: usize, width: usize) -> f64 {
    if width == 0 {
        return -180.0;
    }
    -180.0 + 360.0 * (x % width) as f64 / width as f64
}
