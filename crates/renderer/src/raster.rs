//! RGBA rasters and channel normalization.

use rayon::prelude::*;

use forecast_common::ForecastResult;

use crate::png::create_png;

/// Minimum pixels to benefit from parallel row filling
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

/// An 8-bit RGBA image held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Build a raster by evaluating `pixel(x, y)` for every pixel.
    ///
    /// Rows are filled in parallel for larger images.
    pub fn from_fn<F>(width: usize, height: usize, pixel: F) -> Self
    where
        F: Fn(usize, usize) -> [u8; 4] + Sync,
    {
        let mut pixels = vec![0u8; width * height * 4];
        let stride = (width * 4).max(1);

        let fill_row = |(y, row): (usize, &mut [u8])| {
            for (x, rgba) in row.chunks_exact_mut(4).enumerate() {
                rgba.copy_from_slice(&pixel(x, y));
            }
        };

        if width * height >= PARALLEL_THRESHOLD {
            pixels.par_chunks_mut(stride).enumerate().for_each(fill_row);
        } else {
            pixels.chunks_mut(stride).enumerate().for_each(fill_row);
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    /// RGBA value at (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn to_png(&self) -> ForecastResult<Vec<u8>> {
        create_png(&self.pixels, self.width, self.height)
    }
}

/// Position of `value` within [min, max] as a ratio in [0, 1].
///
/// Constant fields (max == min) and NaN map to 0.
#[inline]
pub fn normalized_ratio(value: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range.is_nan() || range <= 0.0 {
        return 0.0;
    }
    let ratio = (value - min) / range;
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// `round(255 * (value - min) / (max - min))`, clamped to a byte.
#[inline]
pub fn normalize(value: f32, min: f32, max: f32) -> u8 {
    (255.0 * normalized_ratio(value, min, max)).round() as u8
}

/// Like [`normalize`] but with the ratio raised to `exponent` first.
#[inline]
pub fn normalize_gamma(value: f32, min: f32, max: f32, exponent: f32) -> u8 {
    (255.0 * normalized_ratio(value, min, max).powf(exponent)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_endpoints() {
        assert_eq!(normalize(-10.0, -10.0, 10.0), 0);
        assert_eq!(normalize(10.0, -10.0, 10.0), 255);
        assert_eq!(normalize(0.0, -10.0, 10.0), 128); // 127.5 rounds up
    }

    #[test]
    fn test_normalize_clamps_out_of_range() {
        assert_eq!(normalize(-50.0, 0.0, 1.0), 0);
        assert_eq!(normalize(50.0, 0.0, 1.0), 255);
    }

    #[test]
    fn test_constant_field_normalizes_to_zero() {
        assert_eq!(normalize(3.0, 3.0, 3.0), 0);
        assert_eq!(normalize_gamma(3.0, 3.0, 3.0, 0.2), 0);
        assert_eq!(normalize(f32::NAN, 0.0, 1.0), 0);
    }

    #[test]
    fn test_gamma_compresses_low_values_upwards() {
        // 0.01^0.2 = 0.3981, * 255 = 101.5
        assert_eq!(normalize_gamma(0.01, 0.0, 1.0, 0.2), 102);
        assert_eq!(normalize_gamma(1.0, 0.0, 1.0, 0.2), 255);
        assert_eq!(normalize_gamma(0.0, 0.0, 1.0, 0.2), 0);
    }

    #[test]
    fn test_from_fn_parallel_matches_sequential() {
        let f = |x: usize, y: usize| [x as u8, y as u8, 7, 255];
        let small = Raster::from_fn(10, 10, f);
        let large = Raster::from_fn(100, 100, f);
        assert_eq!(small.pixel(3, 9), [3, 9, 7, 255]);
        assert_eq!(large.pixel(3, 9), [3, 9, 7, 255]);
        assert_eq!(large.pixel(99, 99), [99, 99, 7, 255]);
    }
}
