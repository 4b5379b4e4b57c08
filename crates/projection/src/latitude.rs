//! Latitude resampling.
//!
//! The wind texture is sampled by the client in Web Mercator space, so its
//! rows are placed at Mercator-spaced latitudes instead of the equirectangular
//! spacing of the source grid. Rows between two source rows are blended
//! linearly.

use std::f64::consts::PI;

/// Highest latitude covered by the Mercator rows (about 85.05°).
pub fn mercator_limit() -> f64 {
    mercator_latitude(0, 1)
}

/// Latitude in degrees of output row `y` out of `rows` Mercator rows.
///
/// `lat(y) = atan(exp((180 - y/rows*360) * PI/180)) * 360/PI - 90`
pub fn mercator_latitude(y: usize, rows: usize) -> f64 {
    let rows = rows.max(1) as f64;
    let merc = (180.0 - y as f64 / rows * 360.0) * PI / 180.0;
    merc.exp().atan() * 360.0 / PI - 90.0
}

/// Fractional source row for `latitude` on a grid running 90°N..90°S over
/// `source_height` rows.
pub fn latitude_to_row(latitude: f64, source_height: usize) -> f64 {
    let last = source_height.saturating_sub(1) as f64;
    ((90.0 - latitude) / 180.0 * last).clamp(0.0, last)
}

/// A blend of two source rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSample {
    pub lower: usize,
    pub upper: usize,
    /// Weight of `upper`; `lower` gets `1 - upper_weight`.
    pub upper_weight: f32,
}

impl RowSample {
    pub fn exact(row: usize) -> Self {
        Self {
            lower: row,
            upper: row,
            upper_weight: 0.0,
        }
    }

    /// Blend for a fractional row. Each row is weighted by the distance to
    /// the other one.
    pub fn fractional(row: f64) -> Self {
        let lower = row.floor();
        let upper = row.ceil();
        if lower == upper {
            return Self::exact(lower as usize);
        }
        Self {
            lower: lower as usize,
            upper: upper as usize,
            upper_weight: (row - lower) as f32,
        }
    }

    pub fn lower_weight(&self) -> f32 {
        1.0 - self.upper_weight
    }

    /// Fractional row this sample stands for.
    pub fn position(&self) -> f64 {
        self.lower as f64 + self.upper_weight as f64
    }

    #[inline]
    pub fn blend(&self, lower_value: f32, upper_value: f32) -> f32 {
        if self.lower == self.upper {
            lower_value
        } else {
            lower_value * self.lower_weight() + upper_value * self.upper_weight
        }
    }
}

/// How output rows map onto source rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatitudeResampling {
    /// Output row y reads source row y.
    Identity,
    /// Output rows are Mercator-spaced latitudes.
    Mercator,
}

impl LatitudeResampling {
    /// Source row for output row `y` out of `rows`, reading a grid with
    /// `source_height` rows.
    pub fn sample(&self, y: usize, rows: usize, source_height: usize) -> RowSample {
        match self {
            LatitudeResampling::Identity => {
                RowSample::exact(y.min(source_height.saturating_sub(1)))
            }
            LatitudeResampling::Mercator => {
                let lat = mercator_latitude(y, rows);
                RowSample::fractional(latitude_to_row(lat, source_height))
            }
        }
    }

    /// Row samples for every output row.
    pub fn samples(&self, rows: usize, source_height: usize) -> Vec<RowSample> {
        (0..rows)
            .map(|y| self.sample(y, rows, source_height))
            .collect()
    }
}
