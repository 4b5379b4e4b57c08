//! Common test fixtures for forecast texture tests.
//!
//! This module provides pre-defined grids, times and decoder output that
//! represent common scenarios in the texture pipeline.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use forecast_common::{FetchParameters, ForecastQuery, GridField, Product};

/// Common grid specifications for testing.
pub mod grid {
    /// Grid specification for testing.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub width: usize,
        pub height: usize,
    }

    impl GridSpec {
        /// Returns the total number of grid cells.
        pub fn size(&self) -> usize {
            self.width * self.height
        }

        /// Returns the texture size produced from this grid.
        pub fn texture_size(&self) -> (usize, usize) {
            (self.width, self.height - 1)
        }
    }

    /// GFS 1.00 degree global grid
    pub const GFS_1P00: GridSpec = GridSpec {
        width: 360,
        height: 181,
    };

    /// GFS 0.50 degree global grid
    pub const GFS_0P50: GridSpec = GridSpec {
        width: 720,
        height: 361,
    };

    /// GFS 0.25 degree global grid
    pub const GFS_0P25: GridSpec = GridSpec {
        width: 1440,
        height: 721,
    };

    /// Coarse 10 degree global grid, small enough for exhaustive checks
    pub const COARSE_10DEG: GridSpec = GridSpec {
        width: 36,
        height: 19,
    };
}

/// Common time values for testing.
pub mod time {
    /// A fixed "now" for tests (2024-03-10T14:25:00Z), inside the 06Z
    /// publication window.
    pub const REFERENCE_NOW: &str = "2024-03-10T14:25:00Z";
}

/// [`time::REFERENCE_NOW`] as a timestamp.
pub fn reference_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(time::REFERENCE_NOW)
        .expect("REFERENCE_NOW is valid RFC 3339")
        .with_timezone(&Utc)
}

/// Query with the given fields set.
pub fn query(date_time: Option<&str>, resolution: Option<&str>, forecast: Option<&str>) -> ForecastQuery {
    ForecastQuery {
        date_time: date_time.map(String::from),
        resolution: resolution.map(String::from),
        forecast: forecast.map(String::from),
        colors: None,
    }
}

/// Parameters for `product` on 2024-01-15 12Z, step 1, at `resolution`.
pub fn sample_parameters(product: Product, resolution: &str) -> FetchParameters {
    forecast_common::params::parse_at(
        &query(Some("2024-01-15T12:00:00Z"), Some(resolution), Some("1")),
        product,
        reference_now(),
    )
}

/// Decoder JSON for `field`, shaped like `grib_dump -j` output.
///
/// Only the first message is read by the pipeline; its key/value list
/// carries `Ni`, `Nj`, `minimum`, `maximum` and `values` among unrelated
/// keys.
pub fn decoder_json(field: &GridField) -> Value {
    json!({
        "messages": [[
            { "key": "editionNumber", "value": 2 },
            { "key": "shortName", "value": field.selector.variable.code().to_ascii_lowercase() },
            { "key": "Ni", "value": field.width },
            { "key": "Nj", "value": field.height },
            { "key": "minimum", "value": field.minimum },
            { "key": "maximum", "value": field.maximum },
            { "key": "values", "value": field.values },
        ]]
    })
}

/// [`decoder_json`] serialized, as the decoder writes it to stdout.
pub fn decoder_output(field: &GridField) -> Vec<u8> {
    decoder_json(field).to_string().into_bytes()
}
