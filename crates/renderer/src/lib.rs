//! Texture encoding for gridded forecast data.
//!
//! Implements the artifact encoders:
//! - Wind (U/V packed into red/green)
//! - Cloud (cloud cover, precipitation, snow packed into red/green/blue)
//! - Color ramp lookup textures

pub mod cloud;
pub mod png;
pub mod ramp;
pub mod raster;
pub mod wind;

use serde::Serialize;

use forecast_common::{ForecastError, ForecastResult, GridField, Product};

pub use ramp::{Color, ColorRamp};
pub use raster::Raster;

/// Upstream archive named in every statistics document.
pub const UPSTREAM_SOURCE: &str = "http://nomads.ncep.noaa.gov";

/// PNG texture plus JSON statistics produced by one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    pub png: Vec<u8>,
    pub json: Vec<u8>,
}

impl EncodedArtifact {
    pub fn new<S: Serialize>(raster: &Raster, stats: &S) -> ForecastResult<Self> {
        let png = raster.to_png()?;
        let mut json = serde_json::to_vec_pretty(stats)
            .map_err(|e| ForecastError::Encode(format!("stats serialization failed: {}", e)))?;
        json.push(b'\n');

        tracing::debug!(
            width = raster.width,
            height = raster.height,
            png_bytes = png.len(),
            json_bytes = json.len(),
            "Encoded texture"
        );

        Ok(Self { png, json })
    }
}

/// Encode the decoded fields of `product`, given in `Product::variables` order.
pub fn encode_fields(product: Product, fields: &[GridField]) -> ForecastResult<EncodedArtifact> {
    match product {
        Product::Wind => wind::encode_wind(fields),
        Product::Cloud => cloud::encode_cloud(fields),
        Product::ColorRamp => Err(ForecastError::Encode(
            "color ramps are rendered without grid data".to_string(),
        )),
    }
}

/// All fields packed into one texture must share a consistent grid.
pub(crate) fn check_same_grid(fields: &[&GridField]) -> ForecastResult<()> {
    let Some(first) = fields.first() else {
        return Err(ForecastError::Encode("no fields to encode".to_string()));
    };

    for field in fields {
        if !field.is_consistent() {
            return Err(ForecastError::Encode(format!(
                "{} grid declares {}x{} but holds {} values",
                field.selector.variable.code(),
                field.width,
                field.height,
                field.values.len()
            )));
        }
        if field.width != first.width || field.height != first.height {
            return Err(ForecastError::Encode(format!(
                "{} grid is {}x{}, expected {}x{}",
                field.selector.variable.code(),
                field.width,
                field.height,
                first.width,
                first.height
            )));
        }
    }
    Ok(())
}
