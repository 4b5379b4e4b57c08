//! Cloud, precipitation and snow textures.
//!
//! No latitude resampling is applied here; rows keep the equirectangular
//! spacing of the source grid.

use serde::{Deserialize, Serialize};

use forecast_common::{ForecastError, ForecastResult, GridField};
use projection::{GridProjector, LatitudeResampling};

use crate::raster::{normalize, normalize_gamma, Raster};
use crate::{check_same_grid, EncodedArtifact, UPSTREAM_SOURCE};

/// Precipitation is stored gamma-compressed so light rain stays visible.
pub const PRECIPITATION_EXPONENT: f32 = 0.2;

/// Statistics document served next to the cloud texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudStats {
    pub source: String,
    pub width: usize,
    pub height: usize,
    pub c_min: f32,
    pub c_max: f32,
    pub p_min: f32,
    pub p_max: f32,
    pub s_min: f32,
    pub s_max: f32,
}

/// Render cloud cover (R), precipitation (G) and snow percentage (B).
pub fn render_cloud(
    cloud: &GridField,
    precipitation: &GridField,
    snow: &GridField,
) -> ForecastResult<(Raster, CloudStats)> {
    check_same_grid(&[cloud, precipitation, snow])?;

    let projector = GridProjector::for_field(cloud, LatitudeResampling::Identity);
    let raster = Raster::from_fn(projector.output_width(), projector.output_height(), |x, y| {
        [
            normalize(projector.sample(cloud, x, y), cloud.minimum, cloud.maximum),
            normalize_gamma(
                projector.sample(precipitation, x, y),
                precipitation.minimum,
                precipitation.maximum,
                PRECIPITATION_EXPONENT,
            ),
            normalize(projector.sample(snow, x, y), snow.minimum, snow.maximum),
            255,
        ]
    });

    let stats = CloudStats {
        source: UPSTREAM_SOURCE.to_string(),
        width: raster.width,
        height: raster.height,
        c_min: cloud.minimum,
        c_max: cloud.maximum,
        p_min: precipitation.minimum,
        p_max: precipitation.maximum,
        s_min: snow.minimum,
        s_max: snow.maximum,
    };

    Ok((raster, stats))
}

/// Encode the cloud texture and its statistics document.
pub fn encode_cloud(fields: &[GridField]) -> ForecastResult<EncodedArtifact> {
    let [cloud, precipitation, snow] = fields else {
        return Err(ForecastError::Encode(format!(
            "cloud needs 3 fields (cloud, precipitation, snow), got {}",
            fields.len()
        )));
    };

    let (raster, stats) = render_cloud(cloud, precipitation, snow)?;
    EncodedArtifact::new(&raster, &stats)
}
