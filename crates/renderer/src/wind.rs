//! Wind vector textures.
//!
//! The U (eastward) component goes to red, V (northward) to green. Rows are
//! Mercator-resampled so particles advected by the client line up with the
//! base map.

use serde::{Deserialize, Serialize};

use forecast_common::{ForecastError, ForecastResult, GridField};
use projection::{GridProjector, LatitudeResampling};

use crate::raster::{normalize, Raster};
use crate::{check_same_grid, EncodedArtifact, UPSTREAM_SOURCE};

/// Statistics document served next to the wind texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindStats {
    pub source: String,
    pub width: usize,
    pub height: usize,
    pub u_min: f32,
    pub u_max: f32,
    pub v_min: f32,
    pub v_max: f32,
}

/// Render the U/V components into an RGBA raster.
pub fn render_wind(u: &GridField, v: &GridField) -> ForecastResult<(Raster, WindStats)> {
    check_same_grid(&[u, v])?;

    let projector = GridProjector::for_field(u, LatitudeResampling::Mercator);
    let raster = Raster::from_fn(projector.output_width(), projector.output_height(), |x, y| {
        [
            normalize(projector.sample(u, x, y), u.minimum, u.maximum),
            normalize(projector.sample(v, x, y), v.minimum, v.maximum),
            0,
            255,
        ]
    });

    let stats = WindStats {
        source: UPSTREAM_SOURCE.to_string(),
        width: raster.width,
        height: raster.height,
        u_min: u.minimum,
        u_max: u.maximum,
        v_min: v.minimum,
        v_max: v.maximum,
    };

    Ok((raster, stats))
}

/// Encode the wind texture and its statistics document.
pub fn encode_wind(fields: &[GridField]) -> ForecastResult<EncodedArtifact> {
    let [u, v] = fields else {
        return Err(ForecastError::Encode(format!(
            "wind needs 2 fields (U, V), got {}",
            fields.len()
        )));
    };

    let (raster, stats) = render_wind(u, v)?;
    EncodedArtifact::new(&raster, &stats)
}
