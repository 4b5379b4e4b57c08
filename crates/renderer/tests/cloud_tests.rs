//! Tests for cloud texture encoding.

use forecast_common::Product;
use renderer::cloud::{encode_cloud, render_cloud, CloudStats, PRECIPITATION_EXPONENT};
use renderer::raster::{normalize, normalize_gamma};
use test_utils::{assert_byte_near, cloud_fields, field_from_fn, grid};

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory(png)
        .expect("texture should decode as PNG")
        .to_rgba8()
}

// ============================================================================
// Dimensions and statistics
// ============================================================================

#[test]
fn test_cloud_texture_size() {
    let spec = grid::GFS_0P50;
    let fields = cloud_fields(spec.width, spec.height);
    let artifact = encode_cloud(&fields).unwrap();

    let img = decode(&artifact.png);
    assert_eq!((img.width() as usize, img.height() as usize), spec.texture_size());
}

#[test]
fn test_cloud_stats_document() {
    let fields = cloud_fields(36, 19);
    let artifact = encode_cloud(&fields).unwrap();

    let stats: CloudStats = serde_json::from_slice(&artifact.json).unwrap();
    assert_eq!(stats.source, "http://nomads.ncep.noaa.gov");
    assert_eq!((stats.width, stats.height), (36, 18));
    assert_eq!(stats.c_min, fields[0].minimum);
    assert_eq!(stats.c_max, fields[0].maximum);
    assert_eq!(stats.p_min, fields[1].minimum);
    assert_eq!(stats.p_max, fields[1].maximum);
    assert_eq!(stats.s_min, fields[2].minimum);
    assert_eq!(stats.s_max, fields[2].maximum);

    let raw: serde_json::Value = serde_json::from_slice(&artifact.json).unwrap();
    for key in ["cMin", "cMax", "pMin", "pMax", "sMin", "sMax"] {
        assert!(raw.get(key).is_some(), "missing {}", key);
    }
}

// ============================================================================
// Channel packing
// ============================================================================

#[test]
fn test_cloud_rows_are_not_resampled() {
    let fields = cloud_fields(36, 19);
    let (cloud, precip, snow) = (&fields[0], &fields[1], &fields[2]);
    let img = decode(&encode_cloud(&fields).unwrap().png);

    for y in 0..18 {
        for x in 0..36 {
            let col = (x + 18) % 36;
            let px = img.get_pixel(x as u32, y as u32).0;
            assert_byte_near!(
                px[0],
                normalize(cloud.value(col, y), cloud.minimum, cloud.maximum),
                1
            );
            assert_byte_near!(
                px[1],
                normalize_gamma(
                    precip.value(col, y),
                    precip.minimum,
                    precip.maximum,
                    PRECIPITATION_EXPONENT
                ),
                1
            );
            assert_byte_near!(
                px[2],
                normalize(snow.value(col, y), snow.minimum, snow.maximum),
                1
            );
            assert_eq!(px[3], 255);
        }
    }
}

#[test]
fn test_precipitation_gamma() {
    let selectors = Product::Cloud.variables();
    let cloud = field_from_fn(selectors[0], 4, 3, |_, _| 50.0);
    // ratio 0.01 at column 2 (read by output column 0)
    let precip = field_from_fn(selectors[1], 4, 3, |col, _| match col {
        0 => 0.0,
        2 => 1.0,
        _ => 100.0,
    });
    let snow = field_from_fn(selectors[2], 4, 3, |_, _| 0.0);

    let (raster, _) = render_cloud(&cloud, &precip, &snow).unwrap();
    // 255 * 0.01^0.2 = 101.5
    assert_byte_near!(raster.pixel(0, 0)[1], 102, 1);
    assert_eq!(raster.pixel(2, 0)[1], 0);
    assert_eq!(raster.pixel(1, 0)[1], 255);
    // constant cloud and snow
    assert_eq!(raster.pixel(1, 1)[0], 0);
    assert_eq!(raster.pixel(1, 1)[2], 0);
}

#[test]
fn test_cloud_needs_three_fields() {
    let fields = cloud_fields(10, 6);
    assert!(encode_cloud(&fields[..2]).is_err());
}
