//! Tests for color ramp textures.

use renderer::ramp::{interpolate_color, RAMP_HEIGHT};
use renderer::{Color, ColorRamp};

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory(png)
        .expect("ramp should decode as PNG")
        .to_rgba8()
}

// ============================================================================
// Default ramp
// ============================================================================

#[test]
fn test_default_ramp_texture() {
    let img = decode(&ColorRamp::default().to_png().unwrap());
    assert_eq!(img.width(), 1);
    assert_eq!(img.height() as usize, RAMP_HEIGHT);

    assert_eq!(img.get_pixel(0, 0).0, [0x32, 0x88, 0xbd, 255]);
    assert_eq!(img.get_pixel(0, 255).0, [0xd5, 0x3e, 0x4f, 255]);
}

#[test]
fn test_default_ramp_has_eight_stops() {
    let ramp = ColorRamp::default();
    let stops: Vec<f32> = ramp.stops().iter().map(|(s, _)| *s).collect();
    assert_eq!(stops, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 1.0]);
}

#[test]
fn test_default_ramp_midpoint_of_last_segment() {
    // 0.8 is halfway between the 0.6 and 1.0 stops
    let ramp = ColorRamp::default();
    let expected = interpolate_color(
        Color::from_hex("#f46d43").unwrap(),
        Color::from_hex("#d53e4f").unwrap(),
        0.5,
    );
    let got = ramp.color_at(0.8);
    for (a, b) in got.to_array().iter().zip(expected.to_array().iter()) {
        assert!((*a as i32 - *b as i32).abs() <= 1);
    }
}

// ============================================================================
// Custom ramps
// ============================================================================

#[test]
fn test_greyscale_ramp_is_monotonic() {
    let ramp = ColorRamp::parse("0:#000000,1:#ffffff").unwrap();
    let raster = ramp.render();

    assert_eq!(raster.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(raster.pixel(0, 255), [255, 255, 255, 255]);

    for y in 1..RAMP_HEIGHT {
        let prev = raster.pixel(0, y - 1);
        let cur = raster.pixel(0, y);
        assert!(cur[0] > prev[0], "row {} not increasing", y);
        assert_eq!(cur[0], cur[1]);
        assert_eq!(cur[1], cur[2]);
        assert_eq!(cur[3], 255);
    }
}

#[test]
fn test_ramp_clamps_outside_stops() {
    // Stops cover only the middle of the texture
    let ramp = ColorRamp::parse("0.25:#ff0000,0.75:#0000ff").unwrap();
    let raster = ramp.render();
    assert_eq!(raster.pixel(0, 0), [255, 0, 0, 255]);
    assert_eq!(raster.pixel(0, 255), [0, 0, 255, 255]);
}

#[test]
fn test_from_query_falls_back_to_default() {
    assert_eq!(ColorRamp::from_query(Some("garbage")), ColorRamp::default());
    let custom = ColorRamp::from_query(Some("0:#000000,1:#ffffff"));
    assert_ne!(custom, ColorRamp::default());
}

#[test]
fn test_alpha_stops() {
    let ramp = ColorRamp::parse("0:#00000000,1:#000000ff").unwrap();
    let raster = ramp.render();
    assert_eq!(raster.pixel(0, 0)[3], 0);
    assert_eq!(raster.pixel(0, 255)[3], 255);
}
