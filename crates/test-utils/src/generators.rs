//! Test data generators for creating synthetic forecast fields.
//!
//! These generators create predictable, verifiable grids that can be fed
//! straight into the encoders. Minimum and maximum are always computed from
//! the generated values, like a decoder would report them.

use forecast_common::{GridField, Product, VariableSelector};

/// Builds a field by evaluating `value(col, row)` over the grid.
///
/// # Arguments
///
/// * `selector` - The variable/level the field pretends to be
/// * `width` - Number of columns (Ni)
/// * `height` - Number of rows (Nj)
/// * `value` - Value at (col, row), row 0 being the north pole
pub fn field_from_fn<F>(selector: VariableSelector, width: usize, height: usize, value: F) -> GridField
where
    F: Fn(usize, usize) -> f32,
{
    let mut values = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            values.push(value(col, row));
        }
    }

    let (minimum, maximum) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f32, f32)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0));

    GridField {
        selector,
        width,
        height,
        minimum,
        maximum,
        values,
    }
}

/// Creates a field with predictable values.
///
/// Each cell value is calculated as: `row * 1000 + col`
///
/// This makes it easy to verify which source cell ended up in which pixel.
///
/// # Example
///
/// ```
/// use forecast_common::Product;
/// use test_utils::create_test_field;
///
/// let field = create_test_field(Product::Wind.variables()[0], 10, 5);
/// assert_eq!(field.values.len(), 50);
/// assert_eq!(field.value(3, 2), 2003.0);
/// assert_eq!(field.maximum, 4009.0);
/// ```
pub fn create_test_field(selector: VariableSelector, width: usize, height: usize) -> GridField {
    field_from_fn(selector, width, height, |col, row| (row * 1000 + col) as f32)
}

/// Creates a field filled with a constant value.
pub fn create_constant_field(
    selector: VariableSelector,
    width: usize,
    height: usize,
    value: f32,
) -> GridField {
    field_from_fn(selector, width, height, |_, _| value)
}

/// Creates a U-component wind field in m/s.
///
/// U varies by latitude, easterlies in the tropics and westerlies towards
/// the poles, roughly -20 to +20 m/s.
pub fn create_u_wind_field(width: usize, height: usize) -> GridField {
    let selector = Product::Wind.variables()[0];
    field_from_fn(selector, width, height, |_, row| {
        let lat_factor = (row as f32 / (height.max(2) - 1) as f32 - 0.5) * 2.0; // -1 to 1
        -20.0 * (lat_factor * std::f32::consts::PI).cos()
    })
}

/// Creates a V-component wind field in m/s.
///
/// V varies by longitude, -15 to +15 m/s.
pub fn create_v_wind_field(width: usize, height: usize) -> GridField {
    let selector = Product::Wind.variables()[1];
    field_from_fn(selector, width, height, |col, _| {
        let lon_factor = (col as f32 / width.max(1) as f32 - 0.5) * 2.0; // -1 to 1
        lon_factor * 15.0
    })
}

/// Creates a cloud cover field in percent (0 to 100).
pub fn create_cloud_cover_field(width: usize, height: usize) -> GridField {
    let selector = Product::Cloud.variables()[0];
    field_from_fn(selector, width, height, |col, row| {
        ((col + row * 7) % 101) as f32
    })
}

/// Creates a sparse precipitation field in kg/m^2.
///
/// Most cells are dry; the wet ones are scattered deterministically by
/// `seed` and reach at most 50.
pub fn create_precipitation_field(width: usize, height: usize, seed: u32) -> GridField {
    let selector = Product::Cloud.variables()[1];
    field_from_fn(selector, width, height, |col, row| {
        let hash = simple_hash(col as u32, row as u32, seed);
        if hash % 4 == 0 {
            (hash % 5000) as f32 / 100.0
        } else {
            0.0
        }
    })
}

/// Creates a frozen precipitation percentage field (0 to 100).
///
/// Snow is likelier towards the poles.
pub fn create_snow_field(width: usize, height: usize) -> GridField {
    let selector = Product::Cloud.variables()[2];
    field_from_fn(selector, width, height, |_, row| {
        let from_equator = (row as f32 / (height.max(2) - 1) as f32 - 0.5).abs() * 2.0;
        (from_equator * 100.0).round()
    })
}

/// The two wind fields in `Product::Wind` order.
pub fn wind_fields(width: usize, height: usize) -> Vec<GridField> {
    vec![
        create_u_wind_field(width, height),
        create_v_wind_field(width, height),
    ]
}

/// The three cloud fields in `Product::Cloud` order.
pub fn cloud_fields(width: usize, height: usize) -> Vec<GridField> {
    vec![
        create_cloud_cover_field(width, height),
        create_precipitation_field(width, height, 42),
        create_snow_field(width, height),
    ]
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// Creates RGBA pixel data for a simple test pattern.
///
/// A gradient in red/green with constant blue, useful for PNG encoding tests.
pub fn create_test_rgba_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let r = ((x as f32 / width as f32) * 255.0) as u8;
            let g = ((y as f32 / height as f32) * 255.0) as u8;
            pixels.extend_from_slice(&[r, g, 128, 255]);
        }
    }
    pixels
}
