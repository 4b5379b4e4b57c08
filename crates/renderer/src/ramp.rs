//! Color ramp lookup textures.
//!
//! A ramp maps a normalized scalar in [0, 1] to a color. The client samples
//! it as a 1x256 texture, row `y` holding the color for `y / 255`.

use forecast_common::ForecastResult;

use crate::raster::Raster;

/// Rows in a ramp texture.
pub const RAMP_HEIGHT: usize = 256;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Linearly interpolate between two colors
pub fn interpolate_color(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f32 + t * (b as f32 - a as f32)).round() as u8;
    Color {
        r: lerp(from.r, to.r),
        g: lerp(from.g, to.g),
        b: lerp(from.b, to.b),
        a: lerp(from.a, to.a),
    }
}

/// Ascending list of (stop, color) pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<(f32, Color)>,
}

impl Default for ColorRamp {
    /// 8-stop diverging blue-to-red ramp.
    fn default() -> Self {
        let stops = [
            (0.0, "#3288bd"),
            (0.1, "#66c2a5"),
            (0.2, "#abdda4"),
            (0.3, "#e6f598"),
            (0.4, "#fee08b"),
            (0.5, "#fdae61"),
            (0.6, "#f46d43"),
            (1.0, "#d53e4f"),
        ];
        Self {
            stops: stops
                .iter()
                .filter_map(|(stop, hex)| Color::from_hex(hex).map(|c| (*stop, c)))
                .collect(),
        }
    }
}

impl ColorRamp {
    /// Build a ramp from stops in any order. Needs at least two finite stops.
    pub fn new(mut stops: Vec<(f32, Color)>) -> Option<Self> {
        stops.retain(|(stop, _)| stop.is_finite());
        if stops.len() < 2 {
            return None;
        }
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Some(Self { stops })
    }

    /// Parse `stop:hex,stop:hex,...`. Malformed entries are skipped.
    pub fn parse(spec: &str) -> Option<Self> {
        let stops = spec
            .split(',')
            .filter_map(|entry| {
                let (stop, hex) = entry.split_once(':')?;
                let stop = stop.trim().parse::<f32>().ok()?;
                Some((stop, Color::from_hex(hex)?))
            })
            .collect();
        Self::new(stops)
    }

    /// Ramp from an optional query value, falling back to the default.
    pub fn from_query(colors: Option<&str>) -> Self {
        colors.and_then(Self::parse).unwrap_or_default()
    }

    pub fn stops(&self) -> &[(f32, Color)] {
        &self.stops
    }

    /// Indices of the stops bracketing `t`.
    ///
    /// The lower stop is inclusive and the upper exclusive:
    /// `stops[i].0 <= t < stops[i + 1].0`. Values at or past the last stop
    /// use the last segment.
    pub fn bracket(&self, t: f32) -> (usize, usize) {
        let last = self.stops.len() - 1;
        let upper = self.stops[1..last]
            .iter()
            .position(|(stop, _)| t < *stop)
            .map(|i| i + 1)
            .unwrap_or(last);
        (upper - 1, upper)
    }

    /// Color for `t`, clamped to the first/last stop colors outside the ramp.
    pub fn color_at(&self, t: f32) -> Color {
        let (lo, hi) = self.bracket(t);
        let (lo_stop, lo_color) = self.stops[lo];
        let (hi_stop, hi_color) = self.stops[hi];

        let span = hi_stop - lo_stop;
        let weight = if span > 0.0 { (t - lo_stop) / span } else { 1.0 };
        interpolate_color(lo_color, hi_color, weight)
    }

    /// Render the ramp as a 1x256 raster.
    pub fn render(&self) -> Raster {
        Raster::from_fn(1, RAMP_HEIGHT, |_, y| {
            let t = y as f32 / (RAMP_HEIGHT - 1) as f32;
            self.color_at(t).to_array()
        })
    }

    /// Render and encode the ramp as PNG.
    pub fn to_png(&self) -> ForecastResult<Vec<u8>> {
        self.render().to_png()
    }
}
