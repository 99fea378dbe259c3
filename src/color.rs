use anyhow::{Context, Result, anyhow};

use crate::boundaries::AffinityBoundaries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color { r: 255, g: 0, b: 0 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_style(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Accepts `r,g,b` (decimal channels) or `#rrggbb`.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if let Some(hex) = raw.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(anyhow!("expected #rrggbb, got {raw}"));
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).with_context(|| format!("bad hex color {raw}"))
            };
            return Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }

        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(anyhow!("expected r,g,b, got {raw}"));
        };
        Ok(Self::new(
            r.parse().with_context(|| format!("bad red channel in {raw}"))?,
            g.parse().with_context(|| format!("bad green channel in {raw}"))?,
            b.parse().with_context(|| format!("bad blue channel in {raw}"))?,
        ))
    }
}

/// Gradient anchors for the roster: `low` paints the weakest affinity,
/// `high` the strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub low: Color,
    pub high: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            low: Color::RED,
            high: Color::GREEN,
        }
    }
}

impl Palette {
    pub fn color_at(&self, value: f64, boundaries: AffinityBoundaries) -> Color {
        color_at(value, boundaries, self.low, self.high)
    }
}

/// Maps `value` onto the `low..high` gradient after normalizing it against
/// `boundaries`. Out-of-range values saturate to the nearest end; a
/// zero-width range (and NaN) yields `low`.
pub fn color_at(value: f64, boundaries: AffinityBoundaries, low: Color, high: Color) -> Color {
    let t = normalized_position(value, boundaries);
    Color {
        r: lerp_channel(low.r, high.r, t),
        g: lerp_channel(low.g, high.g, t),
        b: lerp_channel(low.b, high.b, t),
    }
}

fn normalized_position(value: f64, boundaries: AffinityBoundaries) -> f64 {
    let AffinityBoundaries { min, max } = boundaries;
    let span = max - min;
    if span <= 0.0 || value.is_nan() {
        return 0.0;
    }
    let clamped = value.clamp(min, max);
    ((clamped - min) / span).clamp(0.0, 1.0)
}

fn lerp_channel(start: u8, end: u8, t: f64) -> u8 {
    let start = f64::from(start);
    let end = f64::from(end);
    (start + (end - start) * t).round().clamp(0.0, 255.0) as u8
}
