use serde::Serialize;

/// Display color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Hover emphasis: add a fixed delta to each color channel, saturating at
    /// the channel maximum, and force the emphasized alpha.
    pub fn emphasized(self) -> Self {
        Self {
            r: self.r.saturating_add(HOVER_DELTA),
            g: self.g.saturating_add(HOVER_DELTA),
            b: self.b.saturating_add(HOVER_DELTA),
            a: HOVER_ALPHA,
        }
    }
}

/// Fill for regions with no usable sample.
pub const NEUTRAL: Rgba = Rgba::new(200, 200, 200, 150);

/// Fill forced onto the coarse layer while a finer-granularity view is shown,
/// so it visually recedes.
pub const DIMMED: Rgba = Rgba::new(200, 200, 200, 40);

/// Alpha for regions colored from a real sample.
pub const DATA_ALPHA: u8 = 200;

/// Per-channel brightening applied to the hovered region.
pub const HOVER_DELTA: u8 = 50;

/// Alpha forced onto the hovered region.
pub const HOVER_ALPHA: u8 = 220;

/// Continuous sequential color scale: linear RGB interpolation of a numeric
/// domain onto a low..high ramp, clamped at the ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    low: (u8, u8, u8),
    high: (u8, u8, u8),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), low: (u8, u8, u8), high: (u8, u8, u8)) -> Self {
        Self { domain, low, high }
    }

    /// The scale used for the risk metric everywhere in the engine:
    /// green (#4daf4a, low) to red (#e41a1c, high) over [0, 5].
    pub fn risk() -> Self {
        Self::new((0.0, 5.0), (0x4d, 0xaf, 0x4a), (0xe4, 0x1a, 0x1c))
    }

    /// Map a domain value to a fill color at the standard data alpha.
    pub fn color(&self, value: f64) -> Rgba {
        let span = self.domain.1 - self.domain.0;
        let t = if span == 0.0 { 0.0 } else { ((value - self.domain.0) / span).clamp(0.0, 1.0) };
        Rgba::new(
            lerp_channel(self.low.0, self.high.0, t),
            lerp_channel(self.low.1, self.high.1, t),
            lerp_channel(self.low.2, self.high.2, t),
            DATA_ALPHA,
        )
    }

    /// Legend swatches at each integer stop of the domain.
    pub fn legend_stops(&self) -> Vec<(f64, Rgba)> {
        let (lo, hi) = (self.domain.0.ceil() as i64, self.domain.1.floor() as i64);
        (lo..=hi).map(|v| (v as f64, self.color(v as f64))).collect()
    }
}

#[inline]
fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

/// Fixed ordinal bucket -> numeric proxy for category-only samples. Unknown
/// labels get `None` so callers render them neutral rather than defaulting
/// into a bucket.
pub fn category_value(label: &str) -> Option<f64> {
    match label {
        "Very Low" => Some(1.0),
        "Low" => Some(2.0),
        "Medium" => Some(3.0),
        "High" => Some(4.0),
        "Very High" => Some(5.0),
        _ => None,
    }
}
