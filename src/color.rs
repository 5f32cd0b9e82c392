//! Diverging colour scale used to shade networks by supplier mix.

/// An opaque RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Fixed two-endpoint diverging scale with a neutral midpoint.
///
/// A fraction of `0.0` maps to `low`, `0.5` to `mid`, and `1.0` to `high`,
/// with linear interpolation between the stops. Fractions outside `[0, 1]`
/// are clamped. An undefined fraction (no counted practices) maps to
/// `missing`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DivergingScale {
    /// Colour at fraction 0.
    pub low: Rgb,
    /// Neutral colour at fraction 0.5.
    pub mid: Rgb,
    /// Colour at fraction 1.
    pub high: Rgb,
    /// Colour used when the fraction is undefined.
    pub missing: Rgb,
}

impl Default for DivergingScale {
    /// Coolwarm-style scale: red at 0, white at the midpoint, blue at 1,
    /// light grey for undefined values.
    fn default() -> Self {
        Self {
            low: Rgb(178, 24, 43),
            mid: Rgb(247, 247, 247),
            high: Rgb(33, 102, 172),
            missing: Rgb(200, 200, 200),
        }
    }
}

impl DivergingScale {
    /// Colour for a possibly-undefined fraction in `[0, 1]`.
    pub fn color_for(&self, fraction: Option<f64>) -> Rgb {
        match fraction {
            Some(value) => self.color_at(value),
            None => self.missing,
        }
    }

    /// Colour for a defined fraction, clamped into `[0, 1]`.
    pub fn color_at(&self, fraction: f64) -> Rgb {
        let f = fraction.clamp(0.0, 1.0);
        if f <= 0.5 {
            lerp(self.low, self.mid, f * 2.0)
        } else {
            lerp(self.mid, self.high, (f - 0.5) * 2.0)
        }
    }
}

fn lerp(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let channel = |a: u8, b: u8| -> u8 {
        let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgb(
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}
