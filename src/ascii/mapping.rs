//! Brightness / edge magnitude to glyph mapping.

use super::sample::Sample;
use crate::buffer::Rgb;
use crate::params::RenderParams;

/// One output cell: a character and, in color mode, its foreground color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub color: Option<Rgb>,
}

impl Glyph {
    /// Rendered for cells with no pixels behind them.
    pub const BLANK: Glyph = Glyph {
        ch: ' ',
        color: None,
    };
}

/// Scale a raw intensity by the brightness multiplier and clamp to 0-255.
///
/// Fractions are truncated, so 0.9 boosted by 1.0 selects like 0.
#[inline]
pub fn selection_value(intensity: f32, boost: f32) -> u32 {
    let boosted = intensity * boost;
    if boosted.is_nan() {
        return 0;
    }
    boosted.clamp(0.0, 255.0) as u32
}

/// Ramp index for a selection value: `floor(value * len / 256)`, clamped to
/// the last index. Monotonic in `value`.
#[inline]
pub fn ramp_index(value: u32, ramp_len: usize) -> usize {
    ((value as usize * ramp_len) / 256).min(ramp_len.saturating_sub(1))
}

/// Choose the glyph (and color) for one sample.
///
/// A value of exactly 0 always maps to the darkest glyph, or the brightest
/// when `invert` is set, independent of the index formula. Empty samples
/// render as a blank with no color.
pub fn select_glyph(sample: &Sample, params: &RenderParams) -> Glyph {
    if sample.count == 0 {
        return Glyph::BLANK;
    }

    let ramp = &params.ramp;
    let value = selection_value(sample.intensity.value(), params.brightness);

    let ch = if value == 0 {
        if params.invert {
            ramp.last()
        } else {
            ramp.first()
        }
    } else {
        let index = ramp_index(value, ramp.len());
        if params.invert {
            ramp.get(ramp.len() - 1 - index)
        } else {
            ramp.get(index)
        }
    };

    let color = if params.color {
        sample.color.map(|rgb| {
            if params.invert_color {
                rgb.inverted()
            } else {
                rgb
            }
        })
    } else {
        None
    };

    Glyph { ch, color }
}
