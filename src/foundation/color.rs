//! Color parsing and hue/saturation/lightness conversions.
//!
//! Domains: hue is in degrees, `[0, 360)`; saturation and lightness are in `[0, 1]`.
//! Channel values are straight (non-premultiplied) 8-bit.

use crate::foundation::error::{EmojifyError, EmojifyResult};

/// Straight 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or the `#RGB` shorthand (leading `#` optional, case-insensitive).
    pub fn parse_hex(s: &str) -> EmojifyResult<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(EmojifyError::validation(format!("invalid hex color: {s}"))),
        };
        if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(EmojifyError::validation(format!("invalid hex color: {s}")));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| EmojifyError::validation(format!("invalid hex color: {s}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Convert to HSL.
    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self)
    }

    /// Return this color with its hue rotated by `degrees`, saturation and lightness held.
    pub fn rotate_hue(self, degrees: f32) -> Self {
        let hsl = rgb_to_hsl(self);
        hsl_to_rgb(Hsl {
            h: (hsl.h + degrees).rem_euclid(360.0),
            ..hsl
        })
    }
}

/// Hue/saturation/lightness triple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    /// Hue in degrees, `[0, 360)`.
    pub h: f32,
    /// Saturation, `[0, 1]`.
    pub s: f32,
    /// Lightness, `[0, 1]`.
    pub l: f32,
}

/// Convert straight RGB to HSL. Achromatic colors report hue 0 and saturation 0.
pub fn rgb_to_hsl(c: Rgb8) -> Hsl {
    let r = f32::from(c.r) / 255.0;
    let g = f32::from(c.g) / 255.0;
    let b = f32::from(c.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;

    if delta <= f32::EPSILON {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let s = (delta / (1.0 - (2.0 * l - 1.0).abs())).clamp(0.0, 1.0);
    let h = if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    Hsl {
        h: h.rem_euclid(360.0),
        s,
        l,
    }
}

/// Convert HSL back to straight RGB.
///
/// Hue is wrapped into `[0, 360)`; saturation and lightness are clamped to `[0, 1]`.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb8 {
    let h = hsl.h.rem_euclid(360.0);
    let s = hsl.s.clamp(0.0, 1.0);
    let l = hsl.l.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb8::new(to_u8(r), to_u8(g), to_u8(b))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
