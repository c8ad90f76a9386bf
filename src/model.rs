use crate::foundation::{color::Rgb8, math::Fnv1a64};

/// Fully validated description of one render request.
///
/// Constructed by the boundary layer (see [`crate::RenderRequest`]) and passed by reference
/// into the engine; the engine never mutates it.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSpec {
    /// Text, one entry per line.
    pub text: Vec<String>,
    /// Canvas sizing mode.
    pub layout_mode: LayoutMode,
    /// Horizontal alignment of each line.
    pub alignment: Alignment,
    /// Glyph styling.
    pub style: TextStyle,
    /// Animation settings.
    pub motion: Motion,
}

impl RenderSpec {
    /// Square, centered, static render of `text` (split on newlines).
    pub fn new(text: &str, style: TextStyle) -> Self {
        Self {
            text: split_lines(text),
            layout_mode: LayoutMode::default(),
            alignment: Alignment::default(),
            style,
            motion: Motion::default(),
        }
    }

    /// Whether this request produces an animated sequence.
    pub fn is_animated(&self) -> bool {
        self.motion.kind != MotionKind::None
    }

    /// Stable 64-bit digest of every field, used to seed per-request randomness so identical
    /// requests render identically.
    pub fn content_seed(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.text.len() as u32);
        for line in &self.text {
            h.write_str(line);
        }
        h.write_u8(self.layout_mode as u8);
        h.write_u8(self.alignment as u8);
        h.write_str(&self.style.font_id);
        for c in [self.style.text_color, self.style.outline_color] {
            h.write_bytes(&[c.r, c.g, c.b]);
        }
        h.write_u32(self.style.outline_width);
        h.write_u8(u8::from(self.style.shadow));
        h.write_u8(self.motion.kind as u8);
        h.write_u8(self.motion.intensity as u8);
        h.write_u32(self.motion.speed.to_bits());
        h.finish()
    }
}

/// Split raw text into lines on `\n`, `\r\n` or `\r`.
pub fn split_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(str::to_string)
        .collect()
}

/// Glyph styling for a render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextStyle {
    /// Catalog id of the font to use.
    pub font_id: String,
    /// Fill color.
    pub text_color: Rgb8,
    /// Stroke color, used when `outline_width > 0`.
    pub outline_color: Rgb8,
    /// Outline thickness in pixels outside the glyph edge, `0..=20`.
    pub outline_width: u32,
    /// Whether to draw a blurred drop shadow.
    pub shadow: bool,
}

impl TextStyle {
    /// Fill-only style with a white outline color, no outline and no shadow.
    pub fn new(font_id: impl Into<String>, text_color: Rgb8) -> Self {
        Self {
            font_id: font_id.into(),
            text_color,
            outline_color: Rgb8::WHITE,
            outline_width: 0,
            shadow: false,
        }
    }
}

/// Canvas sizing mode.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Fixed 256x256 canvas; font size grows to fill it.
    #[default]
    Square,
    /// Fixed height; width follows the text at a fixed font size.
    Banner,
}

/// Horizontal alignment of each text line.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Flush to the left margin.
    Left,
    /// Equal margins.
    #[default]
    Center,
    /// Flush to the right margin.
    Right,
}

/// Animation settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Effect to apply.
    pub kind: MotionKind,
    /// Magnitude tier.
    pub intensity: Intensity,
    /// Speed multiplier, `> 0`.
    pub speed: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            kind: MotionKind::None,
            intensity: Intensity::Medium,
            speed: 1.0,
        }
    }
}

impl Motion {
    /// Motion of `kind` at medium intensity and unit speed.
    pub fn of(kind: MotionKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

/// Animation effect.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MotionKind {
    /// Static output.
    #[default]
    None,
    /// Random per-frame jitter.
    Shake,
    /// Rotation about the canvas center.
    Spin,
    /// Sinusoidal vertical displacement.
    Bounce,
    /// Hue cycling of the text fill.
    Gaming,
}

/// Motion magnitude tier.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    /// Smallest magnitude.
    Low,
    /// Default magnitude.
    #[default]
    Medium,
    /// Largest magnitude.
    High,
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;
