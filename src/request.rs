//! Wire-level render request and its validation into a [`RenderSpec`].

use serde::{Deserialize, Serialize};

use crate::{
    config::Settings,
    foundation::{
        color::Rgb8,
        error::{EmojifyError, EmojifyResult},
    },
    model::{
        Alignment, Intensity, LayoutMode, Motion, MotionKind, RenderSpec, TextStyle, split_lines,
    },
};

/// Largest accepted outline width in pixels.
pub const MAX_OUTLINE_WIDTH: u32 = 20;
/// Accepted motion speed range, inclusive.
pub const SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.1..=5.0;

/// JSON request body accepted by hosts of the engine.
///
/// ```json
/// {
///   "text": "進捗\nどう？",
///   "layout": { "mode": "square", "alignment": "center" },
///   "style": { "fontId": "noto_sans_jp_bold", "textColor": "#FF0000" },
///   "motion": { "type": "shake", "intensity": "high" }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// Text to render; `\n` separates lines.
    pub text: String,
    #[serde(default)]
    pub layout: LayoutRequest,
    pub style: StyleRequest,
    #[serde(default)]
    pub motion: MotionRequest,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutRequest {
    pub mode: LayoutMode,
    pub alignment: Alignment,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRequest {
    pub font_id: String,
    pub text_color: String,
    #[serde(default = "default_outline_color")]
    pub outline_color: String,
    #[serde(default)]
    pub outline_width: u32,
    #[serde(default)]
    pub shadow: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MotionRequest {
    #[serde(rename = "type")]
    pub kind: MotionKind,
    pub intensity: Intensity,
    pub speed: f32,
}

impl Default for MotionRequest {
    fn default() -> Self {
        let m = Motion::default();
        Self {
            kind: m.kind,
            intensity: m.intensity,
            speed: m.speed,
        }
    }
}

fn default_outline_color() -> String {
    "#FFFFFF".to_string()
}

impl RenderRequest {
    /// Parse a JSON body. Malformed JSON and unknown enum values are validation errors.
    pub fn from_json(body: &str) -> EmojifyResult<Self> {
        serde_json::from_str(body).map_err(|e| EmojifyError::validation(e.to_string()))
    }

    /// Check every field against `settings` and build the engine-facing [`RenderSpec`].
    ///
    /// Font existence is not checked here; the engine reports unknown ids itself.
    pub fn validate(&self, settings: &Settings) -> EmojifyResult<RenderSpec> {
        if self.text.trim().is_empty() {
            return Err(EmojifyError::validation("text cannot be empty"));
        }
        let chars = self.text.chars().count();
        if chars > settings.max_text_length {
            return Err(EmojifyError::validation(format!(
                "text exceeds maximum length of {} characters",
                settings.max_text_length
            )));
        }

        let style = &self.style;
        if style.outline_width > MAX_OUTLINE_WIDTH {
            return Err(EmojifyError::validation(format!(
                "outlineWidth must be between 0 and {MAX_OUTLINE_WIDTH}"
            )));
        }
        let speed = self.motion.speed;
        if !speed.is_finite() || !SPEED_RANGE.contains(&speed) {
            return Err(EmojifyError::validation(format!(
                "speed must be between {} and {}",
                SPEED_RANGE.start(),
                SPEED_RANGE.end()
            )));
        }

        Ok(RenderSpec {
            text: split_lines(&self.text),
            layout_mode: self.layout.mode,
            alignment: self.layout.alignment,
            style: TextStyle {
                font_id: style.font_id.clone(),
                text_color: parse_color(&style.text_color)?,
                outline_color: parse_color(&style.outline_color)?,
                outline_width: style.outline_width,
                shadow: style.shadow,
            },
            motion: Motion {
                kind: self.motion.kind,
                intensity: self.motion.intensity,
                speed,
            },
        })
    }
}

/// `#RGB` or `#RRGGBB`; the leading `#` is required on the wire.
fn parse_color(s: &str) -> EmojifyResult<Rgb8> {
    if !s.starts_with('#') {
        return Err(EmojifyError::validation(format!("invalid hex color: {s}")));
    }
    Rgb8::parse_hex(s)
}

#[cfg(test)]
#[path = "../tests/unit/request.rs"]
mod tests;
