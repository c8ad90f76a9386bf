//! Process configuration.
//!
//! Defaults are overlaid by an optional JSON file and then by `EMOJIFY_*` environment
//! variables. Values that fail to parse keep their previous setting.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{EmojifyError, EmojifyResult};

/// Top-level settings for a process hosting the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory scanned for font files at startup.
    pub font_directory: PathBuf,

    /// Font id used by callers that do not name one.
    pub default_font_id: String,

    /// Maximum number of characters accepted in request text.
    pub max_text_length: usize,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Rendering limits and animation timing.
    pub engine: EngineConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "emojify=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

/// Engine limits passed into every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ceiling on encoded output size in bytes.
    pub max_output_bytes: usize,

    /// Frames per animated sequence.
    pub frame_count: u32,

    /// Playback rate of animated sequences.
    pub fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_directory: PathBuf::from("./assets/fonts"),
            default_font_id: "noto_sans_jp_bold".to_string(),
            max_text_length: 20,
            logging: LoggingConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_output_bytes: 1024 * 1024,
            frame_count: 20,
            fps: 20,
        }
    }
}

impl EngineConfig {
    /// Reject settings the engine cannot honor.
    pub fn validate(&self) -> EmojifyResult<()> {
        if self.frame_count == 0 {
            return Err(EmojifyError::validation("frame_count must be > 0"));
        }
        if self.fps == 0 {
            return Err(EmojifyError::validation("fps must be > 0"));
        }
        if self.max_output_bytes == 0 {
            return Err(EmojifyError::validation("max_output_bytes must be > 0"));
        }
        Ok(())
    }

    /// Display duration of one animation frame.
    pub fn frame_duration_ms(&self) -> u32 {
        1000 / self.fps.max(1)
    }
}

impl Settings {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    /// Read a JSON settings file, then overlay the process environment.
    pub fn load(path: &Path) -> EmojifyResult<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read settings {}", path.display()))?;
        let mut settings: Self = serde_json::from_str(&content)
            .map_err(|e| EmojifyError::validation(format!("settings {}: {e}", path.display())))?;
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Overlay values from `lookup`, which maps a variable name to its value.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("EMOJIFY_FONT_DIRECTORY") {
            self.font_directory = PathBuf::from(v);
        }
        if let Some(v) = lookup("EMOJIFY_DEFAULT_FONT_ID") {
            self.default_font_id = v;
        }
        if let Some(v) = parsed_var(&lookup, "EMOJIFY_MAX_TEXT_LENGTH") {
            self.max_text_length = v;
        }
        if let Some(kb) = parsed_var::<usize>(&lookup, "EMOJIFY_MAX_IMAGE_SIZE_KB") {
            self.engine.max_output_bytes = kb.saturating_mul(1024);
        }
        if let Some(v) = parsed_var(&lookup, "EMOJIFY_FRAME_COUNT") {
            self.engine.frame_count = v;
        }
        if let Some(v) = parsed_var(&lookup, "EMOJIFY_FPS") {
            self.engine.fps = v;
        }
        if let Some(v) = lookup("EMOJIFY_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("EMOJIFY_LOG_JSON") {
            self.logging.json = matches!(v.trim(), "1" | "true" | "TRUE" | "yes");
        }
    }
}

fn parsed_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
