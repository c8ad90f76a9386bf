//! Byte encoding of still frames and animation sequences under a size ceiling.

mod apng;
mod still;

use crate::{
    foundation::{
        error::{EmojifyError, EmojifyResult},
        frame::Frame,
    },
    motion::AnimationSequence,
};

/// Container format of an encoded render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless WebP still.
    WebP,
    /// Animated PNG.
    Apng,
}

impl OutputFormat {
    /// MIME type for HTTP responses.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::WebP => "image/webp",
            Self::Apng => "image/apng",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Apng => "png",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::WebP => "webp",
            Self::Apng => "apng",
        })
    }
}

/// Encodes frames and rejects output larger than `max_output_bytes`.
///
/// There is no quality downgrade or retry: an oversized result is an error.
#[derive(Clone, Copy, Debug)]
pub struct ImageEncoder {
    max_output_bytes: usize,
}

impl ImageEncoder {
    pub fn new(max_output_bytes: usize) -> Self {
        Self { max_output_bytes }
    }

    /// Lossless WebP bytes for one frame.
    #[tracing::instrument(skip_all, fields(width = frame.width, height = frame.height))]
    pub fn encode_still(&self, frame: &Frame) -> EmojifyResult<Vec<u8>> {
        let bytes = still::encode_webp_lossless(frame)?;
        self.check_budget(bytes)
    }

    /// APNG bytes for a sequence, looping `loop_count` times (`0` forever).
    #[tracing::instrument(skip_all, fields(frames = seq.frames.len()))]
    pub fn encode_animated(&self, seq: &AnimationSequence) -> EmojifyResult<Vec<u8>> {
        let bytes = apng::encode_apng(seq)?;
        self.check_budget(bytes)
    }

    fn check_budget(&self, bytes: Vec<u8>) -> EmojifyResult<Vec<u8>> {
        if bytes.len() > self.max_output_bytes {
            return Err(EmojifyError::SizeBudgetExceeded {
                size: bytes.len(),
                limit: self.max_output_bytes,
            });
        }
        tracing::debug!(size = bytes.len(), "encoded within budget");
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "../tests/unit/encode.rs"]
mod tests;
