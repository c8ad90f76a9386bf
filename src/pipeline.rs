//! End-to-end render: layout, styling, optional motion, encoding.

use std::time::Instant;

use crate::{
    assets::fonts::FontCatalog,
    config::EngineConfig,
    encode::{ImageEncoder, OutputFormat},
    foundation::error::{EmojifyError, EmojifyResult},
    layout::text::TextLayoutEngine,
    model::RenderSpec,
    motion::MotionSynthesizer,
    render::compose::StyleCompositor,
};

/// Encoded output of one render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderResult {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Container format of `bytes`.
    pub format: OutputFormat,
    /// `bytes.len()`.
    pub size_bytes: usize,
}

impl RenderResult {
    /// MIME type of the encoded bytes.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// How a render call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    Success,
    /// Failed with the given [`EmojifyError::kind`] label.
    Error(&'static str),
}

impl RenderOutcome {
    /// Stable label, `"success"` or the error kind.
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error(kind) => kind,
        }
    }
}

/// Completion record emitted once per render call.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderEvent {
    /// Wall time of the whole call.
    pub duration_ms: f64,
    pub outcome: RenderOutcome,
    /// Encoded size, when encoding finished.
    pub output_size_bytes: Option<usize>,
    /// Output format, when known.
    pub output_format: Option<OutputFormat>,
}

/// Receives one [`RenderEvent`] per render call.
///
/// Implementations are called on the rendering thread and must not block for long.
pub trait RenderObserver: Send + Sync {
    fn on_render(&self, event: &RenderEvent);
}

/// Default observer: one structured `tracing` event per render.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl RenderObserver for TracingObserver {
    fn on_render(&self, event: &RenderEvent) {
        tracing::info!(
            duration_ms = event.duration_ms,
            outcome = event.outcome.label(),
            output_size_bytes = event.output_size_bytes,
            output_format = event.output_format.map(|f| f.mime_type()),
            "render completed"
        );
    }
}

/// Render `spec` with the default [`TracingObserver`].
pub fn render(
    catalog: &FontCatalog,
    spec: &RenderSpec,
    config: &EngineConfig,
) -> EmojifyResult<RenderResult> {
    render_with_observer(catalog, spec, config, &TracingObserver)
}

/// Render `spec`, reporting completion to `observer` exactly once.
///
/// The first failing stage's error is returned unchanged. Internal failures have their full
/// cause chain logged before they propagate.
#[tracing::instrument(
    skip_all,
    fields(font_id = %spec.style.font_id, mode = ?spec.layout_mode, motion = ?spec.motion.kind)
)]
pub fn render_with_observer(
    catalog: &FontCatalog,
    spec: &RenderSpec,
    config: &EngineConfig,
    observer: &dyn RenderObserver,
) -> EmojifyResult<RenderResult> {
    let started = Instant::now();
    let format = if spec.is_animated() {
        OutputFormat::Apng
    } else {
        OutputFormat::WebP
    };

    let result = run_stages(catalog, spec, config, format);

    if let Err(EmojifyError::Internal(err)) = &result {
        tracing::error!(error = ?err, "internal render failure");
    }

    let event = RenderEvent {
        duration_ms: started.elapsed().as_secs_f64() * 1000.0,
        outcome: match &result {
            Ok(_) => RenderOutcome::Success,
            Err(e) => RenderOutcome::Error(e.kind()),
        },
        output_size_bytes: result.as_ref().ok().map(|r| r.size_bytes),
        output_format: Some(format),
    };
    observer.on_render(&event);
    result
}

fn run_stages(
    catalog: &FontCatalog,
    spec: &RenderSpec,
    config: &EngineConfig,
    format: OutputFormat,
) -> EmojifyResult<RenderResult> {
    config.validate()?;

    let run = TextLayoutEngine::new().layout(
        catalog,
        &spec.text,
        &spec.style.font_id,
        spec.layout_mode,
        spec.alignment,
        spec.style.outline_width,
    )?;
    let styled = StyleCompositor::new().compose(&run, &spec.style)?;

    let encoder = ImageEncoder::new(config.max_output_bytes);
    let bytes = match format {
        OutputFormat::WebP => encoder.encode_still(&styled.frame)?,
        OutputFormat::Apng => {
            let seq = MotionSynthesizer::new(*config).synthesize(
                &styled.frame,
                &styled.fill_mask,
                &spec.motion,
                spec.content_seed(),
            )?;
            encoder.encode_animated(&seq)?
        }
    };

    Ok(RenderResult {
        size_bytes: bytes.len(),
        bytes,
        format,
    })
}
