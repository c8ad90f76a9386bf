//! emojify renders short text into small square or banner images, either as a lossless WebP
//! still or as a looping APNG with a motion effect.
//!
//! The pipeline is synchronous and stateless per call:
//!
//! - Build a [`FontCatalog`] once at startup
//! - Validate a [`RenderRequest`] into a [`RenderSpec`] (or construct one directly)
//! - Call [`render`] from any number of threads, sharing the catalog by reference
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod encode;
pub mod foundation;
pub mod layout;
pub mod logging;
pub mod model;
pub mod motion;
pub mod pipeline;
pub mod render;
pub mod request;

pub use assets::fonts::{FontAsset, FontCatalog, FontResource};
pub use config::{EngineConfig, LoggingConfig, Settings};
pub use encode::{ImageEncoder, OutputFormat};
pub use foundation::color::{Hsl, Rgb8};
pub use foundation::error::{EmojifyError, EmojifyResult};
pub use foundation::frame::{Canvas, FillMask, Frame};
pub use layout::text::{GlyphRun, TextLayoutEngine};
pub use model::{
    Alignment, Intensity, LayoutMode, Motion, MotionKind, RenderSpec, TextStyle,
};
pub use motion::{AnimationSequence, MotionSynthesizer};
pub use pipeline::{
    RenderEvent, RenderObserver, RenderOutcome, RenderResult, TracingObserver, render,
    render_with_observer,
};
pub use render::compose::{StyleCompositor, StyledFrame};
pub use request::RenderRequest;
