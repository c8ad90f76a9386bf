use crate::{
    foundation::{
        error::EmojifyResult,
        frame::{Canvas, FillMask, Frame},
    },
    layout::text::GlyphRun,
    model::TextStyle,
    render::{
        blur::GaussianKernel,
        composite::over_in_place,
        raster::{GlyphPaint, Surface, premul_to_frame},
    },
};

/// Drop-shadow displacement in pixels, right and down.
pub const SHADOW_OFFSET: (f64, f64) = (4.0, 4.0);
/// Drop-shadow opacity out of 255.
pub const SHADOW_ALPHA: u8 = 128;
/// Drop-shadow blur kernel radius in pixels.
pub const SHADOW_BLUR_RADIUS: u32 = 8;
/// Drop-shadow blur standard deviation in pixels.
pub const SHADOW_BLUR_SIGMA: f32 = 2.5;

/// A composed base frame together with the exact pixels its fill layer covers.
#[derive(Clone, Debug)]
pub struct StyledFrame {
    pub frame: Frame,
    pub fill_mask: FillMask,
}

/// Turns a [`GlyphRun`] into a styled [`Frame`].
///
/// Layers, back to front: optional drop shadow, optional outline, glyph fill. Each layer is
/// rasterized on its own premultiplied surface and merged with source-over.
#[derive(Clone, Copy, Debug, Default)]
pub struct StyleCompositor;

impl StyleCompositor {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(skip_all, fields(font_size = run.font_size, outline = style.outline_width, shadow = style.shadow))]
    pub fn compose(&self, run: &GlyphRun, style: &TextStyle) -> EmojifyResult<StyledFrame> {
        let canvas = run.canvas;
        let font = run.font.to_vello_font();
        let outline = (style.outline_width > 0).then(|| f64::from(style.outline_width) * 2.0);

        let mut acc = vec![0u8; canvas.pixel_count() * 4];

        if style.shadow {
            let shadow = self.shadow_layer(run, &font, outline, canvas)?;
            over_in_place(&mut acc, &shadow, SHADOW_ALPHA)?;
        }

        if let Some(width) = outline {
            let c = style.outline_color;
            let mut surface = Surface::new(canvas)?;
            surface.draw_glyphs(
                run,
                &font,
                [c.r, c.g, c.b, 255],
                GlyphPaint::Stroke { width },
                (0.0, 0.0),
            );
            over_in_place(&mut acc, &surface.finish(), 255)?;
        }

        let c = style.text_color;
        let mut surface = Surface::new(canvas)?;
        surface.draw_glyphs(run, &font, [c.r, c.g, c.b, 255], GlyphPaint::Fill, (0.0, 0.0));
        let fill = surface.finish();
        let fill_mask = FillMask::from_alpha(canvas, &fill)?;
        over_in_place(&mut acc, &fill, 255)?;

        tracing::debug!(fill_pixels = fill_mask.len(), "style layers merged");
        Ok(StyledFrame {
            frame: premul_to_frame(canvas, &acc)?,
            fill_mask,
        })
    }

    fn shadow_layer(
        &self,
        run: &GlyphRun,
        font: &vello_cpu::peniko::FontData,
        outline: Option<f64>,
        canvas: Canvas,
    ) -> EmojifyResult<Vec<u8>> {
        let black = [0, 0, 0, 255];
        let mut surface = Surface::new(canvas)?;
        surface.draw_glyphs(run, font, black, GlyphPaint::Fill, SHADOW_OFFSET);
        if let Some(width) = outline {
            surface.draw_glyphs(run, font, black, GlyphPaint::Stroke { width }, SHADOW_OFFSET);
        }
        let kernel = GaussianKernel::new(SHADOW_BLUR_RADIUS, SHADOW_BLUR_SIGMA)?;
        kernel.apply(canvas, &surface.finish())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
