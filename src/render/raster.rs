use crate::{
    foundation::{
        error::{EmojifyError, EmojifyResult},
        frame::{Canvas, Frame, premul_rgba8, unpremul_rgba8},
    },
    layout::text::GlyphRun,
};

/// How glyph outlines are painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum GlyphPaint {
    Fill,
    Stroke { width: f64 },
}

/// A vello_cpu context plus its target pixmap, sized to one canvas.
pub(crate) struct Surface {
    pub(crate) canvas: Canvas,
    pub(crate) ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl Surface {
    pub(crate) fn new(canvas: Canvas) -> EmojifyResult<Self> {
        let (w, h) = canvas.as_u16()?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Draw every glyph of `run` in straight RGBA `color`, shifted by `offset`.
    pub(crate) fn draw_glyphs(
        &mut self,
        run: &GlyphRun,
        font: &vello_cpu::peniko::FontData,
        color: [u8; 4],
        paint: GlyphPaint,
        offset: (f64, f64),
    ) {
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate(offset));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color[0], color[1], color[2], color[3],
        ));

        let glyphs = run.canvas_glyphs().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: g.x,
            y: g.y,
        });
        // Round joins keep the stroke within `width / 2` of the outline at sharp corners.
        if let GlyphPaint::Stroke { width } = paint {
            self.ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(width).with_join(vello_cpu::kurbo::Join::Round),
            );
        }
        // Unhinted, so painted ink matches the outline extents the layout measured.
        let builder = self
            .ctx
            .glyph_run(font)
            .font_size(run.font_size as f32)
            .hint(false);
        match paint {
            GlyphPaint::Fill => builder.fill_glyphs(glyphs),
            GlyphPaint::Stroke { .. } => builder.stroke_glyphs(glyphs),
        }
    }

    /// Paint a canvas-sized image under `transform`.
    pub(crate) fn draw_image(
        &mut self,
        image: &vello_cpu::Image,
        transform: vello_cpu::kurbo::Affine,
    ) {
        self.ctx.set_transform(transform);
        self.ctx.set_paint(image.clone());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        ));
    }

    /// Rasterize everything drawn so far and return premultiplied RGBA8 bytes.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.pixmap.data_as_u8_slice().to_vec()
    }
}

pub(crate) fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    canvas: Canvas,
) -> EmojifyResult<vello_cpu::Pixmap> {
    let (w, h) = canvas.as_u16()?;
    if rgba8_premul.len() != canvas.pixel_count() * 4 {
        return Err(EmojifyError::internal("pixmap byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(canvas.pixel_count());
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Image paint over premultiplied canvas-sized bytes, shareable across threads.
pub(crate) fn image_paint(rgba8_premul: &[u8], canvas: Canvas) -> EmojifyResult<vello_cpu::Image> {
    let pixmap = premul_bytes_to_pixmap(rgba8_premul, canvas)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

pub(crate) fn frame_to_premul(frame: &Frame) -> Vec<u8> {
    frame
        .pixels
        .chunks_exact(4)
        .flat_map(|px| premul_rgba8(px[0], px[1], px[2], px[3]))
        .collect()
}

pub(crate) fn premul_to_frame(canvas: Canvas, premul: &[u8]) -> EmojifyResult<Frame> {
    let pixels = premul
        .chunks_exact(4)
        .flat_map(|px| unpremul_rgba8(px[0], px[1], px[2], px[3]))
        .collect();
    Frame::from_rgba8(canvas.width, canvas.height, pixels)
}
