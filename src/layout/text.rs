use std::collections::HashMap;

use crate::{
    assets::fonts::{FontCatalog, FontResource},
    foundation::error::{EmojifyError, EmojifyResult},
    foundation::frame::Canvas,
    layout::search::largest_fitting,
    model::{Alignment, LayoutMode, split_lines},
};

/// Edge length of the square canvas, and the fixed height of banner canvases.
pub const CANVAS_SIZE: u32 = 256;
/// Clear border kept on every side of the text block.
pub const SAFETY_MARGIN: u32 = 10;
/// Font size used in banner mode.
pub const BANNER_FONT_SIZE: u32 = 64;
/// Gap between stacked lines as a fraction of the font size.
pub const LINE_GAP_RATIO: f32 = 0.1;

/// A glyph positioned relative to its line origin (`y` is the baseline).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    /// Glyph id in the run's font.
    pub id: u32,
    /// Horizontal offset from the line origin.
    pub x: f32,
    /// Baseline offset from the line origin.
    pub y: f32,
}

/// Rectangle enclosing painted glyph outlines, y down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InkBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl InkBox {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    fn union(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    fn shifted(self, dx: f32, dy: f32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }
}

/// One laid-out line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineRun {
    /// Source text of the line.
    pub text: String,
    /// Canvas x of the line's left edge.
    pub origin_x: f32,
    /// Canvas y of the line box top.
    pub origin_y: f32,
    /// Advance width of the line.
    pub width: f32,
    /// Line box height.
    pub height: f32,
    /// Ink extents relative to `(origin_x, origin_y)`.
    pub ink: InkBox,
    /// Glyphs relative to `(origin_x, origin_y)`.
    pub glyphs: Vec<PositionedGlyph>,
}

/// Ink extent of the text block including outline expansion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

/// Positioned text ready for styling.
#[derive(Clone, Debug)]
pub struct GlyphRun {
    /// Chosen font size in pixels.
    pub font_size: u32,
    /// Canvas every frame of this render uses.
    pub canvas: Canvas,
    /// Outline width the layout reserved room for.
    pub outline_width: u32,
    /// Lines top to bottom.
    pub lines: Vec<LineRun>,
    /// Block extent including outline.
    pub bounding_box: BoundingBox,
    /// Font the glyph ids refer to.
    pub font: FontResource,
}

impl GlyphRun {
    /// Canvas-space glyph positions for every line.
    pub fn canvas_glyphs(&self) -> impl Iterator<Item = PositionedGlyph> + '_ {
        self.lines.iter().flat_map(|line| {
            line.glyphs.iter().map(move |g| PositionedGlyph {
                id: g.id,
                x: line.origin_x + g.x,
                y: line.origin_y + g.y,
            })
        })
    }

    /// Union of every line's ink in canvas space, without outline expansion.
    pub fn canvas_ink(&self) -> Option<InkBox> {
        self.lines
            .iter()
            .map(|line| line.ink.shifted(line.origin_x, line.origin_y))
            .reduce(InkBox::union)
    }
}

/// Shaped, unpositioned line at one probe size.
struct ShapedLine {
    text: String,
    advance: f32,
    height: f32,
    ink: InkBox,
    glyphs: Vec<PositionedGlyph>,
}

/// Lines stacked by line box plus gap; `width` and `height` are ink extents.
struct ShapedBlock {
    lines: Vec<ShapedLine>,
    offsets: Vec<f32>,
    ink_top: f32,
    width: f32,
    height: f32,
}

impl ShapedBlock {
    fn new(lines: Vec<ShapedLine>, font_size: f32) -> Self {
        let gap = LINE_GAP_RATIO * font_size;
        let mut offsets = Vec::with_capacity(lines.len());
        let mut ink: Option<InkBox> = None;
        let mut y = 0.0f32;
        for line in &lines {
            offsets.push(y);
            let placed = line.ink.shifted(0.0, y);
            ink = Some(ink.map_or(placed, |acc| acc.union(placed)));
            y += line.height + gap;
        }

        let width = lines.iter().map(|l| l.ink.width()).fold(0.0f32, f32::max);
        let (ink_top, height) = ink.map_or((0.0, 0.0), |b| (b.top, b.height()));
        Self {
            lines,
            offsets,
            ink_top,
            width,
            height,
        }
    }
}

/// Accumulates the control-point hull of one glyph outline. Curves never leave the hull of
/// their control points, so the result encloses every painted pixel.
#[derive(Default)]
struct ExtentPen {
    bounds: Option<(f32, f32, f32, f32)>,
}

impl ExtentPen {
    fn point(&mut self, x: f32, y: f32) {
        self.bounds = Some(match self.bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
}

impl skrifa::outline::OutlinePen for ExtentPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.point(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.point(x, y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.point(cx0, cy0);
        self.point(x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.point(cx0, cy0);
        self.point(cx1, cy1);
        self.point(x, y);
    }

    fn close(&mut self) {}
}

/// Ink of `glyphs` (baseline-relative, y down) at `size_px`, or `None` when nothing paints.
fn glyph_ink(
    font: &FontResource,
    glyphs: &[PositionedGlyph],
    size_px: f32,
) -> EmojifyResult<Option<InkBox>> {
    use skrifa::MetadataProvider as _;

    let font_ref = skrifa::FontRef::from_index(font.bytes(), 0)
        .map_err(|e| EmojifyError::internal(format!("font parse failed: {e}")))?;
    let outlines = font_ref.outline_glyphs();
    let size = skrifa::instance::Size::new(size_px);

    let mut ink: Option<InkBox> = None;
    for g in glyphs {
        let Some(outline) = outlines.get(skrifa::GlyphId::new(g.id)) else {
            continue;
        };
        let mut pen = ExtentPen::default();
        outline
            .draw((size, skrifa::instance::LocationRef::default()), &mut pen)
            .map_err(|e| EmojifyError::internal(format!("glyph {} outline failed: {e}", g.id)))?;
        let Some((x0, y0, x1, y1)) = pen.bounds else {
            continue;
        };
        // Font space is y up; flip around the baseline.
        let glyph = InkBox {
            left: g.x + x0,
            top: g.y - y1,
            right: g.x + x1,
            bottom: g.y - y0,
        };
        ink = Some(ink.map_or(glyph, |acc| acc.union(glyph)));
    }
    Ok(ink)
}

/// Computes canvas geometry and font size, and positions each line.
///
/// Holds Parley contexts that are reused across probes; one engine per render.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    families: HashMap<String, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct an engine whose font collection holds only catalog fonts, so every glyph id
    /// it produces belongs to the requested font.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext {
                collection: parley::fontique::Collection::new(
                    parley::fontique::CollectionOptions {
                        shared: false,
                        system_fonts: false,
                    },
                ),
                source_cache: parley::fontique::SourceCache::default(),
            },
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    /// Lay out `text` with font `font_id` for `mode`, reserving `outline_width` around the glyphs.
    ///
    /// Fitting and alignment use the ink box of the shaped glyphs, so side bearings and
    /// overhangs never push paint into the safety margin.
    ///
    /// Fails with [`EmojifyError::FontNotFound`] before looking at the text, then with
    /// [`EmojifyError::EmptyText`] when no visible line remains after normalization.
    #[tracing::instrument(skip(self, catalog, text), fields(lines = text.len()))]
    pub fn layout(
        &mut self,
        catalog: &FontCatalog,
        text: &[String],
        font_id: &str,
        mode: LayoutMode,
        alignment: Alignment,
        outline_width: u32,
    ) -> EmojifyResult<GlyphRun> {
        let font = catalog.lookup(font_id)?;
        let lines = normalize_lines(text)?;
        let family = self.register(font_id, &font.resource)?;
        let resource = &font.resource;
        let outline = outline_width as f32;

        let (font_size, canvas, block) = match mode {
            LayoutMode::Square => {
                let available = (CANVAS_SIZE - 2 * SAFETY_MARGIN) as f32;
                let size = largest_fitting(1, CANVAS_SIZE, |size| {
                    let block = self.shape_block(&family, resource, &lines, size as f32)?;
                    Ok(block.width + 2.0 * outline <= available
                        && block.height + 2.0 * outline <= available)
                })?;
                let block = self.shape_block(&family, resource, &lines, size as f32)?;
                (size, Canvas::new(CANVAS_SIZE, CANVAS_SIZE)?, block)
            }
            LayoutMode::Banner => {
                let block =
                    self.shape_block(&family, resource, &lines, BANNER_FONT_SIZE as f32)?;
                let width = block.width.ceil() as u32 + 2 * (SAFETY_MARGIN + outline_width);
                let ink_height = block.height + 2.0 * outline;
                if ink_height > CANVAS_SIZE as f32 {
                    tracing::warn!(
                        lines = block.lines.len(),
                        ink_height,
                        canvas_height = CANVAS_SIZE,
                        "banner text is taller than the canvas and will be clipped"
                    );
                }
                (BANNER_FONT_SIZE, Canvas::new(width, CANVAS_SIZE)?, block)
            }
        };
        tracing::debug!(
            font_size,
            canvas_width = canvas.width,
            canvas_height = canvas.height,
            "text layout resolved"
        );

        let inset = SAFETY_MARGIN as f32 + outline;
        let canvas_w = canvas.width as f32;
        let top = (canvas.height as f32 - block.height) / 2.0 - block.ink_top;

        let placed = block
            .lines
            .into_iter()
            .zip(block.offsets)
            .map(|(line, offset)| {
                let origin_x = match alignment {
                    Alignment::Left => inset - line.ink.left,
                    Alignment::Center => (canvas_w - line.ink.width()) / 2.0 - line.ink.left,
                    Alignment::Right => canvas_w - inset - line.ink.right,
                };
                LineRun {
                    text: line.text,
                    origin_x,
                    origin_y: top + offset,
                    width: line.advance,
                    height: line.height,
                    ink: line.ink,
                    glyphs: line.glyphs,
                }
            })
            .collect();

        Ok(GlyphRun {
            font_size,
            canvas,
            outline_width,
            lines: placed,
            bounding_box: BoundingBox {
                width: block.width + 2.0 * outline,
                height: block.height + 2.0 * outline,
            },
            font: resource.clone(),
        })
    }

    fn register(&mut self, font_id: &str, resource: &FontResource) -> EmojifyResult<String> {
        if let Some(family) = self.families.get(font_id) {
            return Ok(family.clone());
        }

        let families = self.font_ctx.collection.register_fonts(resource.blob(), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            EmojifyError::internal(format!("font '{font_id}' registered no families"))
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| EmojifyError::internal(format!("font '{font_id}' family has no name")))?
            .to_string();

        self.families.insert(font_id.to_string(), family.clone());
        Ok(family)
    }

    fn shape_block(
        &mut self,
        family: &str,
        font: &FontResource,
        lines: &[String],
        size_px: f32,
    ) -> EmojifyResult<ShapedBlock> {
        let shaped = lines
            .iter()
            .map(|line| self.shape_line(family, font, line, size_px))
            .collect::<EmojifyResult<Vec<_>>>()?;
        Ok(ShapedBlock::new(shaped, size_px))
    }

    fn shape_line(
        &mut self,
        family: &str,
        font: &FontResource,
        text: &str,
        size_px: f32,
    ) -> EmojifyResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(EmojifyError::internal("font size must be finite and > 0"));
        }

        // Blank lines still occupy a line box.
        let shaped_text = if text.is_empty() { " " } else { text };
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, shaped_text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(shaped_text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        if !text.is_empty() {
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let mut run_x = run.offset();
                    let baseline = run.baseline();
                    glyphs.extend(run.glyphs().map(|g| {
                        let glyph = PositionedGlyph {
                            id: g.id,
                            x: run_x + g.x,
                            y: baseline - g.y,
                        };
                        run_x += g.advance;
                        glyph
                    }));
                }
            }
        }

        let advance = if text.is_empty() { 0.0 } else { layout.width() };
        let height = layout.height();
        // Lines that paint nothing keep their advance box so they still take part in
        // alignment and stacking.
        let ink = glyph_ink(font, &glyphs, size_px)?.unwrap_or(InkBox {
            left: 0.0,
            top: 0.0,
            right: advance,
            bottom: height,
        });

        Ok(ShapedLine {
            text: text.to_string(),
            advance,
            height,
            ink,
            glyphs,
        })
    }
}

/// Split embedded newlines, trim trailing whitespace, and drop leading and trailing blank
/// lines. Fails with [`EmojifyError::EmptyText`] when nothing is left.
pub fn normalize_lines(text: &[String]) -> EmojifyResult<Vec<String>> {
    let lines: Vec<String> = text
        .iter()
        .flat_map(|line| split_lines(line))
        .map(|line| line.trim_end().to_string())
        .collect();

    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => Ok(lines[first..=last].to_vec()),
        _ => Err(EmojifyError::EmptyText),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;
