use super::*;

use crate::assets::fonts::FontAsset;

const FONT_PATH: &str = "tests/data/fonts/DejaVuSans-Bold.ttf";

fn catalog() -> FontCatalog {
    let bytes = std::fs::read(FONT_PATH).unwrap();
    FontCatalog::from_assets([FontAsset {
        id: "dejavu_sans_bold".to_string(),
        name: "DejaVu Sans Bold".to_string(),
        path: None,
        resource: FontResource::from_bytes(bytes),
    }])
}

fn lines(text: &str) -> Vec<String> {
    split_lines(text)
}

fn layout(
    text: &str,
    mode: LayoutMode,
    alignment: Alignment,
    outline: u32,
) -> EmojifyResult<GlyphRun> {
    TextLayoutEngine::new().layout(
        &catalog(),
        &lines(text),
        "dejavu_sans_bold",
        mode,
        alignment,
        outline,
    )
}

#[test]
fn unknown_font_wins_over_empty_text() {
    let err = TextLayoutEngine::new()
        .layout(
            &catalog(),
            &lines(""),
            "missing",
            LayoutMode::Square,
            Alignment::Center,
            0,
        )
        .unwrap_err();
    assert!(matches!(err, EmojifyError::FontNotFound(ref id) if id == "missing"));
}

#[test]
fn blank_text_is_empty_text() {
    for text in ["", "   ", "\n \n\t"] {
        let err = layout(text, LayoutMode::Square, Alignment::Center, 0).unwrap_err();
        assert!(matches!(err, EmojifyError::EmptyText), "{text:?}");
    }
}

#[test]
fn normalize_keeps_inner_blank_lines_only() {
    let got = normalize_lines(&lines("\n  \nab  \n\ncd\n \n")).unwrap();
    assert_eq!(got, vec!["ab", "", "cd"]);

    let got = normalize_lines(&["a\nb".to_string()]).unwrap();
    assert_eq!(got, vec!["a", "b"]);
}

#[test]
fn square_canvas_is_fixed_and_block_fits() {
    let run = layout("Hi", LayoutMode::Square, Alignment::Center, 0).unwrap();
    assert_eq!(run.canvas, Canvas::new(256, 256).unwrap());
    let available = (CANVAS_SIZE - 2 * SAFETY_MARGIN) as f32;
    assert!(run.bounding_box.width <= available);
    assert!(run.bounding_box.height <= available);
    assert!(run.font_size > 10);
}

#[test]
fn square_font_size_is_maximal() {
    for (text, outline) in [("Hi", 0u32), ("WWWW", 5), ("a\nlonger line", 2), ("草", 0)] {
        let run = layout(text, LayoutMode::Square, Alignment::Center, outline).unwrap();
        let available = (CANVAS_SIZE - 2 * SAFETY_MARGIN) as f32;
        let fits = |block: &ShapedBlock| {
            block.width + 2.0 * outline as f32 <= available
                && block.height + 2.0 * outline as f32 <= available
        };

        let mut engine = TextLayoutEngine::new();
        let cat = catalog();
        let resource = &cat.lookup("dejavu_sans_bold").unwrap().resource;
        let family = engine.register("dejavu_sans_bold", resource).unwrap();
        let normalized = normalize_lines(&lines(text)).unwrap();

        let at = engine
            .shape_block(&family, resource, &normalized, run.font_size as f32)
            .unwrap();
        assert!(fits(&at), "{text}: size {} should fit", run.font_size);

        if run.font_size < CANVAS_SIZE {
            let above = engine
                .shape_block(&family, resource, &normalized, (run.font_size + 1) as f32)
                .unwrap();
            assert!(!fits(&above), "{text}: size {} should not fit", run.font_size + 1);
        }
    }
}

#[test]
fn outline_shrinks_square_font_size() {
    let plain = layout("WWWW", LayoutMode::Square, Alignment::Center, 0).unwrap();
    let outlined = layout("WWWW", LayoutMode::Square, Alignment::Center, 20).unwrap();
    assert!(outlined.font_size < plain.font_size);
    assert_eq!(outlined.outline_width, 20);
}

#[test]
fn banner_width_follows_text() {
    let short = layout("ab", LayoutMode::Banner, Alignment::Center, 0).unwrap();
    let long = layout("abcdefgh", LayoutMode::Banner, Alignment::Center, 0).unwrap();
    assert_eq!(short.font_size, BANNER_FONT_SIZE);
    assert_eq!(short.canvas.height, CANVAS_SIZE);
    assert_eq!(long.canvas.height, CANVAS_SIZE);
    assert!(long.canvas.width > short.canvas.width);

    let ink_w = short.lines[0].ink.width();
    assert_eq!(short.canvas.width, ink_w.ceil() as u32 + 2 * SAFETY_MARGIN);

    let outlined = layout("ab", LayoutMode::Banner, Alignment::Center, 4).unwrap();
    assert_eq!(outlined.canvas.width, short.canvas.width + 8);
}

#[test]
fn alignment_positions_each_line() {
    let text = "i\nwide line";
    let outline = 3u32;
    let inset = (SAFETY_MARGIN + outline) as f32;

    let left = layout(text, LayoutMode::Square, Alignment::Left, outline).unwrap();
    for line in &left.lines {
        assert!((line.origin_x + line.ink.left - inset).abs() < 1e-3);
    }

    let right = layout(text, LayoutMode::Square, Alignment::Right, outline).unwrap();
    let w = right.canvas.width as f32;
    for line in &right.lines {
        assert!((line.origin_x + line.ink.right - (w - inset)).abs() < 1e-3);
    }

    let center = layout(text, LayoutMode::Square, Alignment::Center, outline).unwrap();
    for line in &center.lines {
        let left_gap = line.origin_x + line.ink.left;
        let right_gap = w - (line.origin_x + line.ink.right);
        assert!((left_gap - right_gap).abs() < 1e-3);
    }
    assert!(center.lines[0].origin_x > center.lines[1].origin_x);
}

#[test]
fn lines_stack_with_gap_and_block_is_centered() {
    let run = layout("ab\ncd\nef", LayoutMode::Square, Alignment::Center, 0).unwrap();
    assert_eq!(run.lines.len(), 3);
    let gap = LINE_GAP_RATIO * run.font_size as f32;
    for pair in run.lines.windows(2) {
        let expected = pair[0].origin_y + pair[0].height + gap;
        assert!((pair[1].origin_y - expected).abs() < 1e-3);
    }

    let ink = run.canvas_ink().unwrap();
    let h = run.canvas.height as f32;
    assert!((ink.top - (h - ink.bottom)).abs() < 1e-2);
}

#[test]
fn glyphs_land_inside_the_canvas() {
    let run = layout("Hello\nWorld", LayoutMode::Square, Alignment::Center, 0).unwrap();
    let glyphs: Vec<_> = run.canvas_glyphs().collect();
    assert_eq!(glyphs.len(), 10);
    for g in glyphs {
        assert!(g.x >= 0.0 && g.x < run.canvas.width as f32);
        assert!(g.y > 0.0 && g.y < run.canvas.height as f32);
    }
}

fn assert_ink_inside_margin(run: &GlyphRun, label: &str) {
    let ink = run.canvas_ink().unwrap();
    let inset = (SAFETY_MARGIN + run.outline_width) as f32 - 1e-3;
    let w = run.canvas.width as f32;
    let h = run.canvas.height as f32;
    assert!(ink.left >= inset, "{label}: left {}", ink.left);
    assert!(ink.top >= inset, "{label}: top {}", ink.top);
    assert!(ink.right <= w - inset, "{label}: right {}", ink.right);
    assert!(ink.bottom <= h - inset, "{label}: bottom {}", ink.bottom);
}

#[test]
fn overhanging_glyphs_fit_by_ink() {
    for (text, alignment, outline) in [
        ("jjjj", Alignment::Center, 5),
        ("jjjj", Alignment::Left, 0),
        ("fff", Alignment::Right, 5),
        ("Åj", Alignment::Center, 5),
    ] {
        let run = layout(text, LayoutMode::Square, alignment, outline).unwrap();
        assert_ink_inside_margin(&run, text);
    }
}

#[test]
fn left_and_right_are_flush_by_ink() {
    let left = layout("jjjj", LayoutMode::Square, Alignment::Left, 0).unwrap();
    let ink = left.canvas_ink().unwrap();
    assert!((ink.left - SAFETY_MARGIN as f32).abs() < 1e-3);
    // `j` hangs left of its origin.
    assert!(left.lines[0].ink.left < 0.0);

    let right = layout("fff", LayoutMode::Square, Alignment::Right, 3).unwrap();
    let ink = right.canvas_ink().unwrap();
    assert!((ink.right - (CANVAS_SIZE - SAFETY_MARGIN - 3) as f32).abs() < 1e-3);
}

#[test]
fn ink_is_tighter_than_the_line_box() {
    let run = layout("ace", LayoutMode::Square, Alignment::Center, 0).unwrap();
    let line = &run.lines[0];
    assert!(line.ink.height() < line.height);
    assert!(line.ink.top > 0.0);
}

#[derive(Clone, Default)]
struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn tall_banner_is_reported() {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();

    let (tall, short) = tracing::subscriber::with_default(subscriber, || {
        let tall = layout("A\nB\nC\nD\nE", LayoutMode::Banner, Alignment::Center, 0).unwrap();
        let before = captured.0.lock().unwrap().len();
        let short = layout("AB", LayoutMode::Banner, Alignment::Center, 0).unwrap();
        let after = captured.0.lock().unwrap().len();
        assert_eq!(before, after, "a short banner must not warn");
        (tall, short)
    });

    assert_eq!(tall.canvas.height, CANVAS_SIZE);
    assert!(tall.bounding_box.height > CANVAS_SIZE as f32);
    assert!(short.bounding_box.height < CANVAS_SIZE as f32);
    let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(log.contains("taller than the canvas"), "{log}");
}
