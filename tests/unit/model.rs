use super::*;

fn spec() -> RenderSpec {
    RenderSpec::new("進捗\nどう？", TextStyle::new("noto", Rgb8::new(255, 0, 0)))
}

#[test]
fn new_splits_lines_and_uses_defaults() {
    let s = spec();
    assert_eq!(s.text, vec!["進捗".to_string(), "どう？".to_string()]);
    assert_eq!(s.layout_mode, LayoutMode::Square);
    assert_eq!(s.alignment, Alignment::Center);
    assert_eq!(s.motion.kind, MotionKind::None);
    assert!(!s.is_animated());
}

#[test]
fn split_lines_normalizes_line_endings() {
    assert_eq!(split_lines("a\r\nb\rc"), vec!["a", "b", "c"]);
    assert_eq!(split_lines(""), vec![""]);
}

#[test]
fn content_seed_is_stable_and_field_sensitive() {
    let a = spec();
    assert_eq!(a.content_seed(), spec().content_seed());

    let mut b = spec();
    b.motion.intensity = Intensity::High;
    assert_ne!(a.content_seed(), b.content_seed());

    let mut c = spec();
    c.text = vec!["進捗どう？".to_string()];
    assert_ne!(a.content_seed(), c.content_seed());

    let mut d = spec();
    d.motion.speed = 1.5;
    assert_ne!(a.content_seed(), d.content_seed());
}

#[test]
fn enums_use_lowercase_wire_names() {
    assert_eq!(
        serde_json::to_string(&MotionKind::Gaming).unwrap(),
        "\"gaming\""
    );
    assert_eq!(
        serde_json::from_str::<LayoutMode>("\"banner\"").unwrap(),
        LayoutMode::Banner
    );
    assert!(serde_json::from_str::<Intensity>("\"extreme\"").is_err());
}
