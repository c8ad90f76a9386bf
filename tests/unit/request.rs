use super::*;

fn request(json: &str) -> RenderRequest {
    RenderRequest::from_json(json).unwrap()
}

fn minimal() -> RenderRequest {
    request(r##"{"text": "進捗\nどう？", "style": {"fontId": "noto", "textColor": "#f00"}}"##)
}

#[test]
fn defaults_fill_omitted_sections() {
    let spec = minimal().validate(&Settings::default()).unwrap();
    assert_eq!(spec.text, vec!["進捗", "どう？"]);
    assert_eq!(spec.layout_mode, LayoutMode::Square);
    assert_eq!(spec.alignment, Alignment::Center);
    assert_eq!(spec.style.font_id, "noto");
    assert_eq!(spec.style.text_color, Rgb8::new(255, 0, 0));
    assert_eq!(spec.style.outline_color, Rgb8::WHITE);
    assert_eq!(spec.style.outline_width, 0);
    assert!(!spec.style.shadow);
    assert_eq!(spec.motion, Motion::default());
}

#[test]
fn full_request_maps_every_field() {
    let req = request(
        r##"{
            "text": "GG",
            "layout": {"mode": "banner", "alignment": "right"},
            "style": {"fontId": "x", "textColor": "#00FF00", "outlineColor": "#000",
                      "outlineWidth": 5, "shadow": true},
            "motion": {"type": "gaming", "intensity": "high", "speed": 2.5}
        }"##,
    );
    let spec = req.validate(&Settings::default()).unwrap();
    assert_eq!(spec.layout_mode, LayoutMode::Banner);
    assert_eq!(spec.alignment, Alignment::Right);
    assert_eq!(spec.style.outline_color, Rgb8::BLACK);
    assert_eq!(spec.style.outline_width, 5);
    assert!(spec.style.shadow);
    assert_eq!(spec.motion.kind, MotionKind::Gaming);
    assert_eq!(spec.motion.intensity, Intensity::High);
    assert_eq!(spec.motion.speed, 2.5);
    assert!(spec.is_animated());
}

#[test]
fn text_rules() {
    let settings = Settings::default();

    let mut blank = minimal();
    blank.text = " \n ".to_string();
    assert!(matches!(
        blank.validate(&settings).unwrap_err(),
        EmojifyError::Validation(_)
    ));

    // Characters, not bytes.
    let mut at_limit = minimal();
    at_limit.text = "草".repeat(20);
    at_limit.validate(&settings).unwrap();

    let mut over = minimal();
    over.text = "a".repeat(21);
    assert!(matches!(
        over.validate(&settings).unwrap_err(),
        EmojifyError::Validation(_)
    ));
}

#[test]
fn colors_require_hash_and_hex_digits() {
    for bad in ["FF0000", "#GG0000", "#12345", "red", ""] {
        let mut req = minimal();
        req.style.text_color = bad.to_string();
        assert!(
            matches!(
                req.validate(&Settings::default()).unwrap_err(),
                EmojifyError::Validation(_)
            ),
            "{bad:?}"
        );
    }
}

#[test]
fn numeric_ranges() {
    let settings = Settings::default();

    let mut req = minimal();
    req.style.outline_width = 20;
    req.validate(&settings).unwrap();
    req.style.outline_width = 21;
    assert!(req.validate(&settings).is_err());

    for (speed, ok) in [(0.1, true), (5.0, true), (0.05, false), (5.5, false), (f32::NAN, false)] {
        let mut req = minimal();
        req.motion.speed = speed;
        assert_eq!(req.validate(&settings).is_ok(), ok, "{speed}");
    }
}

#[test]
fn malformed_json_is_validation() {
    for body in [
        "{",
        r#"{"text": "a"}"#,
        r##"{"text": "a", "style": {"fontId": "x", "textColor": "#fff"}, "motion": {"type": "wobble"}}"##,
    ] {
        assert!(matches!(
            RenderRequest::from_json(body).unwrap_err(),
            EmojifyError::Validation(_)
        ));
    }
}
