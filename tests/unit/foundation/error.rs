use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        EmojifyError::font_not_found("x")
            .to_string()
            .contains("font not found: x")
    );
    assert!(
        EmojifyError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert_eq!(EmojifyError::EmptyText.to_string(), "text is empty");
    let err = EmojifyError::SizeBudgetExceeded {
        size: 2048,
        limit: 1024,
    };
    assert!(err.to_string().contains("2048"));
    assert!(err.to_string().contains("1024"));
}

#[test]
fn internal_display_hides_detail_but_keeps_source() {
    let base = std::io::Error::other("boom");
    let err = EmojifyError::from(anyhow::Error::new(base).context("encode apng"));
    assert_eq!(err.to_string(), "internal render failure");

    let source = std::error::Error::source(&err).unwrap();
    assert!(format!("{source:#}").contains("encode apng"));
}

#[test]
fn kinds_are_distinct_and_classified() {
    let errs = [
        EmojifyError::font_not_found("a"),
        EmojifyError::EmptyText,
        EmojifyError::SizeBudgetExceeded { size: 2, limit: 1 },
        EmojifyError::validation("v"),
        EmojifyError::internal("i"),
    ];
    let kinds: std::collections::BTreeSet<_> = errs.iter().map(|e| e.kind()).collect();
    assert_eq!(kinds.len(), errs.len());

    assert!(errs[0].is_client_error());
    assert!(errs[1].is_client_error());
    assert!(!errs[2].is_client_error());
    assert!(errs[3].is_client_error());
    assert!(!errs[4].is_client_error());
}
