use crate::diagnostics::{Diagnostics, Severity};

#[test]
fn starts_empty() {
    let diagnostics = Diagnostics::new();
    assert!(diagnostics.is_empty());
    assert!(!diagnostics.has_errors());
}

#[test]
fn warnings_do_not_count_as_errors() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.warning("pattern 'x' is referenced but never defined");

    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.error_count(), 0);
}

#[test]
fn errors_flip_has_errors() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.warning("w");
    diagnostics.error("e");

    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.len(), 2);
}

#[test]
fn display_includes_position_when_present() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.error_at("missing ';'", 3, 14);
    diagnostics.warning("something minor");

    let rendered: Vec<String> = diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(rendered[0], "error on line 3 column 14: missing ';'");
    assert_eq!(rendered[1], "warning: something minor");
}

#[test]
fn iteration_preserves_order() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.error("first");
    diagnostics.warning("second");
    diagnostics.error("third");

    let severities: Vec<Severity> = diagnostics.iter().map(|d| d.severity).collect();
    assert_eq!(
        severities,
        vec![Severity::Error, Severity::Warning, Severity::Error]
    );
}
