use std::time::Duration;
use wcag_reporter::analyzer::ResponseParser;
use wcag_reporter::{AnalysisConfig, ParseError, RawModelResponse, Severity};

fn raw(text: &str) -> RawModelResponse {
    RawModelResponse::new(text, "llama3.2", Duration::from_millis(2500))
}

#[test]
fn test_bold_headings_with_inline_content() {
    let text = "**Summary:** An image without alternative text.\n\n**Screen Reader Experience:** Announced as \"graphic\" with no name.\n\n**Issues:**\n- **Critical** - WCAG 1.1.1: The image has no text alternative.\n\n**Suggestions:**\n- Describe the image's purpose, not its appearance.";

    let report = ResponseParser::parse(&raw(text), &AnalysisConfig::default()).unwrap();

    assert_eq!(report.summary, "An image without alternative text.");
    assert_eq!(report.screen_reader_experience, "Announced as \"graphic\" with no name.");
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].severity, Some(Severity::Critical));
    assert_eq!(report.issues[0].criterion.as_deref(), Some("1.1.1"));
    assert_eq!(report.issues[0].description, "The image has no text alternative.");
    assert_eq!(
        report.suggestions,
        vec!["Describe the image's purpose, not its appearance.".to_string()]
    );
    assert_eq!(report.elapsed_ms, 2500);
}

#[test]
fn test_missing_optional_sections() {
    let report = ResponseParser::parse(
        &raw("Summary: The checkbox is labelled and keyboard operable."),
        &AnalysisConfig::default(),
    )
    .unwrap();

    assert!(report.passed());
    assert!(report.screen_reader_experience.is_empty());
    assert!(report.suggestions.is_empty());
}

#[test]
fn test_issue_without_severity_or_criterion() {
    let report = ResponseParser::parse(
        &raw("Summary: A text field.\nIssues:\n- The placeholder is used as the only label."),
        &AnalysisConfig::default(),
    )
    .unwrap();

    let issue = &report.issues[0];
    assert_eq!(issue.severity, None);
    assert_eq!(issue.criterion, None);
    assert_eq!(issue.description, "The placeholder is used as the only label.");
    assert_eq!(issue.code_suggestion, None);
}

#[test]
fn test_multiline_issue_keeps_fix_with_its_issue() {
    let text = "Summary: A custom toggle.\n\nIssues:\n1. [Serious] 4.1.2 - The toggle state is not exposed.\n   ```html\n   <div role=\"switch\" aria-checked=\"false\" tabindex=\"0\">Dark mode</div>\n   ```\n2. [Minor] 2.4.7 - Focus outline is faint.\n   Use `outline: 2px solid` on focus.";

    let report = ResponseParser::parse(&raw(text), &AnalysisConfig::default()).unwrap();

    assert_eq!(report.issues.len(), 2);
    assert_eq!(
        report.issues[0].code_suggestion.as_deref(),
        Some("<div role=\"switch\" aria-checked=\"false\" tabindex=\"0\">Dark mode</div>")
    );
    assert_eq!(report.issues[1].severity, Some(Severity::Minor));
    assert_eq!(report.issues[1].criterion.as_deref(), Some("2.4.7"));
    assert_eq!(report.issues[1].code_suggestion.as_deref(), Some("outline: 2px solid"));
}

#[test]
fn test_numbered_headings() {
    let text = "1. Summary\nA link with a vague name.\n2. Screen reader experience\nRead as \"click here, link\".\n3. Issues\n- [Moderate] 2.4.4 - Link purpose is unclear out of context.\n4. Suggestions\nNone";

    let report = ResponseParser::parse(&raw(text), &AnalysisConfig::default()).unwrap();

    assert_eq!(report.summary, "A link with a vague name.");
    assert_eq!(report.screen_reader_experience, "Read as \"click here, link\".");
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].severity, Some(Severity::Moderate));
    assert!(report.suggestions.is_empty());
}

#[test]
fn test_sections_are_located_independently_of_order() {
    let sections = ResponseParser::locate_sections(
        "Issues:\n- [Minor] 1.3.1 - x\n\nSummary: stated last\nSuggestions: none",
    );

    assert_eq!(sections.summary.as_deref(), Some("stated last"));
    assert_eq!(sections.issues.as_deref(), Some("- [Minor] 1.3.1 - x"));
    assert_eq!(sections.suggestions.as_deref(), Some("none"));
    assert_eq!(sections.screen_reader, None);
}

#[test]
fn test_failures() {
    let config = AnalysisConfig::default();

    assert_eq!(ResponseParser::parse(&raw(""), &config), Err(ParseError::EmptyResponse));
    assert_eq!(
        ResponseParser::parse(&raw("The element looks fine to me."), &config),
        Err(ParseError::MissingSummary)
    );
}

#[test]
fn test_split_items_ignores_leading_prose() {
    let items = ResponseParser::split_items("\n- first item\n  continues here\n- second item");
    assert_eq!(items, vec!["first item\n  continues here".to_string(), "second item".to_string()]);
}
