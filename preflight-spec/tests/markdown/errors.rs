//! Reader error reporting

use crate::common::fixture;
use preflight_spec::{read_spec, read_spec_with_filename, ParseErrorKind, SpecParseError};

fn read_err(source: &str) -> SpecParseError {
    read_spec_with_filename(source, "broken.spec.md").unwrap_err()
}

#[test]
fn test_missing_front_matter() {
    let source = fixture("minimal.spec.md").replacen("---\nspec-version: 0.1\n---\n\n", "", 1);
    let err = read_err(&source);
    assert_eq!(err.kind, ParseErrorKind::MissingFrontMatter);
    assert!(err.to_string().contains("must start with ---"));
}

#[test]
fn test_missing_spec_version() {
    let source = fixture("minimal.spec.md").replace("spec-version: 0.1", "owner: checkout");
    let err = read_err(&source);
    assert_eq!(err.kind, ParseErrorKind::MissingSpecVersion);
    assert!(err.to_string().contains("spec-version"));
}

#[test]
fn test_unsupported_spec_version() {
    let source = fixture("minimal.spec.md").replace("spec-version: 0.1", "spec-version: 0.3");
    let message = read_err(&source).to_string();
    assert!(message.contains("Unsupported spec version"));
    assert!(message.contains("0.3"));
}

#[test]
fn test_stream_without_messages() {
    let source = fixture("stream.spec.md").replace(
        "Message:\n```json\n{ \"price\": 100 }\n```\n\nMessage:\n```json\n{ \"price\": 200 }\n```\n\n",
        "",
    );
    let err = read_err(&source);
    assert_eq!(err.kind, ParseErrorKind::EmptyStream);
    assert_eq!(err.filename.as_deref(), Some("broken.spec.md"));
    assert_eq!(err.section.as_deref(), Some("Price Feed"));
    assert_eq!(err.line, Some(17));
    assert_eq!(
        err.to_string(),
        "Preflight spec parse error in broken.spec.md (section: Price Feed) at line 17: \
         Stream-mode stub must have at least one Message block."
    );
}

#[test]
fn test_missing_heading() {
    let source = fixture("minimal.spec.md").replace("# Minimal Test\n\n", "");
    assert_eq!(read_err(&source).kind, ParseErrorKind::MissingHeading);
}

#[test]
fn test_missing_query() {
    let source = fixture("minimal.spec.md").replace("## Query\n\n```taxiql\nfind { Customer }\n```\n\n", "");
    assert_eq!(
        read_err(&source).kind,
        ParseErrorKind::MissingSection("Query".to_string())
    );
}

#[test]
fn test_missing_data_sources_section() {
    let source = fixture("minimal.spec.md").replace("## Data Sources\n\n", "## Stubs\n\n");
    let err = read_err(&source);
    assert_eq!(
        err.kind,
        ParseErrorKind::MissingSection("Data Sources".to_string())
    );
    assert!(err.to_string().contains("Missing required section: ## Data Sources"));
}

#[test]
fn test_empty_data_sources() {
    let source = fixture("minimal.spec.md").replace("### Get Customer\n", "Nothing stubbed here.\n\n");
    let err = read_err(&source);
    assert_eq!(err.kind, ParseErrorKind::EmptyDataSources);
    assert_eq!(err.section.as_deref(), Some("Data Sources"));
}

#[test]
fn test_missing_expected_result() {
    let source = fixture("minimal.spec.md").replace("## Expected Result", "## Result");
    assert_eq!(
        read_err(&source).kind,
        ParseErrorKind::MissingSection("Expected Result".to_string())
    );
}

#[test]
fn test_stub_without_directive() {
    let source = fixture("minimal.spec.md").replace("<!-- operation: getCustomer -->\n", "");
    let err = read_err(&source);
    assert_eq!(
        err.kind,
        ParseErrorKind::MissingDirective {
            label: "Get Customer".to_string()
        }
    );
    assert_eq!(err.line, Some(15));
    assert!(err.to_string().contains("\"Get Customer\""));
}

#[test]
fn test_directive_without_operation() {
    let source =
        fixture("minimal.spec.md").replace("<!-- operation: getCustomer -->", "<!-- mode: request-response -->");
    let err = read_err(&source);
    assert_eq!(err.kind, ParseErrorKind::MissingOperationName);
    assert_eq!(err.section.as_deref(), Some("Get Customer"));
}

#[test]
fn test_error_without_filename() {
    let source = fixture("minimal.spec.md").replace("# Minimal Test\n\n", "");
    let message = read_spec(&source).unwrap_err().to_string();
    assert!(message.starts_with("Preflight spec parse error: "));
}
