//! Markdown ↔ JSON conversion through the registry

use crate::common::fixture;
use preflight_spec::{FormatError, FormatRegistry, ParseErrorKind, StubMode};

#[test]
fn test_markdown_json_markdown_is_lossless() {
    let registry = FormatRegistry::default();
    for name in ["minimal.spec.md", "stream.spec.md", "kitchensink.spec.md"] {
        let markdown = fixture(name);
        let spec = registry.parse(&markdown, "markdown", Some(name)).unwrap();
        let json = registry.serialize(&spec, "json").unwrap();
        let back = registry.parse(&json, "json", None).unwrap();
        assert_eq!(back, spec, "{name}");
    }
}

#[test]
fn test_json_field_names() {
    let registry = FormatRegistry::default();
    let spec = registry
        .parse(&fixture("kitchensink.spec.md"), "markdown", None)
        .unwrap();
    let json = registry.serialize(&spec, "json").unwrap();

    for key in [
        "\"specVersion\"",
        "\"dataSources\"",
        "\"operationName\"",
        "\"expectedResult\"",
        "\"resultFormat\": \"typedInstance\"",
        "\"mode\": \"request-response\"",
        "\"mode\": \"stream\"",
        "\"parameters\"",
        "\"flow\"",
    ] {
        assert!(json.contains(key), "missing {key} in {json}");
    }
    assert!(json.ends_with("}\n"));
}

#[test]
fn test_json_defaults() {
    let source = r#"{
        "name": "Defaults",
        "query": "find { Customer }",
        "dataSources": [
            { "label": "Get Customer", "operationName": "getCustomer", "mode": "request-response" }
        ],
        "expectedResult": "{}"
    }"#;
    let spec = FormatRegistry::default().parse(source, "json", None).unwrap();
    assert_eq!(spec.spec_version, "0.1");
    assert_eq!(spec.data_sources[0].mode(), StubMode::RequestResponse);
    assert_eq!(spec.data_sources[0].response(), None);
}

#[test]
fn test_json_is_validated_like_markdown() {
    let source = r#"{
        "specVersion": "0.1",
        "name": "Empty Stream",
        "query": "stream { Price }",
        "dataSources": [
            { "label": "Feed", "operationName": "priceStream", "mode": "stream", "messages": [] }
        ],
        "expectedResult": "[]"
    }"#;
    match FormatRegistry::default()
        .parse(source, "json", Some("empty.json"))
        .unwrap_err()
    {
        FormatError::Parse(err) => {
            assert_eq!(err.kind, ParseErrorKind::EmptyStream);
            assert_eq!(err.filename.as_deref(), Some("empty.json"));
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_malformed_json() {
    let err = FormatRegistry::default()
        .parse("{ not json", "json", None)
        .unwrap_err();
    assert!(matches!(err, FormatError::Json(_)));
}
