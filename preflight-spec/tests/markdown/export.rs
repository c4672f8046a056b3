//! Export tests for Markdown format (Spec → Markdown)

use crate::common::fixture;
use insta::assert_snapshot;
use preflight_spec::format::Format;
use preflight_spec::formats::markdown::MarkdownFormat;
use preflight_spec::{read_spec, write_spec};

#[test]
fn test_canonical_fixtures_are_fixed_points() {
    for name in ["minimal.spec.md", "stream.spec.md"] {
        let source = fixture(name);
        let spec = read_spec(&source).unwrap();
        assert_eq!(write_spec(&spec), source, "{name} is not canonical");
    }
}

#[test]
fn test_kitchensink_canonical() {
    let spec = read_spec(&fixture("kitchensink.spec.md")).unwrap();
    let canonical = MarkdownFormat.serialize(&spec).unwrap();
    assert_snapshot!("kitchensink_canonical", canonical);
}

#[test]
fn test_embedded_fence_survives() {
    let mut spec = read_spec(&fixture("minimal.spec.md")).unwrap();
    spec.flow = Some("```\nnot a closing fence for the outer block\n```".to_string());

    let written = write_spec(&spec);
    assert!(written.contains("````mermaid\n```\n"));
    assert_eq!(read_spec(&written).unwrap(), spec);
}

#[test]
fn test_parse_through_format_trait() {
    let source = fixture("stream.spec.md");
    let spec = MarkdownFormat.parse(&source, Some("stream.spec.md")).unwrap();
    assert_eq!(spec.name, "Price Stream");
    assert_eq!(MarkdownFormat.file_extensions(), &["md", "markdown"]);
}
