//! Import tests for Markdown format (Markdown → Spec)

use crate::common::fixture;
use preflight_spec::{read_spec, ResultFormat, StubMode};

#[test]
fn test_minimal_scenario() {
    let spec = read_spec(&fixture("minimal.spec.md")).unwrap();

    assert_eq!(spec.spec_version, "0.1");
    assert_eq!(spec.name, "Minimal Test");
    assert_eq!(spec.description, None);
    assert_eq!(spec.query, "find { Customer }");
    assert_eq!(spec.data_sources.len(), 1);

    let stub = &spec.data_sources[0];
    assert_eq!(stub.label, "Get Customer");
    assert_eq!(stub.operation_name, "getCustomer");
    assert_eq!(stub.mode(), StubMode::RequestResponse);
    assert_eq!(stub.response(), Some(r#"{ "id": "1" }"#));
    assert_eq!(stub.parameters(), None);
    assert_eq!(stub.messages(), None);

    assert_eq!(spec.expected_result, r#"{ "id": "1" }"#);
    assert_eq!(spec.result_format, ResultFormat::Json);
    assert_eq!(spec.flow, None);
}

#[test]
fn test_stream_scenario() {
    let spec = read_spec(&fixture("stream.spec.md")).unwrap();

    assert_eq!(
        spec.description.as_deref(),
        Some("Prices arrive as a stream and are collected in order.")
    );
    let stub = &spec.data_sources[0];
    assert_eq!(stub.operation_name, "priceStream");
    assert_eq!(stub.mode(), StubMode::Stream);
    assert_eq!(stub.response(), None);
    assert_eq!(
        stub.messages().unwrap(),
        [r#"{ "price": 100 }"#, r#"{ "price": 200 }"#]
    );
    assert_eq!(spec.result_format, ResultFormat::TypedInstance);
    assert!(spec.expects_collection());
}

#[test]
fn test_kitchensink() {
    let spec = read_spec(&fixture("kitchensink.spec.md")).unwrap();

    assert_eq!(spec.name, "Kitchen Sink");
    assert_eq!(
        spec.description.as_deref(),
        Some(
            "Exercises every construct the reader understands.\n\n\
             Prose between the heading and the first section is the description."
        )
    );
    // The fence under an unknown section never reaches the spec
    assert_eq!(spec.query, "find { Product[] }");
    assert_eq!(spec.data_sources.len(), 2);

    let laptop = &spec.data_sources[0];
    assert_eq!(laptop.operation_name, "getProduct");
    assert_eq!(laptop.parameters(), Some(r#"{ "productId": "PROD-1001" }"#));
    // last Response wins, unlabelled fences are skipped
    assert_eq!(laptop.response(), Some(r#"{ "name": "Laptop", "price": 999 }"#));

    let feed = &spec.data_sources[1];
    assert_eq!(feed.mode(), StubMode::Stream);
    assert_eq!(feed.messages().map(<[String]>::len), Some(3));

    assert_eq!(
        spec.expected_result,
        "[\n  { \"name\": \"Laptop\", \"price\": 999 }\n]"
    );
    assert_eq!(
        spec.flow.as_deref(),
        Some("sequenceDiagram\n    Query->>Catalog: getProduct")
    );
}

#[test]
fn test_directive_split_across_comments() {
    let source = fixture("stream.spec.md").replace(
        "<!-- operation: priceStream, mode: stream -->",
        "<!-- operation: priceStream -->\n<!-- mode: stream -->",
    );
    let spec = read_spec(&source).unwrap();
    assert_eq!(spec.data_sources[0].mode(), StubMode::Stream);
    assert_eq!(spec.data_sources[0].operation_name, "priceStream");
}

#[test]
fn test_unknown_mode_is_request_response() {
    let source = fixture("minimal.spec.md").replace(
        "<!-- operation: getCustomer -->",
        "<!-- operation: getCustomer, mode: bidirectional -->",
    );
    let spec = read_spec(&source).unwrap();
    assert_eq!(spec.data_sources[0].mode(), StubMode::RequestResponse);
    assert_eq!(spec.data_sources[0].response(), Some(r#"{ "id": "1" }"#));
}

#[test]
fn test_message_blocks_ignored_on_request_response_stub() {
    let source = fixture("minimal.spec.md").replace(
        "Response:\n",
        "Message:\n```json\n{ \"ignored\": true }\n```\n\nResponse:\n",
    );
    let spec = read_spec(&source).unwrap();
    assert_eq!(spec.data_sources[0].messages(), None);
    assert_eq!(spec.data_sources[0].response(), Some(r#"{ "id": "1" }"#));
}

#[test]
fn test_request_response_stub_without_response() {
    let source = fixture("minimal.spec.md").replace(
        "<!-- operation: getCustomer -->\n\nResponse:\n```json\n{ \"id\": \"1\" }\n```\n",
        "<!-- operation: getCustomer -->\n",
    );
    let spec = read_spec(&source).unwrap();
    assert_eq!(spec.data_sources[0].response(), None);
}

#[test]
fn test_multiple_stubs_keep_document_order() {
    let second = "### Get Orders\n<!-- operation: getOrders -->\n\nResponse:\n```json\n[]\n```\n\n## Expected Result";
    let source = fixture("minimal.spec.md").replace("## Expected Result", second);
    let spec = read_spec(&source).unwrap();
    let labels: Vec<&str> = spec.data_sources.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Get Customer", "Get Orders"]);
}

#[test]
fn test_extra_front_matter_keys_are_ignored() {
    let source = fixture("minimal.spec.md").replace(
        "spec-version: 0.1\n",
        "spec-version: 0.1\nowner: checkout\ntags: smoke\n",
    );
    assert_eq!(read_spec(&source).unwrap().name, "Minimal Test");
}
