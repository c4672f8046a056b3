//! Property tests: `read(write(v)) == v` and `write(read(write(v))) == write(v)`

use preflight_spec::{read_spec, write_spec, ResultFormat, Spec, Stub};
use proptest::prelude::*;

/// Characters with a meaning somewhere in CommonMark, plus a few plain ones.
const MARKUP: &str = "#*_`\\[]<>&!.,:;()+-=~|é";

fn word() -> impl Strategy<Value = String> {
    let alphabet: Vec<char> = ('a'..='z')
        .chain('A'..='Z')
        .chain('0'..='9')
        .chain(MARKUP.chars())
        .collect();
    prop::collection::vec(prop::sample::select(alphabet), 1..8)
        .prop_map(|chars| chars.into_iter().collect::<String>())
}

fn title() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..4).prop_map(|words| words.join(" "))
}

fn paragraph() -> impl Strategy<Value = String> {
    prop::collection::vec(title(), 1..3).prop_map(|lines| lines.join("\n"))
}

fn description() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::collection::vec(paragraph(), 1..3).prop_map(|p| p.join("\n\n")))
}

fn json_payload() -> impl Strategy<Value = String> {
    let flat = ("[a-z]{1,6}", 0u32..10_000).prop_map(|(k, v)| format!("{{ \"{k}\": {v} }}"));
    let nested = prop::collection::vec(("[a-z]{1,6}", "[A-Za-z0-9-]{0,10}"), 1..4).prop_map(
        |fields| {
            let body: Vec<String> = fields
                .iter()
                .map(|(k, v)| format!("  \"{k}\": \"{v}\""))
                .collect();
            format!("{{\n{}\n}}", body.join(",\n"))
        },
    );
    prop_oneof![flat, nested]
}

fn stub() -> impl Strategy<Value = Stub> {
    let operation = "[a-z][A-Za-z]{1,10}";
    let request_response = (
        title(),
        operation,
        prop::option::of(json_payload()),
        prop::option::of(json_payload()),
    )
        .prop_map(|(label, op, parameters, response)| {
            let stub = Stub::request_response(label, op, response);
            match parameters {
                Some(parameters) => stub.with_parameters(parameters),
                None => stub,
            }
        });
    let stream = (
        title(),
        operation,
        prop::collection::vec(json_payload(), 1..4),
    )
        .prop_map(|(label, op, messages)| Stub::stream(label, op, messages));
    prop_oneof![request_response, stream]
}

fn spec() -> impl Strategy<Value = Spec> {
    (
        title(),
        description(),
        "[A-Z][a-z]{1,8}",
        prop::collection::vec(stub(), 1..4),
        json_payload(),
        prop_oneof![Just(ResultFormat::Json), Just(ResultFormat::TypedInstance)],
        prop::option::of("[a-z]{1,8}".prop_map(|op| {
            format!("sequenceDiagram\n    Query->>Service: {op}")
        })),
    )
        .prop_map(
            |(name, description, concept, data_sources, expected_result, result_format, flow)| {
                Spec {
                    spec_version: "0.1".to_string(),
                    name,
                    description,
                    query: format!("find {{ {concept} }}"),
                    data_sources,
                    expected_result,
                    result_format,
                    flow,
                }
            },
        )
}

fn minimal() -> Spec {
    Spec {
        spec_version: "0.1".to_string(),
        name: "Minimal Test".to_string(),
        description: None,
        query: "find { Customer }".to_string(),
        data_sources: vec![Stub::request_response(
            "Get Customer",
            "getCustomer",
            Some(r#"{ "id": "1" }"#.to_string()),
        )],
        expected_result: r#"{ "id": "1" }"#.to_string(),
        result_format: ResultFormat::Json,
        flow: None,
    }
}

fn assert_round_trips(spec: Spec) {
    spec.validate().unwrap();
    assert_eq!(read_spec(&write_spec(&spec)).unwrap(), spec);
}

#[test]
fn heading_ending_in_hash_round_trips() {
    let mut spec = minimal();
    spec.name = "Price #".to_string();
    assert_round_trips(spec);
}

#[test]
fn label_with_emphasis_markers_round_trips() {
    let mut spec = minimal();
    spec.data_sources[0].label = "get_*customer*".to_string();
    assert_round_trips(spec);
}

#[test]
fn description_line_break_round_trips() {
    let mut spec = minimal();
    spec.description = Some("line one\nline two".to_string());
    assert_round_trips(spec);
}

#[test]
fn description_lines_that_look_like_blocks_round_trip() {
    let mut spec = minimal();
    spec.description = Some(
        "- not a list\n1. not ordered\n> not a quote\n===\n## not a section\n\n<!-- operation: x -->"
            .to_string(),
    );
    assert_round_trips(spec);
}

proptest! {
    #[test]
    fn read_of_write_is_identity(spec in spec()) {
        prop_assert!(spec.validate().is_ok());
        let written = write_spec(&spec);
        let read = read_spec(&written).unwrap();
        prop_assert_eq!(read, spec);
    }

    #[test]
    fn writer_is_idempotent(spec in spec()) {
        let once = write_spec(&spec);
        let twice = write_spec(&read_spec(&once).unwrap());
        prop_assert_eq!(twice, once);
    }
}
