//! Directive comment parsing

use preflight_spec::formats::markdown::directive::{parse, parse_all};

fn map(pairs: &[(&str, &str)]) -> preflight_spec::formats::markdown::directive::Directives {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_single_directive() {
    assert_eq!(
        parse("<!-- operation: getCustomer -->"),
        map(&[("operation", "getCustomer")])
    );
}

#[test]
fn test_empty_comment() {
    assert!(parse("<!---->").is_empty());
}

#[test]
fn test_trailing_comma() {
    assert_eq!(
        parse("<!-- operation: getCustomer, -->"),
        map(&[("operation", "getCustomer")])
    );
}

#[test]
fn test_merge_across_comments() {
    assert_eq!(
        parse_all(["<!-- operation: priceStream -->", "<!-- mode: stream -->"]),
        map(&[("operation", "priceStream"), ("mode", "stream")])
    );
}
