//! Directive comments
//!
//! A directive is a one-line HTML comment of comma-separated `key: value`
//! pairs, e.g. `<!-- operation: priceStream, mode: stream -->`. Anything that
//! is not shaped like a comment, or has no pairs in it, parses to an empty map
//! so ordinary prose comments are harmless.

use std::collections::BTreeMap;

pub type Directives = BTreeMap<String, String>;

/// Parse a single comment into its key/value pairs.
pub fn parse(comment: &str) -> Directives {
    let mut directives = Directives::new();

    let Some(inner) = comment_body(comment.trim()) else {
        return directives;
    };

    for segment in inner.split(',') {
        let Some((key, value)) = segment.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        directives.insert(key.to_string(), value.trim().to_string());
    }

    directives
}

/// Merge several comments; a key set by a later comment replaces an earlier one.
pub fn parse_all<I, S>(comments: I) -> Directives
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    comments
        .into_iter()
        .fold(Directives::new(), |mut merged, comment| {
            merged.extend(parse(comment.as_ref()));
            merged
        })
}

fn comment_body(trimmed: &str) -> Option<&str> {
    // "<!--" and "-->" must not overlap, so "<!-->" is not a comment.
    if trimmed.len() < "<!---->".len() {
        return None;
    }
    let inner = trimmed.strip_prefix("<!--")?.strip_suffix("-->")?.trim();
    (!inner.is_empty()).then_some(inner)
}
