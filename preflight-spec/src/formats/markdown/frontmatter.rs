//! Front matter extraction
//!
//! The dialect's front matter is a flat `key: value` block between two `---`
//! lines. It is not YAML: values are taken verbatim after trimming, lines
//! without a colon are skipped.

use crate::error::{ParseErrorKind, SpecParseError};
use std::collections::BTreeMap;

/// Metadata and body split out of a spec document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub metadata: BTreeMap<String, String>,
    /// Everything after the closing delimiter, joined by `\n`.
    pub body: String,
    /// Number of document lines that precede `body`. Adding this to a 1-based
    /// body line gives the 1-based document line.
    pub body_line_offset: usize,
}

/// Split `source` into front matter metadata and the remaining body.
///
/// The opening delimiter is the first line that is `---` after trimming, the
/// closing one the next such line. Missing either is a
/// [`ParseErrorKind::MissingFrontMatter`].
pub fn extract_front_matter(
    source: &str,
    filename: Option<&str>,
) -> Result<FrontMatter, SpecParseError> {
    let lines: Vec<&str> = source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let missing = || SpecParseError::new(ParseErrorKind::MissingFrontMatter).with_filename(filename);

    let open = lines
        .iter()
        .position(|line| is_delimiter(line))
        .ok_or_else(missing)?;
    let close = lines[open + 1..]
        .iter()
        .position(|line| is_delimiter(line))
        .map(|offset| open + 1 + offset)
        .ok_or_else(missing)?;

    let metadata = lines[open + 1..close]
        .iter()
        .filter_map(|line| parse_entry(line))
        .collect();

    Ok(FrontMatter {
        metadata,
        body: lines[close + 1..].join("\n"),
        body_line_offset: close + 1,
    })
}

fn is_delimiter(line: &str) -> bool {
    line.trim() == "---"
}

fn parse_entry(line: &str) -> Option<(String, String)> {
    let (key, value) = line.trim().split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}
