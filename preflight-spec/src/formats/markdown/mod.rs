//! Markdown format implementation
//!
//! This module implements bidirectional conversion between [`Spec`] values and
//! the Preflight Markdown dialect.
//!
//! # Library Choice
//!
//! We use the `comrak` crate for the block-level parse. The reader only needs
//! top-level headings, paragraphs, fenced code and HTML blocks, which
//! [`blocks`] extracts from Comrak's tree. Serialization is hand-written (see
//! [`serializer`]) because the canonical layout is exact.
//!
//! # Element Mapping Table
//!
//! | Spec field              | Markdown                                   | Notes                                 |
//! |-------------------------|--------------------------------------------|---------------------------------------|
//! | spec_version            | `spec-version:` in `---` front matter      | Must be in `SUPPORTED_VERSIONS`       |
//! | name                    | `# Heading`                                | First H1                              |
//! | description             | Paragraphs between H1 and first `##`       | Joined with a blank line              |
//! | query                   | Fence under `## Query`                     | Written with `taxiql` info string     |
//! | data_sources            | `### Label` under `## Data Sources`        | One stub per H3                       |
//! |   operation_name, mode  | `<!-- operation: x, mode: stream -->`      | May be split over several comments    |
//! |   parameters            | `Request:` + fence                         | Request-response only                 |
//! |   response              | `Response:` + fence                        | Request-response only, last one wins  |
//! |   messages              | `Message:` + fence, repeated               | Stream only, at least one             |
//! | expected_result         | Fence under `## Expected Result`           | `json` or `json typedInstance`        |
//! | result_format           | Info string of the expected result fence   |                                       |
//! | flow                    | Fence under `## Flow`                      | Written with `mermaid` info string    |
//!
//! Any other `##` section is skipped entirely, as is prose that is not a
//! `Label:` paragraph directly ahead of a fence.
//!
//! # Round Trip
//!
//! For every spec that satisfies the model invariants, parsing the serialized
//! text returns an equal spec, and serializing that again returns the same
//! text. Fenced content keeps its inner formatting; trailing whitespace is
//! trimmed on read.

pub mod blocks;
pub mod directive;
pub mod frontmatter;
pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use crate::model::Spec;

/// Format implementation for the Markdown dialect
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Preflight Markdown test spec"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn parse(&self, source: &str, filename: Option<&str>) -> Result<Spec, FormatError> {
        Ok(parser::parse_spec(source, filename)?)
    }

    fn serialize(&self, spec: &Spec) -> Result<String, FormatError> {
        Ok(serializer::serialize_spec(spec))
    }
}
