//! JSON format implementation
//!
//! A direct `serde_json` rendition of [`Spec`], for tooling that generates or
//! consumes specs programmatically. Field names are camelCase and each stub
//! carries its `mode` inline:
//!
//! ```json
//! {
//!   "specVersion": "0.1",
//!   "name": "Stream Test",
//!   "query": "stream { Prices }",
//!   "dataSources": [
//!     { "label": "Prices", "operationName": "priceStream", "mode": "stream", "messages": ["1"] }
//!   ],
//!   "expectedResult": "[1]",
//!   "resultFormat": "json"
//! }
//! ```
//!
//! Parsed values are checked with [`Spec::validate`], so JSON input is held to
//! the same rules as Markdown input.

use crate::error::FormatError;
use crate::format::Format;
use crate::model::Spec;

/// Format implementation for JSON
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Preflight spec as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn parse(&self, source: &str, filename: Option<&str>) -> Result<Spec, FormatError> {
        let spec: Spec = serde_json::from_str(source)?;
        spec.validate()
            .map_err(|err| err.with_filename(filename))?;
        Ok(spec)
    }

    fn serialize(&self, spec: &Spec) -> Result<String, FormatError> {
        let mut json = serde_json::to_string_pretty(spec)?;
        json.push('\n');
        Ok(json)
    }
}
