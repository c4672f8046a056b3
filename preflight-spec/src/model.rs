//! The structured spec model
//!
//! A [`Spec`] is what the Markdown reader produces and the writer consumes. It
//! is a plain immutable value: the execution layer maps `query` to a query run,
//! `data_sources` to stub configuration, and diffs the run's output against
//! `expected_result`.

use crate::error::{ParseErrorKind, SpecParseError};
use serde::{Deserialize, Serialize};

/// Dialect revisions this crate can read.
pub const SUPPORTED_VERSIONS: &[&str] = &["0.1"];

/// The revision the writer stamps on specs built without an explicit one.
pub const CURRENT_VERSION: &str = "0.1";

/// One executable test specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    #[serde(default = "current_version")]
    pub spec_version: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub query: String,
    pub data_sources: Vec<Stub>,
    pub expected_result: String,
    #[serde(default)]
    pub result_format: ResultFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
}

fn current_version() -> String {
    CURRENT_VERSION.to_string()
}

/// How the expected result should be compared against the query output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultFormat {
    #[default]
    Json,
    TypedInstance,
}

impl ResultFormat {
    /// Info string used on the `## Expected Result` fence.
    pub fn info_string(self) -> &'static str {
        match self {
            ResultFormat::Json => "json",
            ResultFormat::TypedInstance => "json typedInstance",
        }
    }

    /// Recover the format from a fence info string.
    pub fn from_info_string(info: &str) -> Self {
        if info.split_whitespace().any(|word| word == "typedInstance") {
            ResultFormat::TypedInstance
        } else {
            ResultFormat::Json
        }
    }
}

/// Whether a stub answers one call or emits a sequence of messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StubMode {
    RequestResponse,
    Stream,
}

impl StubMode {
    /// The value used for `mode` in a directive comment.
    pub fn directive_value(self) -> &'static str {
        match self {
            StubMode::RequestResponse => "request-response",
            StubMode::Stream => "stream",
        }
    }

    /// Map a directive `mode` value. Absent and unrecognized values both give
    /// request-response; callers that care about the distinction check
    /// [`StubMode::is_known_directive_value`].
    pub fn from_directive_value(value: Option<&str>) -> Self {
        match value {
            Some("stream") => StubMode::Stream,
            _ => StubMode::RequestResponse,
        }
    }

    pub fn is_known_directive_value(value: &str) -> bool {
        matches!(value, "request-response" | "stream")
    }
}

impl std::fmt::Display for StubMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.directive_value())
    }
}

/// One mocked collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stub {
    pub label: String,
    pub operation_name: String,
    #[serde(flatten)]
    pub payload: StubPayload,
}

/// The mode-specific half of a stub.
///
/// Request-response stubs carry an optional request (`parameters`) and an
/// optional canned response; stream stubs carry their messages in emission
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum StubPayload {
    RequestResponse {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parameters: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<String>,
    },
    Stream { messages: Vec<String> },
}

impl Stub {
    pub fn request_response(
        label: impl Into<String>,
        operation_name: impl Into<String>,
        response: Option<String>,
    ) -> Self {
        Self {
            label: label.into(),
            operation_name: operation_name.into(),
            payload: StubPayload::RequestResponse {
                parameters: None,
                response,
            },
        }
    }

    pub fn stream(
        label: impl Into<String>,
        operation_name: impl Into<String>,
        messages: Vec<String>,
    ) -> Self {
        Self {
            label: label.into(),
            operation_name: operation_name.into(),
            payload: StubPayload::Stream { messages },
        }
    }

    /// Attach request parameters. Has no effect on stream stubs, which never
    /// carry a request.
    pub fn with_parameters(mut self, json: impl Into<String>) -> Self {
        if let StubPayload::RequestResponse { parameters, .. } = &mut self.payload {
            *parameters = Some(json.into());
        }
        self
    }

    pub fn mode(&self) -> StubMode {
        match self.payload {
            StubPayload::RequestResponse { .. } => StubMode::RequestResponse,
            StubPayload::Stream { .. } => StubMode::Stream,
        }
    }

    pub fn parameters(&self) -> Option<&str> {
        match &self.payload {
            StubPayload::RequestResponse { parameters, .. } => parameters.as_deref(),
            StubPayload::Stream { .. } => None,
        }
    }

    pub fn response(&self) -> Option<&str> {
        match &self.payload {
            StubPayload::RequestResponse { response, .. } => response.as_deref(),
            StubPayload::Stream { .. } => None,
        }
    }

    pub fn messages(&self) -> Option<&[String]> {
        match &self.payload {
            StubPayload::Stream { messages } => Some(messages),
            StubPayload::RequestResponse { .. } => None,
        }
    }
}

impl Spec {
    /// Check the invariants the reader guarantees, for values that did not
    /// come from the reader (JSON input, hand-built fixtures).
    pub fn validate(&self) -> Result<(), SpecParseError> {
        if !SUPPORTED_VERSIONS.contains(&self.spec_version.as_str()) {
            return Err(
                ParseErrorKind::UnsupportedSpecVersion(self.spec_version.clone()).into(),
            );
        }
        if self.name.trim().is_empty() {
            return Err(ParseErrorKind::MissingHeading.into());
        }
        check_heading_text("test name", &self.name)?;
        if let Some(description) = &self.description {
            check_description(description)?;
        }
        if self.query.is_empty() {
            return Err(ParseErrorKind::MissingSection("Query".to_string()).into());
        }
        if self.data_sources.is_empty() {
            return Err(ParseErrorKind::EmptyDataSources.into());
        }
        for stub in &self.data_sources {
            check_heading_text("stub label", &stub.label)?;
            if stub.operation_name.trim().is_empty() {
                return Err(SpecParseError::new(ParseErrorKind::MissingOperationName)
                    .with_section(stub.label.clone()));
            }
            check_operation_name(&stub.operation_name)
                .map_err(|err| err.with_section(stub.label.clone()))?;
            if stub.messages().is_some_and(<[String]>::is_empty) {
                return Err(SpecParseError::new(ParseErrorKind::EmptyStream)
                    .with_section(stub.label.clone()));
            }
        }
        if self.expected_result.is_empty() {
            return Err(ParseErrorKind::MissingSection("Expected Result".to_string()).into());
        }
        Ok(())
    }
}

fn unwritable(field: &'static str, problem: &'static str) -> SpecParseError {
    ParseErrorKind::UnwritableText { field, problem }.into()
}

fn is_unwritable_char(c: char) -> bool {
    c.is_control() && c != '\t'
}

/// A heading is one line, and Comrak trims the whitespace around it.
fn check_heading_text(field: &'static str, text: &str) -> Result<(), SpecParseError> {
    if text.contains(['\n', '\r']) {
        return Err(unwritable(field, "spans several lines"));
    }
    if text.chars().any(is_unwritable_char) {
        return Err(unwritable(field, "contains control characters"));
    }
    if text.trim() != text {
        return Err(unwritable(field, "has leading or trailing whitespace"));
    }
    Ok(())
}

/// Paragraphs are separated by one blank line and hold non-blank lines
/// without surrounding whitespace.
fn check_description(description: &str) -> Result<(), SpecParseError> {
    const FIELD: &str = "description";
    if description.trim().is_empty() {
        return Err(unwritable(FIELD, "is blank"));
    }
    if description.chars().any(|c| c != '\n' && is_unwritable_char(c)) {
        return Err(unwritable(FIELD, "contains control characters"));
    }
    for line in description.split("\n\n").flat_map(|paragraph| paragraph.split('\n')) {
        if line.is_empty() {
            return Err(unwritable(FIELD, "has an extra blank line"));
        }
        if line.trim() != line {
            return Err(unwritable(FIELD, "has a line with leading or trailing whitespace"));
        }
    }
    Ok(())
}

/// Directive values are comma separated inside a one-line HTML comment.
fn check_operation_name(operation: &str) -> Result<(), SpecParseError> {
    const FIELD: &str = "operation name";
    if operation.contains(['\n', '\r', ',']) || operation.contains("-->") {
        return Err(unwritable(FIELD, "contains a line break, a comma or \"-->\""));
    }
    if operation.trim() != operation {
        return Err(unwritable(FIELD, "has leading or trailing whitespace"));
    }
    Ok(())
}
