//! JSON payload checks
//!
//! The reader treats fenced blocks as opaque text. Before a spec is handed to
//! an execution engine, the payloads that the engine will decode as JSON can
//! be checked here so authors see every broken block at once.

use crate::model::{Spec, StubPayload};
use serde_json::Value;
use std::fmt;

/// Which block of a spec a payload came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadLocation {
    ExpectedResult,
    Request { stub: String },
    Response { stub: String },
    Message { stub: String, index: usize },
}

impl fmt::Display for PayloadLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadLocation::ExpectedResult => write!(f, "Expected Result"),
            PayloadLocation::Request { stub } => write!(f, "{stub} / Request"),
            PayloadLocation::Response { stub } => write!(f, "{stub} / Response"),
            PayloadLocation::Message { stub, index } => {
                write!(f, "{stub} / Message {}", index + 1)
            }
        }
    }
}

/// A payload that is not valid JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadIssue {
    pub location: PayloadLocation,
    pub message: String,
}

impl fmt::Display for PayloadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: invalid JSON ({})", self.location, self.message)
    }
}

/// Check every JSON payload of `spec`, in document order.
pub fn check_payloads(spec: &Spec) -> Vec<PayloadIssue> {
    let mut issues = Vec::new();
    let mut check = |location: PayloadLocation, text: &str| {
        if let Err(err) = serde_json::from_str::<Value>(text) {
            issues.push(PayloadIssue {
                location,
                message: err.to_string(),
            });
        }
    };

    for stub in &spec.data_sources {
        let label = || stub.label.clone();
        match &stub.payload {
            StubPayload::RequestResponse {
                parameters,
                response,
            } => {
                if let Some(parameters) = parameters {
                    check(PayloadLocation::Request { stub: label() }, parameters);
                }
                if let Some(response) = response {
                    check(PayloadLocation::Response { stub: label() }, response);
                }
            }
            StubPayload::Stream { messages } => {
                for (index, message) in messages.iter().enumerate() {
                    check(
                        PayloadLocation::Message {
                            stub: label(),
                            index,
                        },
                        message,
                    );
                }
            }
        }
    }
    check(PayloadLocation::ExpectedResult, &spec.expected_result);

    issues
}

impl Spec {
    /// The expected result decoded as JSON.
    pub fn expected_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.expected_result)
    }

    /// Whether the query is expected to return a collection, i.e. the expected
    /// result is a JSON array.
    pub fn expects_collection(&self) -> bool {
        matches!(self.expected_json(), Ok(Value::Array(_)))
    }
}
