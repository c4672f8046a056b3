//! Stub plans
//!
//! An execution engine answers each outbound call the query makes with one of
//! the spec's stubs. [`StubPlan`] groups the stubs by operation name and picks
//! the stub for a call:
//!
//!     - An operation's stubs must all share one mode.
//!     - A call without parameters needs exactly one request-response stub.
//!     - A call with parameters picks the stub whose `Request:` object is
//!       equal to them. A stub without `Request:` has empty parameters.
//!     - A streaming operation replays its stub's messages in order.

use crate::model::{Spec, Stub, StubMode};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Parameters of one call, keyed by parameter name.
pub type Parameters = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StubPlanError {
    #[error("Operation {operation} has a mix of stub modes ({modes}) which is not supported")]
    MixedModes { operation: String, modes: String },

    #[error("Stub \"{label}\" for operation {operation} has a Request that is not a JSON object: {reason}")]
    InvalidParameters {
        operation: String,
        label: String,
        reason: String,
    },

    #[error("No stubs are configured for operation {0}")]
    UnknownOperation(String),

    #[error("Operation {operation} is stubbed as {actual}, not {expected}")]
    WrongMode {
        operation: String,
        expected: StubMode,
        actual: StubMode,
    },

    #[error("The spec is ambiguous. There are {count} calls configured for {operation}, but the call has no parameters, so cannot determine which to pick")]
    AmbiguousWithoutParameters { operation: String, count: usize },

    #[error("The spec is ambiguous. There are {count} calls configured for {operation} which match the parameters provided: {parameters}")]
    AmbiguousParameters {
        operation: String,
        count: usize,
        parameters: String,
    },

    #[error("No stubbed calls for operation {operation} matched the provided parameters, although {configured} stubs are configured for this operation. Provided parameters: {parameters}")]
    NoMatch {
        operation: String,
        configured: usize,
        parameters: String,
    },
}

/// One request-response stub, ready to be matched.
#[derive(Debug, Clone, PartialEq)]
pub struct CannedResponse {
    pub label: String,
    pub parameters: Parameters,
    /// Raw response payload. `None` when the stub declares no `Response:`.
    pub response: Option<String>,
}

impl CannedResponse {
    /// The matched parameters as compact JSON.
    pub fn parameters_json(&self) -> String {
        parameters_json(&self.parameters)
    }
}

/// How one operation is answered.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationPlan {
    RequestResponse(Vec<CannedResponse>),
    Stream { label: String, messages: Vec<String> },
}

impl OperationPlan {
    pub fn mode(&self) -> StubMode {
        match self {
            OperationPlan::RequestResponse(_) => StubMode::RequestResponse,
            OperationPlan::Stream { .. } => StubMode::Stream,
        }
    }

    /// Number of stubs backing this operation.
    pub fn stub_count(&self) -> usize {
        match self {
            OperationPlan::RequestResponse(calls) => calls.len(),
            OperationPlan::Stream { .. } => 1,
        }
    }
}

/// All stubs of a spec, grouped by operation name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StubPlan {
    operations: BTreeMap<String, OperationPlan>,
}

impl StubPlan {
    pub fn from_spec(spec: &Spec) -> Result<Self, StubPlanError> {
        let mut grouped: BTreeMap<&str, Vec<&Stub>> = BTreeMap::new();
        for stub in &spec.data_sources {
            grouped
                .entry(stub.operation_name.as_str())
                .or_default()
                .push(stub);
        }

        let mut operations = BTreeMap::new();
        for (operation, stubs) in grouped {
            let mut modes: Vec<StubMode> = Vec::new();
            for stub in &stubs {
                if !modes.contains(&stub.mode()) {
                    modes.push(stub.mode());
                }
            }
            if modes.len() > 1 {
                let modes = modes
                    .iter()
                    .map(|mode| mode.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(StubPlanError::MixedModes {
                    operation: operation.to_string(),
                    modes,
                });
            }

            let plan = match modes[0] {
                StubMode::RequestResponse => {
                    let calls = stubs
                        .iter()
                        .map(|stub| canned_response(operation, stub))
                        .collect::<Result<Vec<_>, _>>()?;
                    OperationPlan::RequestResponse(calls)
                }
                StubMode::Stream => {
                    if stubs.len() > 1 {
                        tracing::warn!(
                            operation,
                            count = stubs.len(),
                            "several stream stubs for one operation, the last one is used"
                        );
                    }
                    // modes[0] is Stream, so every stub here carries messages
                    let last = stubs[stubs.len() - 1];
                    OperationPlan::Stream {
                        label: last.label.clone(),
                        messages: last.messages().unwrap_or_default().to_vec(),
                    }
                }
            };
            operations.insert(operation.to_string(), plan);
        }

        tracing::debug!(operations = operations.len(), "built stub plan");
        Ok(StubPlan { operations })
    }

    /// Operation names, sorted.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn operation(&self, name: &str) -> Option<&OperationPlan> {
        self.operations.get(name)
    }

    pub fn operations(&self) -> impl Iterator<Item = (&str, &OperationPlan)> {
        self.operations
            .iter()
            .map(|(name, plan)| (name.as_str(), plan))
    }

    /// Pick the request-response stub that answers a call to `operation`.
    pub fn resolve(
        &self,
        operation: &str,
        parameters: &Parameters,
    ) -> Result<&CannedResponse, StubPlanError> {
        let calls = match self.get(operation)? {
            OperationPlan::RequestResponse(calls) => calls,
            plan => {
                return Err(StubPlanError::WrongMode {
                    operation: operation.to_string(),
                    expected: StubMode::RequestResponse,
                    actual: plan.mode(),
                })
            }
        };

        if parameters.is_empty() {
            return match calls.as_slice() {
                [only] => Ok(only),
                _ => Err(StubPlanError::AmbiguousWithoutParameters {
                    operation: operation.to_string(),
                    count: calls.len(),
                }),
            };
        }

        let matching: Vec<&CannedResponse> = calls
            .iter()
            .filter(|call| &call.parameters == parameters)
            .collect();
        match matching.as_slice() {
            [only] => Ok(*only),
            [] => Err(StubPlanError::NoMatch {
                operation: operation.to_string(),
                configured: calls.len(),
                parameters: parameters_json(parameters),
            }),
            _ => Err(StubPlanError::AmbiguousParameters {
                operation: operation.to_string(),
                count: matching.len(),
                parameters: parameters_json(parameters),
            }),
        }
    }

    /// Messages a streaming operation emits, in order.
    pub fn stream(&self, operation: &str) -> Result<&[String], StubPlanError> {
        match self.get(operation)? {
            OperationPlan::Stream { messages, .. } => Ok(messages),
            plan => Err(StubPlanError::WrongMode {
                operation: operation.to_string(),
                expected: StubMode::Stream,
                actual: plan.mode(),
            }),
        }
    }

    fn get(&self, operation: &str) -> Result<&OperationPlan, StubPlanError> {
        self.operations
            .get(operation)
            .ok_or_else(|| StubPlanError::UnknownOperation(operation.to_string()))
    }
}

fn canned_response(
    operation: &str,
    stub: &Stub,
) -> Result<CannedResponse, StubPlanError> {
    let parameters = match stub.parameters() {
        None => Parameters::new(),
        Some(text) => {
            let invalid = |reason: String| StubPlanError::InvalidParameters {
                operation: operation.to_string(),
                label: stub.label.clone(),
                reason,
            };
            match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => map,
                Ok(other) => return Err(invalid(format!("found {}", json_kind(&other)))),
                Err(err) => return Err(invalid(err.to_string())),
            }
        }
    };

    Ok(CannedResponse {
        label: stub.label.clone(),
        parameters,
        response: stub.response().map(str::to_string),
    })
}

fn parameters_json(parameters: &Parameters) -> String {
    Value::Object(parameters.clone()).to_string()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
