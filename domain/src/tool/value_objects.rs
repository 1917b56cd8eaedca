//! Tool value objects: execution context, call records and errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Context handed to a tool executor.
///
/// Constructed fresh for every execution and never shared afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExecutionContext {
    pub now: DateTime<Utc>,
}

impl ToolExecutionContext {
    /// Context stamped with the current wall-clock time.
    pub fn now() -> Self {
        Self { now: Utc::now() }
    }

    /// Context stamped with a fixed time (deterministic tests).
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

/// Errors raised by a tool executor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Execution failed: {0}")]
    Execution(String),
}

/// Record of one successful tool execution inside a strategy run.
///
/// `args` has always passed the tool's schema validation. Records are
/// appended in execution order and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallRecord {
    pub tool_name: String,
    pub args: Map<String, Value>,
    pub result: Value,
    /// Whether the arguments went through a repair exchange first.
    pub repaired: bool,
}

impl ToolCallRecord {
    /// Result rendered as text: strings as-is, everything else as JSON.
    pub fn result_text(&self) -> String {
        match &self.result {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
