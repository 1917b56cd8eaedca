//! Tool intent parsing and response schemas.

use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::json::{RecoveryError, ShapeError, as_json_object, recover};

const ACTION_CALL_TOOL: &str = "call_tool";
const ACTION_RESPOND: &str = "respond";

/// Errors raised while turning model text into a [`ToolIntent`].
#[derive(Error, Debug)]
pub enum IntentError {
    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("Tool intent is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Unknown tool intent action: '{0}'")]
    UnknownAction(String),

    #[error("Expected a respond intent, got '{0}'")]
    NotARespond(String),
}

/// Parsed decision from a JSON-only exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ToolIntent {
    #[serde(rename_all = "camelCase")]
    CallTool {
        tool_name: String,
        args: Map<String, Value>,
    },
    Respond { response: String },
}

impl ToolIntent {
    pub fn action(&self) -> &'static str {
        match self {
            ToolIntent::CallTool { .. } => ACTION_CALL_TOOL,
            ToolIntent::Respond { .. } => ACTION_RESPOND,
        }
    }

    /// Interpret an already recovered JSON object.
    ///
    /// `call_tool` requires a non-empty `toolName` and an `args` object (a
    /// JSON string holding an object is accepted). `respond` requires a
    /// string `response`.
    pub fn from_object(object: &Map<String, Value>) -> Result<Self, IntentError> {
        let action = object
            .get("action")
            .and_then(Value::as_str)
            .ok_or(IntentError::MissingField("action"))?;

        match action {
            ACTION_CALL_TOOL => {
                let tool_name = object
                    .get("toolName")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or(IntentError::MissingField("toolName"))?;
                let args = match object.get("args") {
                    Some(Value::Object(map)) => map.clone(),
                    Some(Value::String(text)) => as_json_object(recover(text)?, "args")?,
                    _ => return Err(IntentError::MissingField("args")),
                };
                Ok(ToolIntent::CallTool {
                    tool_name: tool_name.to_string(),
                    args,
                })
            }
            ACTION_RESPOND => {
                let response = object
                    .get("response")
                    .and_then(Value::as_str)
                    .ok_or(IntentError::MissingField("response"))?;
                Ok(ToolIntent::Respond {
                    response: response.to_string(),
                })
            }
            other => Err(IntentError::UnknownAction(other.to_string())),
        }
    }
}

/// Parse the answer to a selection prompt.
pub fn parse_selection(raw: &str) -> Result<ToolIntent, IntentError> {
    let object = as_json_object(recover(raw)?, "Tool intent")?;
    ToolIntent::from_object(&object)
}

/// Parse the answer to a finalization prompt, returning the response text.
pub fn parse_finalization(raw: &str) -> Result<String, IntentError> {
    match parse_selection(raw)? {
        ToolIntent::Respond { response } => Ok(response),
        other => Err(IntentError::NotARespond(other.action().to_string())),
    }
}

/// Response schema for the selection exchange.
pub fn selection_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "action": {"type": "string", "enum": [ACTION_CALL_TOOL, ACTION_RESPOND]},
            "toolName": {"type": "string"},
            "args": {"type": "object"},
            "response": {"type": "string"}
        },
        "required": ["action"]
    })
}

/// Response schema for the finalization exchange.
pub fn finalization_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "action": {"type": "string", "enum": [ACTION_RESPOND]},
            "response": {"type": "string"}
        },
        "required": ["action", "response"]
    })
}
