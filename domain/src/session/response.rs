//! Model response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::request::RawContent;

/// A native function call requested by the model.
///
/// Every field is optional because providers do not guarantee any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFunctionCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Arguments as sent: usually an object, sometimes a JSON string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
}

impl ModelFunctionCall {
    pub fn new(name: impl Into<String>, args: Value) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            args: Some(args),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Response from the model-call capability.
///
/// `text`, `function_calls` and `thoughts` are extracted views used for local
/// decisions. `raw` is the provider content kept verbatim for replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResult {
    pub text: String,
    pub function_calls: Vec<ModelFunctionCall>,
    pub thoughts: Vec<String>,
    pub raw: RawContent,
}

impl ModelResult {
    pub fn new(raw: RawContent) -> Self {
        Self {
            text: String::new(),
            function_calls: Vec::new(),
            thoughts: Vec::new(),
            raw,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_function_call(mut self, call: ModelFunctionCall) -> Self {
        self.function_calls.push(call);
        self
    }

    pub fn with_thoughts(mut self, thoughts: Vec<String>) -> Self {
        self.thoughts = thoughts;
        self
    }

    pub fn has_function_calls(&self) -> bool {
        !self.function_calls.is_empty()
    }

    /// Text with surrounding whitespace removed; empty when the model said nothing.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}
