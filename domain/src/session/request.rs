//! Model request types.
//!
//! A [`ModelRequest`] is everything one call to the model-call capability
//! needs: the model id, the ordered conversation [`Turn`]s, optional native
//! function declarations, an optional response schema and opaque generation
//! options.
//!
//! # Prior-turn replay
//!
//! The model's own previous turn is carried as [`Turn::Model`] holding the
//! provider's [`RawContent`] exactly as it was received. The core never
//! rebuilds that content from extracted text or function-call fields, so
//! provider-specific continuation markers survive the round trip.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider content exactly as returned by the transport.
///
/// Opaque to the core: it is only ever produced by a gateway and handed back
/// to a gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawContent(Value);

impl RawContent {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Result of a native function call sent back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// Correlation id from the originating call, when the provider sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub response: Value,
}

impl FunctionResponse {
    pub fn new(id: Option<String>, name: impl Into<String>, response: Value) -> Self {
        Self {
            id,
            name: name.into(),
            response,
        }
    }
}

/// One entry of the conversation history.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    /// User text.
    User(String),
    /// The model's previous turn, replayed verbatim.
    Model(RawContent),
    /// Results for the function calls of the preceding model turn.
    FunctionResponses(Vec<FunctionResponse>),
}

/// A function the model may call natively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    /// JSON Schema of the argument object
    pub parameters: Value,
}

impl FunctionDeclaration {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// How the model is allowed to use declared functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FunctionCallingMode {
    /// The model decides between text and a function call.
    #[default]
    Auto,
    /// The model must call one of the allowed functions.
    Any,
    /// Function calling disabled.
    None,
}

/// Generation shaping options, passed through to the transport uninterpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Request extended reasoning.
    pub thinking: bool,
    /// Reasoning intensity (token budget), if the provider supports one.
    pub thinking_budget: Option<i64>,
    /// Return reasoning summaries alongside the answer.
    pub include_thoughts: bool,
}

/// A single request to the model-call capability.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub turns: Vec<Turn>,
    pub functions: Vec<FunctionDeclaration>,
    pub calling_mode: FunctionCallingMode,
    /// Restricts which declared functions may be called (empty = all).
    pub allowed_functions: Vec<String>,
    /// JSON Schema the response text must conform to.
    pub response_schema: Option<Value>,
    pub generation: GenerationOptions,
}

impl ModelRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instruction: None,
            turns: Vec::new(),
            functions: Vec::new(),
            calling_mode: FunctionCallingMode::Auto,
            allowed_functions: Vec::new(),
            response_schema: None,
            generation: GenerationOptions::default(),
        }
    }

    /// Single-turn request with a user prompt.
    pub fn user(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(model).with_turn(Turn::User(prompt.into()))
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_turn(mut self, turn: Turn) -> Self {
        self.turns.push(turn);
        self
    }

    pub fn with_turns(mut self, turns: impl IntoIterator<Item = Turn>) -> Self {
        self.turns.extend(turns);
        self
    }

    pub fn with_functions(
        mut self,
        functions: Vec<FunctionDeclaration>,
        mode: FunctionCallingMode,
    ) -> Self {
        self.functions = functions;
        self.calling_mode = mode;
        self
    }

    pub fn with_allowed_functions(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allowed_functions = names.into_iter().map(Into::into).collect();
        self
    }

    /// Constrain the response to JSON matching `schema`.
    pub fn with_response_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_generation(mut self, generation: GenerationOptions) -> Self {
        self.generation = generation;
        self
    }

    pub fn has_functions(&self) -> bool {
        !self.functions.is_empty() && self.calling_mode != FunctionCallingMode::None
    }
}
