//! Test doubles shared by the strategy, retry and use case tests.

use crate::ports::model_gateway::{GatewayError, ModelGateway};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use toolbench_domain::{
    ModelFunctionCall, ModelRequest, ModelResult, RawContent, ToolDefinition, ToolError,
    ToolExecutionContext, ToolRegistry,
};

/// Gateway that returns queued responses in order and records every request.
pub(crate) struct ScriptedGateway {
    responses: Mutex<VecDeque<Result<ModelResult, GatewayError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedGateway {
    pub(crate) fn new(responses: Vec<Result<ModelResult, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn generate_content(&self, request: &ModelRequest) -> Result<ModelResult, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Other("script exhausted".to_string())))
    }
}

/// Plain text response.
pub(crate) fn text(text: &str) -> Result<ModelResult, GatewayError> {
    let raw = RawContent::new(json!({"role": "model", "parts": [{"text": text}]}));
    Ok(ModelResult::new(raw).with_text(text))
}

/// Single function call response. The raw content carries an opaque
/// signature so replay tests can tell it apart from a rebuilt turn.
pub(crate) fn function_call(name: &str, args: Value, signature: &str) -> Result<ModelResult, GatewayError> {
    let raw = RawContent::new(json!({
        "role": "model",
        "parts": [{
            "functionCall": {"name": name, "args": args},
            "thoughtSignature": signature
        }]
    }));
    Ok(ModelResult::new(raw).with_function_call(ModelFunctionCall::new(name, args)))
}

/// Response with neither text nor function calls.
pub(crate) fn empty() -> Result<ModelResult, GatewayError> {
    Ok(ModelResult::new(RawContent::new(json!({"role": "model", "parts": []}))))
}

fn number_list(args: &Map<String, Value>) -> Vec<f64> {
    args["values"]
        .as_array()
        .map(|values| values.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default()
}

/// Registry with `calculate_stats` and `word_count`.
pub(crate) fn registry() -> ToolRegistry {
    let stats = ToolDefinition::new(
        "calculate_stats",
        "Compute a statistic over numbers",
        json!({
            "type": "object",
            "properties": {
                "values": {"type": "array", "items": {"type": "number"}, "minItems": 1},
                "operation": {"type": "string", "enum": ["sum", "mean", "min", "max"]}
            },
            "required": ["values", "operation"]
        }),
        |args: &Map<String, Value>, _: &ToolExecutionContext| -> Result<Value, ToolError> {
            let values = number_list(args);
            let result = match args["operation"].as_str() {
                Some("sum") => values.iter().sum::<f64>(),
                Some("mean") => values.iter().sum::<f64>() / values.len() as f64,
                Some("min") => values.iter().cloned().fold(f64::INFINITY, f64::min),
                _ => values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            };
            Ok(json!({"result": result}))
        },
    );
    let words = ToolDefinition::new(
        "word_count",
        "Count words in text",
        json!({
            "type": "object",
            "properties": {"text": {"type": "string"}},
            "required": ["text"]
        }),
        |args: &Map<String, Value>, _: &ToolExecutionContext| -> Result<Value, ToolError> {
            let count = args["text"].as_str().unwrap_or("").split_whitespace().count();
            Ok(json!({"words": count}))
        },
    );
    ToolRegistry::new()
        .register(stats)
        .unwrap()
        .register(words)
        .unwrap()
}
