//! Wire types for the Gemini `generateContent` REST endpoint.
//!
//! # Request mapping
//!
//! - `Turn::User` → `{"role": "user", "parts": [{"text": ...}]}`
//! - `Turn::Model` → the stored content value, unchanged
//! - `Turn::FunctionResponses` → one user content with a `functionResponse`
//!   part per response
//!
//! Model content is replayed byte-for-byte so provider-private fields such
//! as `thoughtSignature` survive the round trip.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use toolbench_application::GatewayError;
use toolbench_domain::{
    FunctionCallingMode, FunctionDeclaration, GenerationOptions, ModelFunctionCall, ModelRequest,
    ModelResult, RawContent, Turn,
};

const RETRY_INFO_TYPE: &str = "type.googleapis.com/google.rpc.RetryInfo";

/// `generateContent` request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTool {
    pub function_declarations: Vec<WireFunctionDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters_json_schema: Value,
}

impl From<&FunctionDeclaration> for WireFunctionDeclaration {
    fn from(declaration: &FunctionDeclaration) -> Self {
        Self {
            name: declaration.name.clone(),
            description: declaration.description.clone(),
            parameters_json_schema: declaration.parameters.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    pub function_calling_config: FunctionCallingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallingConfig {
    pub mode: FunctionCallingMode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_function_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_json_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<i64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_thoughts: bool,
}

impl ThinkingConfig {
    /// `None` when no thinking option is set. `thinking` without a budget
    /// asks for a dynamic budget (`-1`).
    fn from_options(options: &GenerationOptions) -> Option<Self> {
        if !options.thinking && options.thinking_budget.is_none() && !options.include_thoughts {
            return None;
        }
        let thinking_budget = options
            .thinking_budget
            .or(options.thinking.then_some(-1));
        Some(Self {
            thinking_budget,
            include_thoughts: options.include_thoughts,
        })
    }
}

impl GenerateContentRequest {
    pub fn from_request(request: &ModelRequest) -> Self {
        let contents = request.turns.iter().map(turn_content).collect();

        let system_instruction = request
            .system_instruction
            .as_ref()
            .map(|text| json!({"parts": [{"text": text}]}));

        let (tools, tool_config) = if request.has_functions() {
            (
                vec![WireTool {
                    function_declarations: request.functions.iter().map(Into::into).collect(),
                }],
                Some(ToolConfig {
                    function_calling_config: FunctionCallingConfig {
                        mode: request.calling_mode,
                        allowed_function_names: request.allowed_functions.clone(),
                    },
                }),
            )
        } else {
            (Vec::new(), None)
        };

        let mut generation = GenerationConfig {
            thinking_config: ThinkingConfig::from_options(&request.generation),
            ..Default::default()
        };
        if let Some(schema) = &request.response_schema {
            generation.response_mime_type = Some("application/json".to_string());
            generation.response_json_schema = Some(schema.clone());
        }
        let generation_config = (generation != GenerationConfig::default()).then_some(generation);

        Self {
            contents,
            system_instruction,
            tools,
            tool_config,
            generation_config,
        }
    }
}

fn turn_content(turn: &Turn) -> Value {
    match turn {
        Turn::User(text) => json!({"role": "user", "parts": [{"text": text}]}),
        Turn::Model(raw) => raw.as_value().clone(),
        Turn::FunctionResponses(responses) => {
            let parts: Vec<Value> = responses
                .iter()
                .map(|response| {
                    let mut body = json!({
                        "name": response.name,
                        "response": response.response,
                    });
                    if let Some(id) = &response.id {
                        body["id"] = json!(id);
                    }
                    json!({"functionResponse": body})
                })
                .collect();
            json!({"role": "user", "parts": parts})
        }
    }
}

/// `generateContent` response body (the parts we read)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Value>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
    function_call: Option<WireFunctionCall>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WireFunctionCall {
    id: Option<String>,
    name: Option<String>,
    args: Option<Value>,
}

impl GenerateContentResponse {
    /// Extract text, function calls and thoughts from the first candidate.
    pub fn into_result(self) -> Result<ModelResult, GatewayError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(GatewayError::InvalidResponse(format!(
                "Response has no candidates ({})",
                reason
            )));
        };

        // A candidate stopped early (e.g. SAFETY) may carry no content at all
        let content = candidate
            .content
            .unwrap_or_else(|| json!({"role": "model", "parts": []}));

        let parts: Vec<Part> = match content.get("parts") {
            Some(parts) => serde_json::from_value(parts.clone())
                .map_err(|e| GatewayError::InvalidResponse(format!("Malformed parts: {}", e)))?,
            None => Vec::new(),
        };

        let mut text = String::new();
        let mut thoughts = Vec::new();
        let mut result = ModelResult::new(RawContent::new(content.clone()));
        for part in parts {
            if let Some(call) = part.function_call {
                result = result.with_function_call(ModelFunctionCall {
                    id: call.id,
                    name: call.name,
                    args: call.args,
                });
            }
            match part.text {
                Some(t) if part.thought => thoughts.push(t),
                Some(t) => text.push_str(&t),
                None => {}
            }
        }

        Ok(result.with_text(text).with_thoughts(thoughts))
    }
}

/// Map a non-2xx response to a gateway error.
///
/// The retry hint comes from the `Retry-After` header (seconds) when
/// present, otherwise from a `RetryInfo.retryDelay` error detail.
pub fn error_from_response(status: u16, retry_after_header: Option<&str>, body: &str) -> GatewayError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));

    let detail = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string());

    let retry_after = retry_after_header
        .and_then(|h| h.trim().parse::<f64>().ok())
        .or_else(|| error.and_then(retry_info_delay))
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok());

    GatewayError::RequestFailed {
        message: format!("HTTP {}: {}", status, detail),
        status: Some(status),
        retry_after,
    }
}

fn retry_info_delay(error: &Value) -> Option<f64> {
    error
        .get("details")?
        .as_array()?
        .iter()
        .filter(|d| d.get("@type").and_then(Value::as_str) == Some(RETRY_INFO_TYPE))
        .find_map(|d| d.get("retryDelay").and_then(Value::as_str))
        .and_then(|delay| delay.trim().strip_suffix('s'))
        .and_then(|secs| secs.parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbench_domain::FunctionResponse;

    fn body(request: &ModelRequest) -> Value {
        serde_json::to_value(GenerateContentRequest::from_request(request)).unwrap()
    }

    #[test]
    fn test_plain_prompt_body() {
        let value = body(&ModelRequest::user("m", "Hello").with_system_instruction("Be brief"));
        assert_eq!(
            value,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "Hello"}]}],
                "systemInstruction": {"parts": [{"text": "Be brief"}]},
            })
        );
    }

    #[test]
    fn test_functions_and_allowed_names() {
        let request = ModelRequest::user("m", "go")
            .with_functions(
                vec![FunctionDeclaration::new(
                    "dispatch_tool",
                    "Dispatch",
                    json!({"type": "object"}),
                )],
                FunctionCallingMode::Any,
            )
            .with_allowed_functions(["dispatch_tool"]);
        let value = body(&request);
        assert_eq!(
            value["tools"][0]["functionDeclarations"][0]["parametersJsonSchema"],
            json!({"type": "object"})
        );
        assert_eq!(value["toolConfig"]["functionCallingConfig"]["mode"], "ANY");
        assert_eq!(
            value["toolConfig"]["functionCallingConfig"]["allowedFunctionNames"],
            json!(["dispatch_tool"])
        );
    }

    #[test]
    fn test_response_schema_and_thinking() {
        let request = ModelRequest::user("m", "go")
            .with_response_schema(json!({"type": "object"}))
            .with_generation(GenerationOptions {
                thinking: true,
                thinking_budget: None,
                include_thoughts: true,
            });
        let config = &body(&request)["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseJsonSchema"], json!({"type": "object"}));
        assert_eq!(
            config["thinkingConfig"],
            json!({"thinkingBudget": -1, "includeThoughts": true})
        );
    }

    #[test]
    fn test_explicit_budget_without_thoughts() {
        let request = ModelRequest::user("m", "go").with_generation(GenerationOptions {
            thinking: false,
            thinking_budget: Some(0),
            include_thoughts: false,
        });
        assert_eq!(
            body(&request)["generationConfig"]["thinkingConfig"],
            json!({"thinkingBudget": 0})
        );
    }

    #[test]
    fn test_model_turn_and_function_responses_are_replayed() {
        let raw = json!({
            "role": "model",
            "parts": [{"functionCall": {"name": "word_count", "args": {}}, "thoughtSignature": "abc"}]
        });
        let request = ModelRequest::user("m", "count")
            .with_turn(Turn::Model(RawContent::new(raw.clone())))
            .with_turn(Turn::FunctionResponses(vec![FunctionResponse::new(
                Some("call-1".to_string()),
                "word_count",
                json!({"toolName": "word_count", "result": {"words": 1}}),
            )]));
        let value = body(&request);
        assert_eq!(value["contents"][1], raw);
        assert_eq!(
            value["contents"][2],
            json!({
                "role": "user",
                "parts": [{"functionResponse": {
                    "id": "call-1",
                    "name": "word_count",
                    "response": {"toolName": "word_count", "result": {"words": 1}},
                }}]
            })
        );
    }

    #[test]
    fn test_parse_text_thoughts_and_calls() {
        let content = json!({
            "role": "model",
            "parts": [
                {"text": "Planning...", "thought": true},
                {"text": "Hello "},
                {"text": "world"},
                {"functionCall": {"id": "c1", "name": "word_count", "args": {"text": "a b"}}, "thoughtSignature": "sig"}
            ]
        });
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"content": content.clone()}]})).unwrap();
        let result = response.into_result().unwrap();

        assert_eq!(result.text, "Hello world");
        assert_eq!(result.thoughts, vec!["Planning...".to_string()]);
        assert_eq!(result.function_calls.len(), 1);
        assert_eq!(result.function_calls[0].id.as_deref(), Some("c1"));
        assert_eq!(result.function_calls[0].args, Some(json!({"text": "a b"})));
        assert_eq!(result.raw.as_value(), &content);
    }

    #[test]
    fn test_candidate_without_content_is_empty_result() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        let result = response.into_result().unwrap();
        assert!(result.text.is_empty());
        assert!(!result.has_function_calls());
    }

    #[test]
    fn test_no_candidates_is_invalid_response() {
        let response: GenerateContentResponse = serde_json::from_value(
            json!({"promptFeedback": {"blockReason": "SAFETY"}}),
        )
        .unwrap();
        let err = response.into_result().unwrap_err();
        assert_eq!(
            err,
            GatewayError::InvalidResponse("Response has no candidates (SAFETY)".to_string())
        );
    }

    #[test]
    fn test_error_with_retry_info() {
        let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED",
            "details": [{"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "7s"}]}}"#;
        let err = error_from_response(429, None, body);
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
        assert_eq!(err.to_string(), "Request failed: HTTP 429: Resource has been exhausted");
    }

    #[test]
    fn test_retry_after_header_wins() {
        let err = error_from_response(503, Some("2"), "Service Unavailable");
        assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));
        assert_eq!(err.to_string(), "Request failed: HTTP 503: Service Unavailable");
    }

    #[test]
    fn test_out_of_range_hints_are_dropped() {
        let err = error_from_response(429, Some("1e30"), "slow down");
        assert_eq!(err.retry_after(), None);
        assert_eq!(err.to_string(), "Request failed: HTTP 429: slow down");

        assert_eq!(error_from_response(429, Some("-3"), "").retry_after(), None);

        let body = r#"{"error": {"message": "quota",
            "details": [{"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "1e300s"}]}}"#;
        assert_eq!(error_from_response(429, None, body).retry_after(), None);
    }

    #[test]
    fn test_error_without_hint() {
        let err = error_from_response(400, None, r#"{"error": {"message": "Bad schema"}}"#);
        assert_eq!(err.retry_after(), None);
        assert_eq!(err.status(), Some(400));
    }
}
