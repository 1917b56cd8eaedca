//! Exchanges shared by the strategy engines: model calls with tracing,
//! JSON-only selection and finalization, argument validation with one repair
//! exchange, and tool execution.

use serde_json::{Map, Value, json};
use toolbench_domain::intent::{
    IntentPrompt, ToolIntent, finalization_schema, parse_finalization, parse_selection,
    selection_schema,
};
use toolbench_domain::json::{as_json_object, recover};
use toolbench_domain::util::preview;
use toolbench_domain::{
    FunctionResponse, ModelFunctionCall, ModelRequest, ModelResult, RunRecorder, ToolCallRecord,
    ToolDefinition, ToolExecutionContext, TraceKind, ValidatedArgs,
};
use tracing::{debug, warn};

use super::{RunContext, StrategyError};

const TRACE_PREVIEW_CHARS: usize = 240;

/// Tool arguments as received from the model, before validation.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum ArgsInput {
    /// Parsed JSON, not yet checked against the schema
    Value(Value),
    /// Text the recovery pipeline could not parse
    Broken { text: String, error: String },
}

impl ArgsInput {
    /// Native function-call arguments: an object, a JSON string, or absent.
    pub(super) fn from_call_args(args: Option<&Value>) -> Self {
        match args {
            None | Some(Value::Null) => ArgsInput::Value(Value::Object(Map::new())),
            Some(Value::String(text)) => Self::from_text(text),
            Some(other) => ArgsInput::Value(other.clone()),
        }
    }

    /// Arguments serialized as text, run through the recovery pipeline.
    pub(super) fn from_text(text: &str) -> Self {
        match recover(text) {
            Ok(value) => ArgsInput::Value(value),
            Err(err) => ArgsInput::Broken {
                text: text.to_string(),
                error: format!("root: {}", err),
            },
        }
    }
}

/// Send a request, tracing the exchange and any reasoning summaries.
pub(super) async fn call_model(
    ctx: &RunContext<'_>,
    recorder: &mut RunRecorder,
    label: &str,
    request: ModelRequest,
) -> Result<ModelResult, StrategyError> {
    debug!(
        model = %request.model,
        exchange = label,
        turns = request.turns.len(),
        "Calling model"
    );
    let result = ctx.gateway.generate_content(&request).await?;
    let calls: Vec<&str> = result
        .function_calls
        .iter()
        .map(ModelFunctionCall::name_or_empty)
        .collect();
    recorder.step_with(
        TraceKind::Llm,
        label,
        json!({
            "model": request.model,
            "text": preview(&result.text, TRACE_PREVIEW_CHARS),
            "functionCalls": calls,
        }),
    );
    recorder.thoughts(&result.thoughts);
    Ok(result)
}

/// JSON-only "pick a tool or respond" exchange.
pub(super) async fn select_intent(
    ctx: &RunContext<'_>,
    recorder: &mut RunRecorder,
) -> Result<ToolIntent, StrategyError> {
    let prompt = IntentPrompt::selection_prompt(ctx.prompt, &ctx.registry.prompt_description());
    let request = ModelRequest::user(ctx.model, prompt)
        .with_system_instruction(IntentPrompt::selection_system())
        .with_response_schema(selection_schema())
        .with_generation(ctx.params.generation.clone());
    let result = call_model(ctx, recorder, "selection", request).await?;
    let intent = parse_selection(&result.text)?;
    recorder.step_with(
        TraceKind::Intent,
        intent.action(),
        serde_json::to_value(&intent).unwrap_or(Value::Null),
    );
    Ok(intent)
}

/// JSON-only "answer from this tool result" exchange.
pub(super) async fn finalize(
    ctx: &RunContext<'_>,
    recorder: &mut RunRecorder,
    call: &ToolCallRecord,
) -> Result<String, StrategyError> {
    let prompt =
        IntentPrompt::finalization_prompt(ctx.prompt, &call.tool_name, &call.args, &call.result);
    let request = ModelRequest::user(ctx.model, prompt)
        .with_system_instruction(IntentPrompt::finalization_system())
        .with_response_schema(finalization_schema())
        .with_generation(ctx.params.generation.clone());
    let result = call_model(ctx, recorder, "finalization", request).await?;
    let response = parse_finalization(&result.text)?;
    recorder.step(TraceKind::Intent, "respond");
    Ok(response)
}

fn require_tool<'a>(ctx: &RunContext<'a>, name: &str) -> Result<&'a ToolDefinition, StrategyError> {
    ctx.registry
        .get(name)
        .ok_or_else(|| StrategyError::UnknownTool(name.to_string()))
}

/// Schema check. On failure returns the offending text and the issue list.
fn check(ctx: &RunContext<'_>, tool_name: &str, input: ArgsInput) -> Result<ValidatedArgs, (String, String)> {
    match input {
        ArgsInput::Value(value) => ctx
            .registry
            .validate_args(tool_name, &value)
            .map_err(|error| (value.to_string(), error)),
        ArgsInput::Broken { text, error } => Err((text, error)),
    }
}

/// Validate without repair. Any failure is fatal.
pub(super) fn validate_strict(
    ctx: &RunContext<'_>,
    tool_name: &str,
    input: ArgsInput,
) -> Result<ValidatedArgs, StrategyError> {
    require_tool(ctx, tool_name)?;
    check(ctx, tool_name, input).map_err(|(_, message)| StrategyError::Validation {
        tool: tool_name.to_string(),
        message,
    })
}

/// Validate, and on failure issue exactly one schema-constrained repair
/// exchange. Returns the validated arguments and whether repair was used.
pub(super) async fn validate_or_repair(
    ctx: &RunContext<'_>,
    recorder: &mut RunRecorder,
    tool_name: &str,
    input: ArgsInput,
) -> Result<(ValidatedArgs, bool), StrategyError> {
    let tool = require_tool(ctx, tool_name)?;
    let (broken, error) = match check(ctx, tool_name, input) {
        Ok(args) => return Ok((args, false)),
        Err(failure) => failure,
    };

    warn!(tool = tool_name, error = %error, "Invalid tool arguments, requesting repair");
    let schema = tool.declared_schema();
    let prompt = IntentPrompt::repair_prompt(ctx.prompt, tool_name, &schema, &broken, &error);
    let request = ModelRequest::user(ctx.params.repair_model_or(ctx.model), prompt)
        .with_system_instruction(IntentPrompt::repair_system())
        .with_response_schema(schema)
        .with_generation(ctx.params.generation.clone());
    let result = call_model(ctx, recorder, "repair", request).await?;

    let repaired = Value::Object(as_json_object(recover(&result.text)?, "Repaired arguments")?);
    let args = ctx
        .registry
        .validate_args(tool_name, &repaired)
        .map_err(|message| StrategyError::Validation {
            tool: tool_name.to_string(),
            message: format!("still invalid after repair: {}", message),
        })?;

    recorder.step_with(
        TraceKind::Repair,
        format!("Repaired arguments for {}", tool_name),
        json!({
            "tool": tool_name,
            "error": error,
            "original": broken,
            "repaired": repaired,
        }),
    );
    Ok((args, true))
}

/// Execute with validated arguments and append the call record.
pub(super) async fn execute_tool(
    ctx: &RunContext<'_>,
    recorder: &mut RunRecorder,
    args: ValidatedArgs,
    repaired: bool,
) -> Result<ToolCallRecord, StrategyError> {
    let tool_name = args.tool_name().to_string();
    debug!(tool = %tool_name, repaired, "Executing tool");
    let result = ctx
        .registry
        .execute(&tool_name, &args, &ToolExecutionContext::now())
        .await?;
    let record = ToolCallRecord {
        tool_name,
        args: args.into_args(),
        result,
        repaired,
    };
    recorder.record_call(record.clone());
    Ok(record)
}

/// Function-response turn entry carrying `{toolName, result}`.
pub(super) fn function_response(
    call: &ModelFunctionCall,
    function_name: &str,
    record: &ToolCallRecord,
) -> FunctionResponse {
    FunctionResponse::new(
        call.id.clone(),
        function_name,
        json!({"toolName": record.tool_name, "result": record.result}),
    )
}
