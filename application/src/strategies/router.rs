//! Single-Tool-Router strategy
//!
//! Native function calling, but the model only ever sees one function,
//! [`DISPATCH_TOOL_NAME`], which names a registered tool and carries its
//! arguments as a JSON string. Each turn:
//!
//! - no function call and non-empty text: that text is the answer
//! - no function call, no text, no tool run yet: [`NO_DISPATCH_MESSAGE`]
//! - no function call, no text, a tool already ran: finalization exchange
//! - dispatch call: recover `argumentsJson`, validate (one repair exchange on
//!   failure), execute, then replay the model's raw turn plus a
//!   function-response turn
//!
//! Running out of turns returns the last tool result as text.

use serde_json::{Value, json};
use toolbench_domain::intent::IntentPrompt;
use toolbench_domain::json::{as_json_object, recover};
use toolbench_domain::{
    FunctionCallingMode, FunctionDeclaration, ModelFunctionCall, ModelRequest, RunRecorder,
    RunnerResult, StrategyKind, ToolCallRecord, TraceKind, Turn,
};
use tracing::debug;

use super::exchange::{
    ArgsInput, call_model, execute_tool, finalize, function_response, validate_or_repair,
};
use super::{RunContext, StrategyError};

pub const DISPATCH_TOOL_NAME: &str = "dispatch_tool";

pub const NO_DISPATCH_MESSAGE: &str = "The model did not dispatch any tool and returned no text.";

/// The single generic function offered to the model.
pub fn dispatch_declaration() -> FunctionDeclaration {
    FunctionDeclaration::new(
        DISPATCH_TOOL_NAME,
        "Run one of the available tools by name. Pass the tool arguments as a JSON object string.",
        json!({
            "type": "object",
            "properties": {
                "toolName": {
                    "type": "string",
                    "description": "Name of the tool to run"
                },
                "argumentsJson": {
                    "type": "string",
                    "description": "JSON object string with the tool arguments"
                }
            },
            "required": ["toolName", "argumentsJson"]
        }),
    )
}

/// Split a dispatch call into the target tool name and its raw arguments.
fn parse_dispatch(call: &ModelFunctionCall) -> Result<(String, ArgsInput), StrategyError> {
    let envelope = match call.args.as_ref() {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(text)) => as_json_object(recover(text)?, "dispatch_tool arguments")?,
        _ => {
            return Err(StrategyError::InvalidFunctionCall(format!(
                "{} call carried no arguments",
                DISPATCH_TOOL_NAME
            )));
        }
    };

    let tool_name = envelope
        .get("toolName")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            StrategyError::InvalidFunctionCall(format!("{} call is missing toolName", DISPATCH_TOOL_NAME))
        })?
        .to_string();

    let arguments = match envelope.get("argumentsJson") {
        Some(Value::String(text)) => ArgsInput::from_text(text),
        Some(other) => ArgsInput::from_call_args(Some(other)),
        None => ArgsInput::from_call_args(None),
    };
    Ok((tool_name, arguments))
}

pub async fn run(ctx: &RunContext<'_>) -> Result<RunnerResult, StrategyError> {
    let mut recorder = RunRecorder::new(StrategyKind::SingleToolRouter);
    let system = IntentPrompt::router_system(DISPATCH_TOOL_NAME, &ctx.registry.prompt_description());
    let mut history = vec![Turn::User(ctx.prompt.to_string())];
    let max_turns = ctx.params.router_max_turns;

    for turn in 1..=max_turns {
        let request = ModelRequest::new(ctx.model)
            .with_system_instruction(system.clone())
            .with_turns(history.iter().cloned())
            .with_functions(vec![dispatch_declaration()], FunctionCallingMode::Auto)
            .with_allowed_functions([DISPATCH_TOOL_NAME])
            .with_generation(ctx.params.generation.clone());
        let result = call_model(ctx, &mut recorder, &format!("router turn {}", turn), request).await?;

        if !result.has_function_calls() {
            let text = result.trimmed_text();
            if !text.is_empty() {
                return Ok(recorder.finish(text));
            }
            return match recorder.last_call().cloned() {
                None => {
                    debug!("Router model neither dispatched nor answered");
                    Ok(recorder.finish(NO_DISPATCH_MESSAGE))
                }
                Some(last) => {
                    let response = finalize(ctx, &mut recorder, &last).await?;
                    Ok(recorder.finish(response))
                }
            };
        }

        let mut responses = Vec::with_capacity(result.function_calls.len());
        for call in &result.function_calls {
            if call.name_or_empty() != DISPATCH_TOOL_NAME {
                return Err(StrategyError::UnknownTool(call.name_or_empty().to_string()));
            }
            let (tool_name, input) = parse_dispatch(call)?;
            recorder.step_with(
                TraceKind::Intent,
                format!("dispatch {}", tool_name),
                json!({"toolName": tool_name}),
            );
            let (args, repaired) = validate_or_repair(ctx, &mut recorder, &tool_name, input).await?;
            let record = execute_tool(ctx, &mut recorder, args, repaired).await?;
            responses.push(function_response(call, DISPATCH_TOOL_NAME, &record));
        }

        history.push(Turn::Model(result.raw));
        history.push(Turn::FunctionResponses(responses));
    }

    debug!(max_turns, "Router turn budget exhausted");
    let final_text = recorder
        .last_call()
        .map(ToolCallRecord::result_text)
        .unwrap_or_else(|| NO_DISPATCH_MESSAGE.to_string());
    Ok(recorder.finish(final_text))
}
