//! Hybrid-Repair strategy
//!
//! Native per-tool calling: every registered tool is declared to the model.
//! Invalid arguments get one schema-constrained repair exchange (optionally
//! on a separate repair model). When the model produces neither a call nor
//! text before any tool has run, the structured-JSON selection exchange is
//! used as a fallback, without executing whatever it selects.

use toolbench_domain::intent::IntentPrompt;
use toolbench_domain::{
    FunctionCallingMode, ModelRequest, RunRecorder, RunnerResult, StrategyKind, ToolIntent,
    TraceKind, Turn,
};
use tracing::{debug, info};

use super::exchange::{
    ArgsInput, call_model, execute_tool, finalize, function_response, select_intent,
    validate_or_repair,
};
use super::{RunContext, StrategyError};

pub const NO_FINAL_TEXT_MESSAGE: &str =
    "The model did not produce a final answer within the turn budget.";

fn fallback_not_executed(tool_name: &str) -> String {
    format!("Fallback selected tool '{}' but it was not executed.", tool_name)
}

pub async fn run(ctx: &RunContext<'_>) -> Result<RunnerResult, StrategyError> {
    let mut recorder = RunRecorder::new(StrategyKind::HybridRepair);
    let declarations = ctx.registry.function_declarations();
    let mut history = vec![Turn::User(ctx.prompt.to_string())];
    let max_turns = ctx.params.hybrid_max_turns;

    for turn in 1..=max_turns {
        let request = ModelRequest::new(ctx.model)
            .with_system_instruction(IntentPrompt::hybrid_system())
            .with_turns(history.iter().cloned())
            .with_functions(declarations.clone(), FunctionCallingMode::Auto)
            .with_generation(ctx.params.generation.clone());
        let result = call_model(ctx, &mut recorder, &format!("hybrid turn {}", turn), request).await?;

        if !result.has_function_calls() {
            let text = result.trimmed_text();
            if !text.is_empty() {
                return Ok(recorder.finish(text));
            }
            if let Some(last) = recorder.last_call().cloned() {
                let response = finalize(ctx, &mut recorder, &last).await?;
                return Ok(recorder.finish(response));
            }
            return fallback(ctx, recorder).await;
        }

        let mut responses = Vec::with_capacity(result.function_calls.len());
        for call in &result.function_calls {
            let tool_name = call
                .name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    StrategyError::InvalidFunctionCall("function call without a name".to_string())
                })?;
            let input = ArgsInput::from_call_args(call.args.as_ref());
            let (args, repaired) = validate_or_repair(ctx, &mut recorder, tool_name, input).await?;
            let record = execute_tool(ctx, &mut recorder, args, repaired).await?;
            responses.push(function_response(call, tool_name, &record));
        }

        history.push(Turn::Model(result.raw));
        history.push(Turn::FunctionResponses(responses));
    }

    debug!(max_turns, "Hybrid turn budget exhausted");
    Ok(recorder.finish(NO_FINAL_TEXT_MESSAGE))
}

/// Structured selection when the model returned nothing usable.
async fn fallback(ctx: &RunContext<'_>, mut recorder: RunRecorder) -> Result<RunnerResult, StrategyError> {
    info!("No tool call and no text, falling back to structured selection");
    recorder.step(
        TraceKind::Fallback,
        "No tool call and no text; using structured selection",
    );
    match select_intent(ctx, &mut recorder).await? {
        ToolIntent::Respond { response } => Ok(recorder.finish(response)),
        ToolIntent::CallTool { tool_name, .. } => {
            recorder.step(
                TraceKind::Fallback,
                format!("Selected {} without executing it", tool_name),
            );
            Ok(recorder.finish(fallback_not_executed(&tool_name)))
        }
    }
}
