//! Structured-JSON strategy
//!
//! No native tool calling. One schema-constrained selection exchange; if it
//! picks a tool, the arguments are validated (no repair, the exchange is
//! already schema-constrained), the tool runs, and one finalization exchange
//! produces the answer.
//!
//! ```text
//! selection ──respond──────────────────────────────▶ done
//!     │
//!     └─call_tool─▶ validate ─▶ execute ─▶ finalization ─▶ done
//! ```

use serde_json::Value;
use toolbench_domain::{RunRecorder, RunnerResult, StrategyKind, ToolIntent};
use tracing::info;

use super::exchange::{ArgsInput, execute_tool, finalize, select_intent, validate_strict};
use super::{RunContext, StrategyError};

pub async fn run(ctx: &RunContext<'_>) -> Result<RunnerResult, StrategyError> {
    let mut recorder = RunRecorder::new(StrategyKind::StructuredJson);

    match select_intent(ctx, &mut recorder).await? {
        ToolIntent::Respond { response } => Ok(recorder.finish(response)),
        ToolIntent::CallTool { tool_name, args } => {
            info!(tool = %tool_name, "Structured selection chose a tool");
            let args = validate_strict(ctx, &tool_name, ArgsInput::Value(Value::Object(args)))?;
            let record = execute_tool(ctx, &mut recorder, args, false).await?;
            let response = finalize(ctx, &mut recorder, &record).await?;
            Ok(recorder.finish(response))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionParams;
    use crate::testing::{ScriptedGateway, registry, text};
    use serde_json::json;
    use toolbench_domain::TraceKind;

    async fn run_with(gateway: &ScriptedGateway, prompt: &str) -> Result<RunnerResult, StrategyError> {
        let registry = registry();
        let params = ExecutionParams::default();
        let ctx = RunContext {
            gateway,
            registry: &registry,
            prompt,
            model: "m",
            params: &params,
        };
        run(&ctx).await
    }

    #[tokio::test]
    async fn test_respond_returns_after_one_call() {
        let gateway = ScriptedGateway::new(vec![text(r#"{"action": "respond", "response": "Hello!"}"#)]);
        let result = run_with(&gateway, "say hi").await.unwrap();
        assert_eq!(result.final_text, "Hello!");
        assert!(result.tool_calls.is_empty());
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_call_tool_then_finalize() {
        let gateway = ScriptedGateway::new(vec![
            text(r#"```json
{"action": "call_tool", "toolName": "calculate_stats", "args": {"values": [1, 2, 3], "operation": "sum"}}
```"#),
            text(r#"{"action": "respond", "response": "The sum is 6."}"#),
        ]);
        let result = run_with(&gateway, "sum 1 2 3").await.unwrap();

        assert_eq!(result.final_text, "The sum is 6.");
        assert_eq!(result.tool_calls.len(), 1);
        let call = &result.tool_calls[0];
        assert_eq!(call.tool_name, "calculate_stats");
        assert_eq!(call.result, json!({"result": 6.0}));
        assert!(!call.repaired);

        let requests = gateway.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.response_schema.is_some() && r.functions.is_empty()));
        assert!(result.trace.iter().any(|s| s.kind == TraceKind::Intent));
    }

    #[tokio::test]
    async fn test_invalid_args_are_fatal_without_repair() {
        let gateway = ScriptedGateway::new(vec![
            text(r#"{"action": "call_tool", "toolName": "calculate_stats", "args": {"values": ["a"], "operation": "sum"}}"#),
            text(r#"{"action": "respond", "response": "unreachable"}"#),
        ]);
        let err = run_with(&gateway, "sum a").await.unwrap_err();
        assert!(matches!(err, StrategyError::Validation { .. }));
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_fatal() {
        let gateway = ScriptedGateway::new(vec![text(
            r#"{"action": "call_tool", "toolName": "launch_rocket", "args": {}}"#,
        )]);
        let err = run_with(&gateway, "launch").await.unwrap_err();
        assert!(matches!(err, StrategyError::UnknownTool(name) if name == "launch_rocket"));
    }

    #[tokio::test]
    async fn test_missing_field_is_fatal() {
        let gateway = ScriptedGateway::new(vec![text(r#"{"action": "respond"}"#)]);
        let err = run_with(&gateway, "hi").await.unwrap_err();
        assert!(matches!(err, StrategyError::Intent(_)));
    }
}
