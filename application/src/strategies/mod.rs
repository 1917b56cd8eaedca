//! Strategy engines
//!
//! Three independent state machines negotiate tool calls with the model.
//! They share one contract, `run(&RunContext) -> Result<RunnerResult, StrategyError>`,
//! and are selected by matching on the closed [`StrategyKind`] set:
//!
//! | Strategy | Native calling | Offered to the model | Repair |
//! |----------|----------------|----------------------|--------|
//! | [`structured_json`] | No | Selection prompt + schema | None (fatal) |
//! | [`router`] | Yes | One `dispatch_tool` function | One repair exchange |
//! | [`hybrid`] | Yes | Every registered tool | One repair exchange |
//!
//! No engine executes a tool without first obtaining
//! [`ValidatedArgs`](toolbench_domain::ValidatedArgs) from the registry.

mod exchange;
pub mod hybrid;
pub mod router;
pub mod structured_json;

use crate::config::ExecutionParams;
use crate::ports::model_gateway::{GatewayError, ModelGateway};
use thiserror::Error;
use toolbench_domain::{
    IntentError, RecoveryError, RegistryError, RunnerResult, ShapeError, StrategyKind,
    ToolRegistry,
};

/// Errors that end a single strategy attempt
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Invalid model output: {0}")]
    Intent(#[from] IntentError),

    #[error("Invalid model output: {0}")]
    Recovery(#[from] RecoveryError),

    #[error("Invalid model output: {0}")]
    Shape(#[from] ShapeError),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Validation failed for tool '{tool}': {message}")]
    Validation { tool: String, message: String },

    #[error("Invalid function call: {0}")]
    InvalidFunctionCall(String),

    #[error("Tool execution failed: {0}")]
    Tool(#[from] RegistryError),
}

/// Everything one strategy run reads. Nothing in it is mutated by the run.
#[derive(Clone, Copy)]
pub struct RunContext<'a> {
    pub gateway: &'a dyn ModelGateway,
    pub registry: &'a ToolRegistry,
    pub prompt: &'a str,
    pub model: &'a str,
    pub params: &'a ExecutionParams,
}

/// Run one attempt of the selected strategy.
pub async fn run_strategy(
    kind: StrategyKind,
    ctx: &RunContext<'_>,
) -> Result<RunnerResult, StrategyError> {
    match kind {
        StrategyKind::StructuredJson => structured_json::run(ctx).await,
        StrategyKind::SingleToolRouter => router::run(ctx).await,
        StrategyKind::HybridRepair => hybrid::run(ctx).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedGateway, registry, text};

    #[tokio::test]
    async fn test_dispatch_selects_engine() {
        let registry = registry();
        let params = ExecutionParams::default();

        let gateway = ScriptedGateway::new(vec![text(r#"{"action": "respond", "response": "hi"}"#)]);
        let ctx = RunContext {
            gateway: &gateway,
            registry: &registry,
            prompt: "hello",
            model: "m",
            params: &params,
        };
        let result = run_strategy(StrategyKind::StructuredJson, &ctx).await.unwrap();
        assert_eq!(result.strategy, StrategyKind::StructuredJson);
        assert!(gateway.requests()[0].response_schema.is_some());

        let gateway = ScriptedGateway::new(vec![text("plain answer")]);
        let ctx = RunContext { gateway: &gateway, ..ctx };
        let result = run_strategy(StrategyKind::HybridRepair, &ctx).await.unwrap();
        assert_eq!(result.strategy, StrategyKind::HybridRepair);
        assert_eq!(gateway.requests()[0].functions.len(), 2);

        let gateway = ScriptedGateway::new(vec![text("plain answer")]);
        let ctx = RunContext { gateway: &gateway, ..ctx };
        let result = run_strategy(StrategyKind::SingleToolRouter, &ctx).await.unwrap();
        assert_eq!(result.strategy, StrategyKind::SingleToolRouter);
        assert_eq!(gateway.requests()[0].functions[0].name, router::DISPATCH_TOOL_NAME);
    }
}
