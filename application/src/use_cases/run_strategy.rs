//! Run Strategy use case
//!
//! Runs one strategy with bounded attempt retry: up to `max_retries + 1`
//! fully independent attempts, each a fresh strategy run with no state
//! carried over. Any attempt error is recorded and retried; once attempts
//! run out the final failure is returned.

use crate::config::ExecutionParams;
use crate::ports::model_gateway::ModelGateway;
use crate::ports::progress::LogSink;
use crate::strategies::{RunContext, run_strategy};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use toolbench_domain::{RunnerResult, StrategyKind, ToolRegistry};
use tracing::{info, warn};

/// Errors returned once every attempt has failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunStrategyError {
    #[error("Strategy {strategy} failed after {attempts} attempt(s): {message}")]
    AttemptsExhausted {
        strategy: StrategyKind,
        attempts: u32,
        /// Display text of the final attempt's error
        message: String,
    },
}

/// Input for the RunStrategy use case
#[derive(Debug, Clone)]
pub struct RunStrategyInput {
    pub strategy: StrategyKind,
    pub model: String,
    pub prompt: String,
    pub params: ExecutionParams,
}

impl RunStrategyInput {
    pub fn new(strategy: StrategyKind, model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            strategy,
            model: model.into(),
            prompt: prompt.into(),
            params: ExecutionParams::default(),
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }
}

/// A successful run and the attempt it succeeded on
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStrategyOutput {
    pub attempts: u32,
    #[serde(flatten)]
    pub result: RunnerResult,
}

/// Use case for running a single strategy with attempt retry
pub struct RunStrategyUseCase<G: ModelGateway + 'static> {
    gateway: Arc<G>,
    registry: Arc<ToolRegistry>,
    log: Option<LogSink>,
}

impl<G: ModelGateway + 'static> RunStrategyUseCase<G> {
    pub fn new(gateway: Arc<G>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            gateway,
            registry,
            log: None,
        }
    }

    /// Attach a line logger (attempt start and attempt error).
    pub fn with_log_sink(mut self, sink: LogSink) -> Self {
        self.log = Some(sink);
        self
    }

    pub(crate) fn log_line(&self, line: &str) {
        if let Some(sink) = &self.log {
            sink(line);
        }
    }

    pub async fn execute(
        &self,
        input: &RunStrategyInput,
    ) -> Result<RunStrategyOutput, RunStrategyError> {
        let max_attempts = input.params.max_attempts();
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            info!(
                strategy = %input.strategy,
                model = %input.model,
                attempt,
                max_attempts,
                "Starting strategy attempt"
            );
            self.log_line(&format!(
                "[{}] {} attempt {}/{}",
                input.model, input.strategy, attempt, max_attempts
            ));

            let ctx = RunContext {
                gateway: self.gateway.as_ref(),
                registry: &self.registry,
                prompt: &input.prompt,
                model: &input.model,
                params: &input.params,
            };

            match run_strategy(input.strategy, &ctx).await {
                Ok(result) => {
                    return Ok(RunStrategyOutput {
                        attempts: attempt,
                        result,
                    });
                }
                Err(error) => {
                    warn!(
                        strategy = %input.strategy,
                        model = %input.model,
                        attempt,
                        error = %error,
                        "Strategy attempt failed"
                    );
                    self.log_line(&format!(
                        "[{}] {} attempt {}/{} failed: {}",
                        input.model, input.strategy, attempt, max_attempts, error
                    ));
                    last_error = error.to_string();
                }
            }
        }

        Err(RunStrategyError::AttemptsExhausted {
            strategy: input.strategy,
            attempts: max_attempts,
            message: last_error,
        })
    }
}
