//! Application layer for toolbench
//!
//! This crate contains the strategy engines, the retry/backoff controller,
//! use cases and port definitions. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod retry;
pub mod strategies;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    model_gateway::{GatewayError, ModelGateway},
    progress::{BenchmarkProgress, LogSink, NoProgress},
};
pub use retry::{RetryPolicy, RetryingGateway};
pub use strategies::{RunContext, StrategyError, run_strategy};
pub use use_cases::run_benchmark::{RunBenchmarkInput, RunBenchmarkUseCase};
pub use use_cases::run_strategy::{
    RunStrategyError, RunStrategyInput, RunStrategyOutput, RunStrategyUseCase,
};
