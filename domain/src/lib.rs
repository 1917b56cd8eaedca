//! Domain layer for toolbench
//!
//! This crate contains the core types and pure logic. It has no dependencies
//! on infrastructure or presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Tool negotiation
//!
//! A text-generation model is asked to either answer directly or invoke one
//! of a set of registered tools. Model output is unreliable, so every
//! structured exchange goes through the [`json`] recovery pipeline and every
//! tool argument object through the [`tool::ToolRegistry`] schema check
//! before anything executes.
//!
//! ## Strategies
//!
//! Three protocols ([`StrategyKind`]) negotiate tool calls differently:
//!
//! - **structured-json**: JSON-only selection then finalization
//! - **single-tool-router**: one native dispatcher function forwarding by name
//! - **hybrid-repair**: every tool offered natively, invalid arguments repaired
//!
//! ## Benchmarks
//!
//! The [`benchmark`] module reduces per-cell run records into aggregates and
//! per-model comparisons.

pub mod benchmark;
pub mod intent;
pub mod json;
pub mod session;
pub mod strategy;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use benchmark::{
    BenchmarkAggregate, BenchmarkComparison, BenchmarkMatrix, BenchmarkReport, BenchmarkRunRecord,
    Preset,
};
pub use intent::{IntentError, IntentPrompt, ToolIntent};
pub use json::{RecoveryError, ShapeError};
pub use session::{
    FunctionCallingMode, FunctionDeclaration, FunctionResponse, GenerationOptions,
    ModelFunctionCall, ModelRequest, ModelResult, RawContent, Turn,
};
pub use strategy::{RunRecorder, RunnerResult, RunnerTraceStep, StrategyKind, TraceKind};
pub use tool::{
    RegistryError, ToolCallRecord, ToolDefinition, ToolError, ToolExecutionContext, ToolHandler,
    ToolRegistry, ValidatedArgs,
};
