//! Strategy identifiers and run results
//!
//! The engines themselves live in the application layer, since they drive
//! the model gateway port. This module holds the pure parts they share.

pub mod kind;
pub mod result;

pub use kind::StrategyKind;
pub use result::{RunRecorder, RunnerResult, RunnerTraceStep, TraceKind};
