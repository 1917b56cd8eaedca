//! Transport transient retry
//!
//! The attempt retry layer lives in
//! [`RunStrategyUseCase`](crate::use_cases::run_strategy::RunStrategyUseCase).
//! This module is the inner layer: each individual model call is retried a
//! small bounded number of times, and only when the failure looks transient.

pub mod gateway;
pub mod transient;

pub use gateway::{RetryPolicy, RetryingGateway};
pub use transient::{is_transient, parse_retry_hint, retry_hint};
