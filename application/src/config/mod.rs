//! Application-level configuration.
//!
//! - [`ExecutionParams`]: strategy turn budgets, attempt retry, repair model
//! - [`RetryPolicy`](crate::retry::RetryPolicy) lives with the transport retry decorator

pub mod execution_params;

pub use execution_params::ExecutionParams;
