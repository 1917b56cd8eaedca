//! Use cases (application services)

pub mod run_benchmark;
pub mod run_strategy;
