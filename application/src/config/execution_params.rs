//! Execution parameters: strategy loop and retry control.
//!
//! [`ExecutionParams`] groups the static parameters that bound a strategy run
//! and its attempt retry. These are application-layer concerns; generation
//! options are carried along uninterpreted for the gateway.

use serde::{Deserialize, Serialize};
use toolbench_domain::GenerationOptions;

/// Strategy loop and attempt retry parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Extra attempts after the first failed strategy run.
    pub max_retries: u32,
    /// Turn budget for the single-tool-router strategy.
    pub router_max_turns: usize,
    /// Turn budget for the hybrid-repair strategy.
    pub hybrid_max_turns: usize,
    /// Model used for argument repair exchanges (defaults to the run model).
    pub repair_model: Option<String>,
    /// Passed through to every model request.
    pub generation: GenerationOptions,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_retries: 1,
            router_max_turns: 4,
            hybrid_max_turns: 3,
            repair_model: None,
            generation: GenerationOptions::default(),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_router_max_turns(mut self, max: usize) -> Self {
        self.router_max_turns = max;
        self
    }

    pub fn with_hybrid_max_turns(mut self, max: usize) -> Self {
        self.hybrid_max_turns = max;
        self
    }

    pub fn with_repair_model(mut self, model: Option<String>) -> Self {
        self.repair_model = model;
        self
    }

    pub fn with_generation(mut self, generation: GenerationOptions) -> Self {
        self.generation = generation;
        self
    }

    // ==================== Derived Values ====================

    /// Total attempts the attempt retry layer makes: `max_retries + 1`.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Model for repair exchanges.
    pub fn repair_model_or<'a>(&'a self, model: &'a str) -> &'a str {
        self.repair_model.as_deref().unwrap_or(model)
    }
}
