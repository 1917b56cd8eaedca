//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod benchmark;
mod gateway;
mod run;
mod transport;

pub use benchmark::FileBenchmarkConfig;
pub use gateway::{DEFAULT_BASE_URL, FileGatewayConfig};
pub use run::{DEFAULT_MODEL, FileRunConfig};
pub use transport::FileTransportConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toolbench_application::ExecutionParams;
use toolbench_domain::GenerationOptions;

/// A problem found by [`FileConfig::validate`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("gateway.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("{field} cannot be 0")]
    ZeroTurnBudget { field: &'static str },

    #[error("benchmark.iterations cannot be 0")]
    ZeroIterations,

    #[error("{field} contains an empty model name")]
    EmptyModelName { field: &'static str },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model endpoint settings
    pub gateway: FileGatewayConfig,
    /// Single-run defaults
    pub run: FileRunConfig,
    /// Generation shaping, passed to the gateway as-is
    pub generation: GenerationOptions,
    /// Benchmark matrix defaults
    pub benchmark: FileBenchmarkConfig,
    /// Transient-failure retry settings
    pub transport: FileTransportConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.gateway.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        if self.run.router_max_turns == 0 {
            issues.push(ConfigValidationError::ZeroTurnBudget {
                field: "run.router_max_turns",
            });
        }
        if self.run.hybrid_max_turns == 0 {
            issues.push(ConfigValidationError::ZeroTurnBudget {
                field: "run.hybrid_max_turns",
            });
        }
        if self.benchmark.iterations == 0 {
            issues.push(ConfigValidationError::ZeroIterations);
        }

        if self.run.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName { field: "run.model" });
        }
        if self
            .run
            .repair_model
            .as_deref()
            .is_some_and(|m| m.trim().is_empty())
        {
            issues.push(ConfigValidationError::EmptyModelName {
                field: "run.repair_model",
            });
        }
        if self.benchmark.models.iter().any(|m| m.trim().is_empty()) {
            issues.push(ConfigValidationError::EmptyModelName {
                field: "benchmark.models",
            });
        }

        issues
    }

    /// Strategy execution parameters from `[run]` and `[generation]`.
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_retries(self.run.max_retries)
            .with_router_max_turns(self.run.router_max_turns)
            .with_hybrid_max_turns(self.run.hybrid_max_turns)
            .with_repair_model(self.run.repair_model.clone())
            .with_generation(self.generation.clone())
    }
}
