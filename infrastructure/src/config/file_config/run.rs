//! Run configuration from TOML (`[run]` section)

use serde::{Deserialize, Serialize};
use toolbench_domain::StrategyKind;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Raw run configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRunConfig {
    /// Strategy used by `toolbench run` when `-s` is not given
    pub strategy: StrategyKind,
    /// Model used by `toolbench run` when `-m` is not given
    pub model: String,
    /// Extra attempts after the first failed one
    pub max_retries: u32,
    pub router_max_turns: usize,
    pub hybrid_max_turns: usize,
    /// Separate model for argument repair exchanges
    pub repair_model: Option<String>,
}

impl Default for FileRunConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            model: DEFAULT_MODEL.to_string(),
            max_retries: 1,
            router_max_turns: 4,
            hybrid_max_turns: 3,
            repair_model: None,
        }
    }
}
