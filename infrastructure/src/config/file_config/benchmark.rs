//! Benchmark configuration from TOML (`[benchmark]` section)

use serde::{Deserialize, Serialize};
use toolbench_domain::StrategyKind;

/// Raw benchmark configuration from TOML
///
/// Empty lists mean "use the default": the run model, every strategy,
/// every built-in preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBenchmarkConfig {
    pub models: Vec<String>,
    pub strategies: Vec<StrategyKind>,
    /// Preset ids
    pub presets: Vec<String>,
    pub iterations: u32,
}

impl Default for FileBenchmarkConfig {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            strategies: Vec::new(),
            presets: Vec::new(),
            iterations: 3,
        }
    }
}
