//! Strategy identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of tool negotiation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// JSON-only selection and finalization, no native tool calling
    StructuredJson,
    /// Native calling through a single generic dispatcher
    SingleToolRouter,
    /// Native per-tool calling with argument repair (default)
    #[default]
    HybridRepair,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::StructuredJson,
        StrategyKind::SingleToolRouter,
        StrategyKind::HybridRepair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::StructuredJson => "structured-json",
            StrategyKind::SingleToolRouter => "single-tool-router",
            StrategyKind::HybridRepair => "hybrid-repair",
        }
    }

    /// Whether the strategy relies on the transport's native function calling
    pub fn uses_native_calling(&self) -> bool {
        !matches!(self, StrategyKind::StructuredJson)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "structured-json" | "structured" | "json" => Ok(StrategyKind::StructuredJson),
            "single-tool-router" | "router" => Ok(StrategyKind::SingleToolRouter),
            "hybrid-repair" | "hybrid" => Ok(StrategyKind::HybridRepair),
            _ => Err(format!(
                "Invalid strategy: {} (expected structured-json, single-tool-router or hybrid-repair)",
                s
            )),
        }
    }
}
