//! Gateway configuration from TOML (`[gateway]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Raw gateway configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// Base URL of the Gemini-compatible REST endpoint
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// API key; falls back to `GEMINI_API_KEY` / `GOOGLE_API_KEY`.
    /// Never serialized.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 120,
            api_key: None,
        }
    }
}

impl FileGatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
