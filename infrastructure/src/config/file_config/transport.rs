//! Transport retry configuration from TOML (`[transport]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use toolbench_application::RetryPolicy;

/// Raw transient-retry configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTransportConfig {
    /// Retries after a transient failure (calls = retries + 1)
    pub max_transient_retries: u32,
    /// Linear backoff unit in milliseconds
    pub backoff_base_ms: u64,
}

impl Default for FileTransportConfig {
    fn default() -> Self {
        Self {
            max_transient_retries: 2,
            backoff_base_ms: 1500,
        }
    }
}

impl FileTransportConfig {
    pub fn to_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_transient_retries,
            Duration::from_millis(self.backoff_base_ms),
        )
    }
}
