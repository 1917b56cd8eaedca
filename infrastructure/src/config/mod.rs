//! Configuration file loading for toolbench
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TOOLBENCH_` environment variables (`TOOLBENCH_RUN__MODEL=...`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./toolbench.toml` or `./.toolbench.toml`
//! 4. Global: `$XDG_CONFIG_HOME/toolbench/config.toml`
//! 5. Default values

mod api_key;
mod file_config;
mod loader;

pub use api_key::{API_KEY_ENV_VARS, resolve_api_key, resolve_api_key_from_env};
pub use file_config::{
    ConfigValidationError, DEFAULT_BASE_URL, DEFAULT_MODEL, FileBenchmarkConfig, FileConfig,
    FileGatewayConfig, FileRunConfig, FileTransportConfig,
};
pub use loader::{ConfigError, ConfigLoader, ConfigSources};
