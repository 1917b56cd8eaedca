//! Infrastructure layer for toolbench
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Gemini HTTP gateway, the built-in
//! tools and presets, and configuration file loading.

pub mod config;
pub mod gemini;
pub mod presets;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, ConfigSources, ConfigValidationError, FileConfig,
    resolve_api_key, resolve_api_key_from_env,
};
pub use gemini::GeminiGateway;
pub use presets::{builtin_presets, find_preset, resolve_presets};
pub use tools::default_registry;
