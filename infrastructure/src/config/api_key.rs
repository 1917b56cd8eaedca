//! API key resolution
//!
//! The key is resolved once at startup and handed to the gateway
//! constructor. Nothing here writes to the process environment.

/// Environment variables consulted after the configured value, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// First non-empty key among the configured value and [`API_KEY_ENV_VARS`].
pub fn resolve_api_key<F>(configured: Option<&str>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    configured
        .map(str::to_string)
        .into_iter()
        .chain(API_KEY_ENV_VARS.iter().filter_map(|name| lookup(name)))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

/// [`resolve_api_key`] against the process environment.
pub fn resolve_api_key_from_env(configured: Option<&str>) -> Option<String> {
    resolve_api_key(configured, |name| std::env::var(name).ok())
}
