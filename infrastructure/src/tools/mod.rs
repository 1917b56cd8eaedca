//! Built-in demo tools
//!
//! Each tool has a typed argument struct. The argument schema is derived
//! from it with `schemars`, and the executor deserializes the (already
//! validated) argument object back into it with `serde`.
//!
//! - `calculate_stats`: sum / mean / min / max over a list of numbers
//! - `current_time`: the current time at a fixed UTC offset
//! - `convert_temperature`: between Celsius, Fahrenheit and Kelvin
//! - `word_count`: words and characters in a text

pub mod stats;
pub mod temperature;
pub mod text;
pub mod time;

use schemars::JsonSchema;
use schemars::generate::SchemaSettings;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use toolbench_domain::{RegistryError, ToolError, ToolRegistry};

/// Create the registry with every built-in tool
pub fn default_registry() -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::new()
        .register(stats::calculate_stats_definition())?
        .register(time::current_time_definition())?
        .register(temperature::convert_temperature_definition())?
        .register(text::word_count_definition())
}

/// Argument schema for `T`, with every subschema inlined.
pub(crate) fn args_schema<T: JsonSchema>() -> Value {
    SchemaSettings::draft2020_12()
        .with(|s| s.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<T>()
        .to_value()
}

pub(crate) fn parse_args<T: DeserializeOwned>(args: &Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Round to two decimals for display-friendly results.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
