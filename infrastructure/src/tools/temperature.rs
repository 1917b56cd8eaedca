//! convert_temperature tool

use super::{args_schema, parse_args, round2};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use toolbench_domain::{ToolDefinition, ToolError, ToolExecutionContext};

pub const CONVERT_TEMPERATURE: &str = "convert_temperature";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    C,
    F,
    K,
}

impl Scale {
    fn to_kelvin(self, value: f64) -> f64 {
        match self {
            Scale::C => value + 273.15,
            Scale::F => (value - 32.0) * 5.0 / 9.0 + 273.15,
            Scale::K => value,
        }
    }

    fn from_kelvin(self, kelvin: f64) -> f64 {
        match self {
            Scale::C => kelvin - 273.15,
            Scale::F => (kelvin - 273.15) * 9.0 / 5.0 + 32.0,
            Scale::K => kelvin,
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ConvertTemperatureArgs {
    /// Temperature to convert
    pub value: f64,
    /// Source scale: c, f or k
    pub from: Scale,
    /// Target scale: c, f or k
    pub to: Scale,
}

/// Get the tool definition for convert_temperature
pub fn convert_temperature_definition() -> ToolDefinition {
    ToolDefinition::new(
        CONVERT_TEMPERATURE,
        "Convert a temperature between Celsius (c), Fahrenheit (f) and Kelvin (k)",
        args_schema::<ConvertTemperatureArgs>(),
        execute_convert_temperature,
    )
}

pub fn convert(value: f64, from: Scale, to: Scale) -> Result<f64, ToolError> {
    let kelvin = from.to_kelvin(value);
    if kelvin < 0.0 {
        return Err(ToolError::Execution(format!(
            "{} {:?} is below absolute zero",
            value, from
        )));
    }
    Ok(to.from_kelvin(kelvin))
}

/// Execute the convert_temperature tool
pub fn execute_convert_temperature(
    args: &Map<String, Value>,
    _context: &ToolExecutionContext,
) -> Result<Value, ToolError> {
    let args: ConvertTemperatureArgs = parse_args(args)?;
    let converted = convert(args.value, args.from, args.to)?;
    Ok(json!({ "value": round2(converted), "unit": args.to }))
}
