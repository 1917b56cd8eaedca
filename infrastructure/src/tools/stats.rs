//! calculate_stats tool

use super::{args_schema, parse_args};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use toolbench_domain::{ToolDefinition, ToolError, ToolExecutionContext};

pub const CALCULATE_STATS: &str = "calculate_stats";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Sum,
    Mean,
    Min,
    Max,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CalculateStatsArgs {
    /// Numbers to aggregate
    #[schemars(length(min = 1))]
    pub values: Vec<f64>,
    /// Statistic to compute
    pub operation: Operation,
}

/// Get the tool definition for calculate_stats
pub fn calculate_stats_definition() -> ToolDefinition {
    ToolDefinition::new(
        CALCULATE_STATS,
        "Compute a statistic (sum, mean, min or max) over a list of numbers",
        args_schema::<CalculateStatsArgs>(),
        execute_calculate_stats,
    )
}

pub fn calculate(values: &[f64], operation: Operation) -> Result<f64, ToolError> {
    if values.is_empty() {
        return Err(ToolError::InvalidArguments(
            "values must contain at least one number".to_string(),
        ));
    }
    let result = match operation {
        Operation::Sum => values.iter().sum(),
        Operation::Mean => values.iter().sum::<f64>() / values.len() as f64,
        Operation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        Operation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    };
    Ok(result)
}

/// Execute the calculate_stats tool
pub fn execute_calculate_stats(
    args: &Map<String, Value>,
    _context: &ToolExecutionContext,
) -> Result<Value, ToolError> {
    let args: CalculateStatsArgs = parse_args(args)?;
    let result = calculate(&args.values, args.operation)?;
    Ok(json!({ "result": result }))
}
