//! current_time tool

use super::{args_schema, parse_args};
use chrono::{FixedOffset, SecondsFormat};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use toolbench_domain::{ToolDefinition, ToolError, ToolExecutionContext};

pub const CURRENT_TIME: &str = "current_time";

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CurrentTimeArgs {
    /// Offset from UTC in whole hours (defaults to 0)
    #[schemars(range(min = -12, max = 14))]
    #[serde(default)]
    pub utc_offset_hours: Option<i32>,
}

/// Get the tool definition for current_time
pub fn current_time_definition() -> ToolDefinition {
    ToolDefinition::new(
        CURRENT_TIME,
        "Get the current date and time, optionally at a UTC offset in hours",
        args_schema::<CurrentTimeArgs>(),
        execute_current_time,
    )
}

/// Execute the current_time tool
///
/// Reads the time from the execution context, never from the system clock.
pub fn execute_current_time(
    args: &Map<String, Value>,
    context: &ToolExecutionContext,
) -> Result<Value, ToolError> {
    let args: CurrentTimeArgs = parse_args(args)?;
    let hours = args.utc_offset_hours.unwrap_or(0);
    let offset = FixedOffset::east_opt(hours * 3600).ok_or_else(|| {
        ToolError::InvalidArguments(format!("utc_offset_hours out of range: {}", hours))
    })?;
    let local = context.now.with_timezone(&offset);

    Ok(json!({
        "utc": context.now.to_rfc3339_opts(SecondsFormat::Secs, true),
        "local": local.to_rfc3339_opts(SecondsFormat::Secs, true),
        "utcOffsetHours": hours,
        "weekday": local.format("%A").to_string(),
    }))
}
