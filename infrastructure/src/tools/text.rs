//! word_count tool

use super::{args_schema, parse_args};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use toolbench_domain::{ToolDefinition, ToolError, ToolExecutionContext};

pub const WORD_COUNT: &str = "word_count";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WordCountArgs {
    /// Text to count words in
    pub text: String,
}

/// Get the tool definition for word_count
pub fn word_count_definition() -> ToolDefinition {
    ToolDefinition::new(
        WORD_COUNT,
        "Count the words and characters in a piece of text",
        args_schema::<WordCountArgs>(),
        execute_word_count,
    )
}

/// Execute the word_count tool
pub fn execute_word_count(
    args: &Map<String, Value>,
    _context: &ToolExecutionContext,
) -> Result<Value, ToolError> {
    let args: WordCountArgs = parse_args(args)?;
    Ok(json!({
        "words": args.text.split_whitespace().count(),
        "characters": args.text.chars().count(),
    }))
}
