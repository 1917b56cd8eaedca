//! Prompt templates for the tool negotiation exchanges

use serde_json::{Map, Value};

/// Templates for each exchange a strategy may issue
pub struct IntentPrompt;

impl IntentPrompt {
    /// System prompt for the JSON-only selection exchange
    pub fn selection_system() -> &'static str {
        r#"You decide whether a user request needs one of the available tools.
Reply with a single JSON object and nothing else: no prose, no markdown.
To use a tool reply {"action": "call_tool", "toolName": "<name>", "args": {...}}.
To answer directly reply {"action": "respond", "response": "<answer>"}.
Arguments must satisfy the tool's args schema exactly."#
    }

    /// User prompt for the selection exchange
    pub fn selection_prompt(user_prompt: &str, tool_descriptions: &str) -> String {
        format!(
            r#"Available tools:
{}

User request:
{}

Return the JSON object now."#,
            tool_descriptions, user_prompt
        )
    }

    /// System prompt for the finalization exchange
    pub fn finalization_system() -> &'static str {
        r#"You turn a tool result into the final answer for the user.
Reply with a single JSON object and nothing else: {"action": "respond", "response": "<answer>"}.
Base the answer on the tool result. Do not invent values."#
    }

    /// User prompt for the finalization exchange
    pub fn finalization_prompt(
        user_prompt: &str,
        tool_name: &str,
        args: &Map<String, Value>,
        result: &Value,
    ) -> String {
        format!(
            r#"User request:
{}

Tool used: {}
Arguments: {}
Result: {}

Return the JSON object now."#,
            user_prompt,
            tool_name,
            Value::Object(args.clone()),
            result
        )
    }

    /// System prompt for the router strategy, which only exposes the dispatcher
    pub fn router_system(dispatch_name: &str, tool_descriptions: &str) -> String {
        format!(
            r#"You can use tools only through the `{}` function.
Call it with `toolName` set to one of the tools below and `argumentsJson` set to a JSON
object string matching that tool's args schema.
When you have everything you need, answer the user in plain text without calling a function.

Tools:
{}"#,
            dispatch_name, tool_descriptions
        )
    }

    /// System prompt for the hybrid strategy, which exposes every tool natively
    pub fn hybrid_system() -> &'static str {
        r#"You are a helpful assistant with access to tools.
Call a tool when the request needs computation, the current time, conversions or counting.
After receiving tool results, answer the user in plain text."#
    }

    /// System prompt for argument repair
    pub fn repair_system() -> &'static str {
        r#"You fix invalid tool arguments.
Reply with a single JSON object that satisfies the given schema and nothing else.
Keep the user's intent. Convert values to the required types where possible."#
    }

    /// User prompt for argument repair
    pub fn repair_prompt(
        user_prompt: &str,
        tool_name: &str,
        schema: &Value,
        broken_args: &str,
        error: &str,
    ) -> String {
        format!(
            r#"User request:
{}

Tool: {}
Args schema: {}

Invalid arguments:
{}

Validation errors:
{}

Return the corrected arguments object now."#,
            user_prompt, tool_name, schema, broken_args, error
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selection_prompt_contains_inputs() {
        let prompt = IntentPrompt::selection_prompt("What is 2+2?", "- calculate_stats: Stats");
        assert!(prompt.contains("What is 2+2?"));
        assert!(prompt.contains("- calculate_stats: Stats"));
    }

    #[test]
    fn test_finalization_prompt_serializes_args_and_result() {
        let args = json!({"values": [1, 2]}).as_object().unwrap().clone();
        let prompt =
            IntentPrompt::finalization_prompt("sum it", "calculate_stats", &args, &json!({"result": 3}));
        assert!(prompt.contains(r#"Arguments: {"values":[1,2]}"#));
        assert!(prompt.contains(r#"Result: {"result":3}"#));
    }

    #[test]
    fn test_repair_prompt_carries_schema_and_error() {
        let prompt = IntentPrompt::repair_prompt(
            "sum 1 and 2",
            "calculate_stats",
            &json!({"type": "object"}),
            r#"{"values": ["one"]}"#,
            "values.0: \"one\" is not of type \"number\"",
        );
        assert!(prompt.contains(r#"{"type":"object"}"#));
        assert!(prompt.contains("values.0"));
        assert!(prompt.contains(r#"["one"]"#));
    }

    #[test]
    fn test_router_system_names_dispatcher() {
        let system = IntentPrompt::router_system("dispatch_tool", "- word_count: Count");
        assert!(system.contains("`dispatch_tool`"));
        assert!(system.contains("- word_count"));
    }
}
