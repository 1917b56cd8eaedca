//! Tool Registry
//!
//! [`ToolRegistry`] is a name-keyed table of [`ToolDefinition`]s populated
//! once at startup and read-only afterwards. Each definition's argument
//! schema is compiled when the tool is registered, so validation never has
//! to deal with a broken schema at run time.
//!
//! Arguments only reach an executor as [`ValidatedArgs`], which can only be
//! produced by [`ToolRegistry::validate_args`].

use std::collections::BTreeMap;
use std::fmt;

use jsonschema::Validator;
use serde_json::{Map, Value};
use thiserror::Error;

use super::entities::ToolDefinition;
use super::value_objects::{ToolError, ToolExecutionContext};
use crate::session::request::FunctionDeclaration;

/// Errors raised by registry operations.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Invalid argument schema for tool '{tool}': {message}")]
    InvalidSchema { tool: String, message: String },

    #[error("Arguments were validated for '{validated}' but executed as '{requested}'")]
    ArgsMismatch { validated: String, requested: String },

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Arguments that passed a tool's schema validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedArgs {
    tool_name: String,
    args: Map<String, Value>,
}

impl ValidatedArgs {
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn args(&self) -> &Map<String, Value> {
        &self.args
    }

    pub fn into_args(self) -> Map<String, Value> {
        self.args
    }
}

struct RegisteredTool {
    definition: ToolDefinition,
    validator: Validator,
}

/// Name-keyed store of tool definitions.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool (builder pattern).
    ///
    /// Fails if the name is taken or the argument schema does not compile.
    pub fn register(mut self, tool: ToolDefinition) -> Result<Self, RegistryError> {
        if self.tools.contains_key(&tool.name) {
            return Err(RegistryError::DuplicateTool(tool.name));
        }
        let validator =
            jsonschema::validator_for(&tool.args_schema).map_err(|e| RegistryError::InvalidSchema {
                tool: tool.name.clone(),
                message: e.to_string(),
            })?;
        self.tools.insert(
            tool.name.clone(),
            RegisteredTool {
                definition: tool,
                validator,
            },
        );
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name).map(|t| &t.definition)
    }

    /// Registered tools, sorted by name.
    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values().map(|t| &t.definition)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate raw arguments against the named tool's schema.
    ///
    /// Never panics. On failure the message is a `"; "`-joined list of
    /// `"<path>: <message>"` issues, with `root` standing in for an empty
    /// path.
    pub fn validate_args(&self, name: &str, raw: &Value) -> Result<ValidatedArgs, String> {
        let Some(tool) = self.tools.get(name) else {
            return Err(format!("root: Unknown tool: {}", name));
        };

        let issues: Vec<String> = tool
            .validator
            .iter_errors(raw)
            .map(|error| {
                let pointer = error.instance_path().to_string();
                format!("{}: {}", display_path(&pointer), error)
            })
            .collect();

        if !issues.is_empty() {
            return Err(issues.join("; "));
        }

        match raw {
            Value::Object(map) => Ok(ValidatedArgs {
                tool_name: name.to_string(),
                args: map.clone(),
            }),
            _ => Err("root: expected a JSON object".to_string()),
        }
    }

    /// Execute a tool with validated arguments.
    pub async fn execute(
        &self,
        name: &str,
        args: &ValidatedArgs,
        context: &ToolExecutionContext,
    ) -> Result<Value, RegistryError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| RegistryError::UnknownTool(name.to_string()))?;
        if args.tool_name != name {
            return Err(RegistryError::ArgsMismatch {
                validated: args.tool_name.clone(),
                requested: name.to_string(),
            });
        }
        Ok(tool.definition.handler().execute(&args.args, context).await?)
    }

    /// Prompt-facing description of every tool: name, description and schema.
    pub fn prompt_description(&self) -> String {
        self.all()
            .map(|tool| {
                format!(
                    "- {}: {}\n  args schema: {}",
                    tool.name,
                    tool.description,
                    tool.declared_schema()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Native function declarations for transports with tool calling.
    pub fn function_declarations(&self) -> Vec<FunctionDeclaration> {
        self.all()
            .map(|tool| {
                FunctionDeclaration::new(&tool.name, &tool.description, tool.declared_schema())
            })
            .collect()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// JSON pointer (`/values/1`) to dotted issue path (`values.1`).
fn display_path(pointer: &str) -> String {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        "root".to_string()
    } else {
        trimmed.replace('/', ".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sum_tool() -> ToolDefinition {
        ToolDefinition::new(
            "sum",
            "Add numbers",
            json!({
                "type": "object",
                "properties": {
                    "values": {"type": "array", "items": {"type": "number"}}
                },
                "required": ["values"],
                "additionalProperties": false
            }),
            |args: &Map<String, Value>, _ctx: &ToolExecutionContext| -> Result<Value, ToolError> {
                let total: f64 = args["values"]
                    .as_array()
                    .map(|v| v.iter().filter_map(|n| n.as_f64()).sum())
                    .unwrap_or(0.0);
                Ok(json!({"sum": total}))
            },
        )
    }

    fn failing_tool() -> ToolDefinition {
        ToolDefinition::new(
            "explode",
            "Always fails",
            json!({"type": "object"}),
            |_: &Map<String, Value>, _: &ToolExecutionContext| -> Result<Value, ToolError> {
                Err(ToolError::Execution("boom".to_string()))
            },
        )
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new()
            .register(sum_tool())
            .unwrap()
            .register(failing_tool())
            .unwrap()
    }

    #[test]
    fn test_valid_args() {
        let registry = registry();
        let args = registry
            .validate_args("sum", &json!({"values": [1, 2, 3]}))
            .unwrap();
        assert_eq!(args.tool_name(), "sum");
        assert_eq!(args.args()["values"], json!([1, 2, 3]));
    }

    #[test]
    fn test_invalid_item_reports_path() {
        let registry = registry();
        let err = registry
            .validate_args("sum", &json!({"values": [1, "two", 3]}))
            .unwrap_err();
        assert!(err.starts_with("values.1: "), "unexpected error: {}", err);
    }

    #[test]
    fn test_missing_field_reports_root() {
        let registry = registry();
        let err = registry.validate_args("sum", &json!({})).unwrap_err();
        assert!(err.starts_with("root: "), "unexpected error: {}", err);
        assert!(err.contains("values"));
    }

    #[test]
    fn test_multiple_issues_are_joined() {
        let registry = registry();
        let err = registry
            .validate_args("sum", &json!({"values": ["a", "b"]}))
            .unwrap_err();
        assert_eq!(err.matches("; ").count(), 1);
        assert!(err.contains("values.0"));
        assert!(err.contains("values.1"));
    }

    #[test]
    fn test_non_object_rejected() {
        let registry = registry();
        assert!(registry.validate_args("sum", &json!([1, 2])).is_err());
        assert!(registry.validate_args("explode", &json!("x")).is_err());
    }

    #[test]
    fn test_unknown_tool_validation_fails() {
        let registry = registry();
        let err = registry.validate_args("nope", &json!({})).unwrap_err();
        assert_eq!(err, "root: Unknown tool: nope");
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let result = ToolRegistry::new()
            .register(sum_tool())
            .unwrap()
            .register(sum_tool());
        assert!(matches!(result, Err(RegistryError::DuplicateTool(name)) if name == "sum"));
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let bad = ToolDefinition::new(
            "bad",
            "Bad schema",
            json!({"type": 12}),
            |_: &Map<String, Value>, _: &ToolExecutionContext| -> Result<Value, ToolError> {
                Ok(Value::Null)
            },
        );
        assert!(matches!(
            ToolRegistry::new().register(bad),
            Err(RegistryError::InvalidSchema { .. })
        ));
    }

    #[tokio::test]
    async fn test_execute_validated_args() {
        let registry = registry();
        let args = registry
            .validate_args("sum", &json!({"values": [1.5, 2.5]}))
            .unwrap();
        let result = registry
            .execute("sum", &args, &ToolExecutionContext::now())
            .await
            .unwrap();
        assert_eq!(result, json!({"sum": 4.0}));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = registry();
        let args = registry.validate_args("explode", &json!({})).unwrap();
        let err = registry
            .execute("missing", &args, &ToolExecutionContext::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownTool(name) if name == "missing"));
    }

    #[tokio::test]
    async fn test_execute_rejects_args_validated_for_other_tool() {
        let registry = registry();
        let args = registry.validate_args("explode", &json!({})).unwrap();
        let err = registry
            .execute("sum", &args, &ToolExecutionContext::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::ArgsMismatch { .. }));
    }

    #[tokio::test]
    async fn test_executor_error_propagates() {
        let registry = registry();
        let args = registry.validate_args("explode", &json!({})).unwrap();
        let err = registry
            .execute("explode", &args, &ToolExecutionContext::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Tool(ToolError::Execution(msg)) if msg == "boom"));
    }

    #[test]
    fn test_prompt_description_lists_tools_sorted() {
        let description = registry().prompt_description();
        let explode = description.find("- explode:").unwrap();
        let sum = description.find("- sum:").unwrap();
        assert!(explode < sum);
        assert!(description.contains("\"required\":[\"values\"]"));
    }

    #[test]
    fn test_function_declarations() {
        let declarations = registry().function_declarations();
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[1].name, "sum");
        assert_eq!(declarations[1].parameters["type"], "object");
    }

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(""), "root");
        assert_eq!(display_path("/values/1"), "values.1");
    }
}
