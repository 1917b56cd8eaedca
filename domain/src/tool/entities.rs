//! Tool domain entities

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::value_objects::{ToolError, ToolExecutionContext};

/// Executor behind a tool definition.
///
/// Receives arguments that already passed the tool's schema validation.
/// Errors are propagated to the caller unchanged.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        context: &ToolExecutionContext,
    ) -> Result<Value, ToolError>;
}

#[async_trait]
impl<F> ToolHandler for F
where
    F: Fn(&Map<String, Value>, &ToolExecutionContext) -> Result<Value, ToolError> + Send + Sync,
{
    async fn execute(
        &self,
        args: &Map<String, Value>,
        context: &ToolExecutionContext,
    ) -> Result<Value, ToolError> {
        self(args, context)
    }
}

/// A named tool: description, argument schema and executor.
///
/// Tools are data, not a type hierarchy. The `args_schema` is a JSON Schema
/// describing the argument object.
#[derive(Clone)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "calculate_stats")
    pub name: String,
    /// Human-readable description shown to the model
    pub description: String,
    /// JSON Schema of the argument object
    pub args_schema: Value,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        args_schema: Value,
        handler: impl ToolHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            args_schema,
            handler: Arc::new(handler),
        }
    }

    pub fn handler(&self) -> &dyn ToolHandler {
        self.handler.as_ref()
    }

    /// Argument schema with generator metadata (`$schema`, `title`) removed,
    /// suitable for prompts and function declarations.
    pub fn declared_schema(&self) -> Value {
        let mut schema = self.args_schema.clone();
        if let Value::Object(map) = &mut schema {
            map.remove("$schema");
            map.remove("title");
        }
        schema
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("args_schema", &self.args_schema)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo(args: &Map<String, Value>, _ctx: &ToolExecutionContext) -> Result<Value, ToolError> {
        Ok(Value::Object(args.clone()))
    }

    #[tokio::test]
    async fn test_fn_handler_executes() {
        let tool = ToolDefinition::new("echo", "Echo args", json!({"type": "object"}), echo);
        let args = json!({"a": 1}).as_object().unwrap().clone();
        let result = tool
            .handler()
            .execute(&args, &ToolExecutionContext::now())
            .await
            .unwrap();
        assert_eq!(result, json!({"a": 1}));
    }

    #[test]
    fn test_declared_schema_strips_metadata() {
        let tool = ToolDefinition::new(
            "echo",
            "Echo args",
            json!({"$schema": "https://json-schema.org/draft/2020-12/schema", "title": "EchoArgs", "type": "object"}),
            echo,
        );
        assert_eq!(tool.declared_schema(), json!({"type": "object"}));
        assert!(tool.args_schema.get("title").is_some());
    }

    #[test]
    fn test_debug_omits_handler() {
        let tool = ToolDefinition::new("echo", "Echo args", json!({}), echo);
        let debug = format!("{:?}", tool);
        assert!(debug.contains("echo"));
        assert!(debug.contains(".."));
    }
}
