//! Tool domain module
//!
//! Tools are data, not a type hierarchy: a [`ToolDefinition`] pairs a name,
//! a description and a JSON Schema for its argument object with an executor
//! ([`ToolHandler`]). Definitions are registered once into a
//! [`ToolRegistry`] and looked up by name for the rest of the process.
//!
//! ```text
//! ┌────────────────┐  validate_args  ┌───────────────┐  execute  ┌──────────────┐
//! │ raw args (JSON)│───────────────▶│ ValidatedArgs │─────────▶│ result (JSON)│
//! └────────────────┘                 └───────────────┘           └──────┬───────┘
//!                                                                       │
//!                                                          ToolCallRecord (per run)
//! ```
//!
//! The registry also projects its contents two ways: a prompt description
//! for JSON-only exchanges and native function declarations for transports
//! that support tool calling.

pub mod entities;
pub mod registry;
pub mod value_objects;

pub use entities::{ToolDefinition, ToolHandler};
pub use registry::{RegistryError, ToolRegistry, ValidatedArgs};
pub use value_objects::{ToolCallRecord, ToolError, ToolExecutionContext};
