//! Intent Protocol
//!
//! Two JSON-only exchanges shared by the strategies:
//!
//! - **Selection**: "pick a tool or respond". The model returns either
//!   `{"action": "call_tool", "toolName", "args"}` or
//!   `{"action": "respond", "response"}`.
//! - **Finalization**: "turn this tool result into an answer". The model
//!   returns `{"action": "respond", "response"}`.
//!
//! Both exchanges are sent with a response schema, so the transport is the
//! first line of defense. [`parse_selection`] and [`parse_finalization`] run
//! the text through the JSON recovery pipeline as the second.

pub mod protocol;
pub mod template;

pub use protocol::{
    IntentError, ToolIntent, finalization_schema, parse_finalization, parse_selection,
    selection_schema,
};
pub use template::IntentPrompt;
