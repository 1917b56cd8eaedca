//! Model-call value types.
//!
//! The abstract model-call capability takes a [`ModelRequest`] and returns a
//! [`ModelResult`]. Both sides are provider-neutral; adapters in the
//! infrastructure layer translate them to a concrete wire format.

pub mod request;
pub mod response;

pub use request::{
    FunctionCallingMode, FunctionDeclaration, FunctionResponse, GenerationOptions, ModelRequest,
    RawContent, Turn,
};
pub use response::{ModelFunctionCall, ModelResult};
