//! Gemini adapter
//!
//! Implements ModelGateway for the Gemini `generateContent` REST API.

pub mod gateway;
pub mod protocol;

pub use gateway::GeminiGateway;
