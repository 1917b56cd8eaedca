//! Port definitions (interfaces for external dependencies)

pub mod model_gateway;
pub mod progress;
