//! Model gateway port
//!
//! Defines the abstract model-call capability the strategies drive.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use toolbench_domain::{ModelRequest, ModelResult};

/// Errors that can occur during a model call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The provider rejected or failed the request.
    #[error("Request failed: {message}")]
    RequestFailed {
        message: String,
        /// HTTP status, when the transport has one
        status: Option<u16>,
        /// Provider-supplied retry hint
        retry_after: Option<Duration>,
    },

    /// The transport gave up waiting. Never retried as transient.
    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    pub fn request_failed(message: impl Into<String>) -> Self {
        GatewayError::RequestFailed {
            message: message.into(),
            status: None,
            retry_after: None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GatewayError::RequestFailed { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Gateway for model calls
///
/// This port defines how the application layer talks to a text-generation
/// model. Implementations (adapters) live in the infrastructure layer.
///
/// `ModelResult::raw` must be the provider content exactly as received, so it
/// can be replayed as a [`Turn::Model`](toolbench_domain::Turn::Model) on the
/// next request.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn generate_content(&self, request: &ModelRequest) -> Result<ModelResult, GatewayError>;
}

#[async_trait]
impl<G: ModelGateway + ?Sized> ModelGateway for Arc<G> {
    async fn generate_content(&self, request: &ModelRequest) -> Result<ModelResult, GatewayError> {
        (**self).generate_content(request).await
    }
}
