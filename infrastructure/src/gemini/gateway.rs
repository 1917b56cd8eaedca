//! Gemini model gateway over HTTP

use super::protocol::{GenerateContentRequest, GenerateContentResponse, error_from_response};
use crate::config::FileGatewayConfig;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use std::time::Duration;
use toolbench_application::{GatewayError, ModelGateway};
use toolbench_domain::{ModelRequest, ModelResult};
use tracing::{debug, info, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Model gateway for the Gemini `generateContent` REST API
pub struct GeminiGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiGateway {
    /// Create a gateway with a per-request timeout
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to build HTTP client: {}", e)))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        info!(base_url = %base_url, ?timeout, "GeminiGateway initialized");

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Create a gateway from the `[gateway]` config section and a resolved key
    pub fn from_config(
        config: &FileGatewayConfig,
        api_key: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        Self::new(config.base_url.clone(), api_key, config.timeout())
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

fn transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::RequestFailed {
            message: error.to_string(),
            status: error.status().map(|s| s.as_u16()),
            retry_after: None,
        }
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate_content(&self, request: &ModelRequest) -> Result<ModelResult, GatewayError> {
        let url = self.endpoint(&request.model);
        let body = GenerateContentRequest::from_request(request);
        debug!(
            model = %request.model,
            turns = request.turns.len(),
            functions = request.functions.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let text = response.text().await.map_err(transport_error)?;
            warn!(model = %request.model, status = status.as_u16(), "Model request failed");
            return Err(error_from_response(
                status.as_u16(),
                retry_after.as_deref(),
                &text,
            ));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::InvalidResponse(e.to_string())
                }
            })?;
        parsed.into_result()
    }
}
