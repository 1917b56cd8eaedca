//! Transport-level transient retry decorator.

use async_trait::async_trait;
use std::time::Duration;
use toolbench_domain::{ModelRequest, ModelResult};
use tracing::warn;

use super::transient::{is_transient, retry_hint};
use crate::ports::model_gateway::{GatewayError, ModelGateway};

/// Bounds for transient retries of a single model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failed call (so at most `n + 1` calls).
    pub max_transient_retries: u32,
    /// Delay unit when the provider gives no hint; multiplied by the retry index.
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_transient_retries: 2,
            backoff_base: Duration::from_millis(1500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_transient_retries: u32, backoff_base: Duration) -> Self {
        Self {
            max_transient_retries,
            backoff_base,
        }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32, hint: Option<Duration>) -> Duration {
        hint.unwrap_or(self.backoff_base * retry)
    }
}

/// Wraps a gateway so transient failures of each call are retried with backoff.
///
/// Non-transient errors and the last transient error propagate unchanged.
pub struct RetryingGateway<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: ModelGateway> RetryingGateway<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: ModelGateway> ModelGateway for RetryingGateway<G> {
    async fn generate_content(&self, request: &ModelRequest) -> Result<ModelResult, GatewayError> {
        let mut retries = 0;
        loop {
            match self.inner.generate_content(request).await {
                Ok(result) => return Ok(result),
                Err(error) if retries < self.policy.max_transient_retries && is_transient(&error) => {
                    retries += 1;
                    let delay = self.policy.delay_for(retries, retry_hint(&error));
                    warn!(
                        model = %request.model,
                        retry = retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient model error, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedGateway, text};
    use tokio::time::Instant;

    fn rate_limited() -> Result<ModelResult, GatewayError> {
        Err(GatewayError::RequestFailed {
            message: "429 Too Many Requests".to_string(),
            status: Some(429),
            retry_after: None,
        })
    }

    #[test]
    fn test_delay_for() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1, None), Duration::from_millis(1500));
        assert_eq!(policy.delay_for(2, None), Duration::from_millis(3000));
        assert_eq!(policy.delay_for(2, Some(Duration::from_secs(7))), Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_then_succeeds() {
        let gateway = RetryingGateway::new(
            ScriptedGateway::new(vec![rate_limited(), rate_limited(), text("ok")]),
            RetryPolicy::default(),
        );
        let start = Instant::now();
        let result = gateway
            .generate_content(&ModelRequest::user("m", "p"))
            .await
            .unwrap();
        assert_eq!(result.text, "ok");
        assert_eq!(gateway.inner().call_count(), 3);
        // 1.5s + 3.0s of virtual time
        assert_eq!(start.elapsed(), Duration::from_millis(4500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_uses_provider_hint() {
        let hinted = Err(GatewayError::RequestFailed {
            message: "quota exceeded, retry in 5s".to_string(),
            status: None,
            retry_after: None,
        });
        let gateway = RetryingGateway::new(
            ScriptedGateway::new(vec![hinted, text("ok")]),
            RetryPolicy::default(),
        );
        let start = Instant::now();
        gateway
            .generate_content(&ModelRequest::user("m", "p"))
            .await
            .unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_transient_retries_propagate() {
        let gateway = RetryingGateway::new(
            ScriptedGateway::new(vec![rate_limited(), rate_limited(), rate_limited(), text("late")]),
            RetryPolicy::default(),
        );
        let err = gateway
            .generate_content(&ModelRequest::user("m", "p"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(429));
        assert_eq!(gateway.inner().call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_propagates_immediately() {
        let gateway = RetryingGateway::new(
            ScriptedGateway::new(vec![
                Err(GatewayError::request_failed("400 invalid argument")),
                text("never"),
            ]),
            RetryPolicy::default(),
        );
        let start = Instant::now();
        assert!(gateway.generate_content(&ModelRequest::user("m", "p")).await.is_err());
        assert_eq!(gateway.inner().call_count(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_not_retried() {
        let gateway = RetryingGateway::new(
            ScriptedGateway::new(vec![Err(GatewayError::Timeout), text("never")]),
            RetryPolicy::default(),
        );
        let err = gateway
            .generate_content(&ModelRequest::user("m", "p"))
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::Timeout);
        assert_eq!(gateway.inner().call_count(), 1);
    }
}
