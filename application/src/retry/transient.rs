//! Transient failure classification and retry hints.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::ports::model_gateway::GatewayError;

static TRANSIENT_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b429\b|rate[\s_-]?limit|resource[\s_]?exhausted|quota|too many requests|\b503\b|unavailable|overloaded",
    )
    .expect("Failed to compile transient marker regex")
});

static RETRY_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)retry (?:in|after) (\d+(?:\.\d+)?)\s*([a-z]+)?")
        .expect("Failed to compile retry-in regex")
});

static RETRY_DELAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""?retryDelay"?\s*:\s*"(\d+(?:\.\d+)?)s""#)
        .expect("Failed to compile retryDelay regex")
});

/// Whether a failure is temporary and worth a backoff retry.
///
/// Timeouts are never transient. Otherwise a 429/503 status or any
/// rate-limit / service-unavailable marker in the error text qualifies.
pub fn is_transient(error: &GatewayError) -> bool {
    match error {
        GatewayError::Timeout => false,
        GatewayError::RequestFailed {
            status: Some(429 | 503),
            ..
        } => true,
        other => TRANSIENT_MARKERS.is_match(&other.to_string()),
    }
}

/// Provider-supplied delay: the structured hint first, then the error text.
pub fn retry_hint(error: &GatewayError) -> Option<Duration> {
    error
        .retry_after()
        .or_else(|| parse_retry_hint(&error.to_string()))
}

/// Parse `retry in 12.5s`, `retry after 300ms`, `retry in 2 minutes` or
/// `"retryDelay": "7s"`.
///
/// A bare number is seconds; an unrecognised unit yields no hint.
pub fn parse_retry_hint(text: &str) -> Option<Duration> {
    if let Some(caps) = RETRY_DELAY.captures(text) {
        return scaled(&caps[1], 1.0);
    }
    let caps = RETRY_IN.captures(text)?;
    let unit = caps.get(2).map(|m| m.as_str().to_lowercase());
    let scale = match unit.as_deref() {
        None | Some("s" | "sec" | "secs" | "second" | "seconds") => 1.0,
        Some("ms" | "msec" | "millisecond" | "milliseconds") => 0.001,
        Some("m" | "min" | "mins" | "minute" | "minutes") => 60.0,
        Some(_) => return None,
    };
    scaled(&caps[1], scale)
}

fn scaled(amount: &str, scale: f64) -> Option<Duration> {
    amount
        .parse::<f64>()
        .ok()
        .and_then(|value| Duration::try_from_secs_f64(value * scale).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(message: &str) -> GatewayError {
        GatewayError::request_failed(message)
    }

    #[test]
    fn test_transient_by_status() {
        let err = GatewayError::RequestFailed {
            message: "whatever".to_string(),
            status: Some(503),
            retry_after: None,
        };
        assert!(is_transient(&err));
    }

    #[test]
    fn test_transient_by_text() {
        for message in [
            "HTTP 429",
            "Rate limit reached",
            "RESOURCE_EXHAUSTED",
            "resource exhausted",
            "You exceeded your current quota",
            "Too Many Requests",
            "503 Service Unavailable",
            "The model is overloaded",
        ] {
            assert!(is_transient(&failed(message)), "{message} should be transient");
        }
    }

    #[test]
    fn test_not_transient() {
        assert!(!is_transient(&failed("400 Bad Request: invalid argument")));
        assert!(!is_transient(&GatewayError::Timeout));
        assert!(!is_transient(&GatewayError::InvalidResponse("no candidates".to_string())));
        assert!(!is_transient(&failed("request id 14290")));
    }

    #[test]
    fn test_parse_retry_hint() {
        assert_eq!(parse_retry_hint("Please retry in 12.5s."), Some(Duration::from_millis(12_500)));
        assert_eq!(parse_retry_hint("retry after 300ms"), Some(Duration::from_millis(300)));
        assert_eq!(parse_retry_hint("retry after 2 seconds"), Some(Duration::from_secs(2)));
        assert_eq!(
            parse_retry_hint(r#"{"@type": "RetryInfo", "retryDelay": "7s"}"#),
            Some(Duration::from_secs(7))
        );
        assert_eq!(parse_retry_hint("no hint here"), None);
    }

    #[test]
    fn test_parse_retry_hint_units() {
        assert_eq!(parse_retry_hint("retry in 2 minutes"), Some(Duration::from_secs(120)));
        assert_eq!(parse_retry_hint("Retry after 1.5 min"), Some(Duration::from_secs(90)));
        assert_eq!(parse_retry_hint("retry in 5"), Some(Duration::from_secs(5)));
        assert_eq!(parse_retry_hint("retry in 3 hours"), None);
        assert_eq!(parse_retry_hint("retry in 99999999999999999999999 minutes"), None);
    }

    #[test]
    fn test_structured_hint_wins() {
        let err = GatewayError::RequestFailed {
            message: "retry in 9s".to_string(),
            status: Some(429),
            retry_after: Some(Duration::from_secs(2)),
        };
        assert_eq!(retry_hint(&err), Some(Duration::from_secs(2)));
        assert_eq!(retry_hint(&failed("retry in 9s")), Some(Duration::from_secs(9)));
    }
}
