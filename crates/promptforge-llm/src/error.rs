use thiserror::Error;

/// Failure taxonomy for a single round trip to the completion endpoint.
///
/// Every variant is terminal for the current call; the invoker never
/// retries. Retry and backoff policy, if any, belong to the caller.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider signaled throttling (HTTP 429). Retryable.
    #[error("rate limited by provider: {0}")]
    RateLimited(String),

    /// Provider-side fault unrelated to the caller's input (HTTP 5xx).
    #[error("provider error: {0}")]
    Provider(String),

    /// The transport could not reach the provider, or the round trip
    /// exceeded the configured timeout.
    #[error("connection failure: {0}")]
    Connection(String),

    /// Anything else: malformed payloads, unexpected status codes.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl LlmError {
    /// Classify a non-success HTTP status from the completion endpoint.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        let detail = if body.is_empty() {
            status.to_string()
        } else {
            format!("{}: {}", status, body)
        };

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            LlmError::RateLimited(detail)
        } else if status.is_server_error() {
            LlmError::Provider(detail)
        } else {
            LlmError::Unexpected(detail)
        }
    }

    /// Classify a transport-level reqwest failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            LlmError::Connection(err.to_string())
        } else {
            LlmError::Unexpected(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_429_is_rate_limited() {
        let err = LlmError::from_status(StatusCode::TOO_MANY_REQUESTS, "slow down".to_string());
        assert!(matches!(err, LlmError::RateLimited(_)));
    }

    #[test]
    fn test_status_5xx_is_provider() {
        let err = LlmError::from_status(StatusCode::INTERNAL_SERVER_ERROR, String::new());
        assert!(matches!(err, LlmError::Provider(_)));

        let err = LlmError::from_status(StatusCode::BAD_GATEWAY, String::new());
        assert!(matches!(err, LlmError::Provider(_)));
    }

    #[test]
    fn test_status_4xx_is_unexpected() {
        let err = LlmError::from_status(StatusCode::BAD_REQUEST, "bad payload".to_string());
        assert!(matches!(err, LlmError::Unexpected(_)));
    }

    #[test]
    fn test_status_detail_includes_body() {
        let err = LlmError::from_status(StatusCode::TOO_MANY_REQUESTS, "quota".to_string());
        assert!(err.to_string().contains("quota"));
    }
}
