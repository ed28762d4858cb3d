//! Shared HTTP plumbing for the provider clients.

use std::time::Duration;

use crate::AiError;

/// Longest error-body excerpt carried into an `AiError`.
const ERROR_EXCERPT_CHARS: usize = 200;

/// Build the HTTP client. Only the connect phase is bounded unless a
/// request timeout is configured.
pub(crate) fn build_http(request_timeout: Option<Duration>) -> Result<reqwest::Client, AiError> {
    let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(10));
    if let Some(timeout) = request_timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| AiError::NotConfigured(format!("failed to build HTTP client: {e}")))
}

/// Map a non-success status and its body to an error.
pub(crate) fn error_for_status(status: reqwest::StatusCode, body: &str) -> AiError {
    let excerpt: String = body.chars().take(ERROR_EXCERPT_CHARS).collect();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return AiError::RateLimited(excerpt);
    }
    AiError::Api(format!("HTTP {status}: {excerpt}"))
}

/// The error body, or why it could not be read.
fn body_or_reason<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}

/// Send a prepared request and decode the JSON body of a 2xx response.
pub(crate) async fn send_json(request: reqwest::RequestBuilder) -> Result<serde_json::Value, AiError> {
    let response = request
        .send()
        .await
        .map_err(|e| AiError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let text = body_or_reason(response.text().await);
        return Err(error_for_status(status, &text));
    }

    response
        .json()
        .await
        .map_err(|e| AiError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_requests_maps_to_rate_limited() {
        let err = error_for_status(reqwest::StatusCode::TOO_MANY_REQUESTS, "quota exceeded");
        assert!(matches!(err, AiError::RateLimited(ref m) if m == "quota exceeded"));
    }

    #[test]
    fn other_status_carries_code_and_excerpt() {
        let body = "x".repeat(500);
        let err = error_for_status(reqwest::StatusCode::UNAUTHORIZED, &body);
        let msg = err.to_string();
        assert!(msg.starts_with("API error: HTTP 401 Unauthorized: "));
        assert_eq!(msg.matches('x').count(), ERROR_EXCERPT_CHARS);
    }

    #[test]
    fn unreadable_error_body_is_reported() {
        let text = body_or_reason::<&str>(Err("connection reset"));
        let err = error_for_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &text);
        assert_eq!(
            err.to_string(),
            "API error: HTTP 500 Internal Server Error: <unreadable body: connection reset>"
        );
        assert_eq!(body_or_reason::<&str>(Ok("oops".into())), "oops");
    }

    #[test]
    fn http_client_builds_without_timeout() {
        assert!(build_http(None).is_ok());
        assert!(build_http(Some(Duration::from_secs(5))).is_ok());
    }
}
