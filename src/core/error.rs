//! Error types and handling for the LLM proxy server.
//!
//! This module provides a unified error type [`ProxyError`] covering the full
//! failure taxonomy of both forwarding modes, with HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const ERROR_TYPE_API: &str = "api_error";
pub const ERROR_TYPE_TIMEOUT: &str = "timeout_error";
pub const ERROR_TYPE_INVALID_REQUEST: &str = "invalid_request_error";

/// Main error type for the application.
///
/// Every failure a request can hit maps to exactly one variant; there are no
/// retries, so the first error surfaces directly to the caller.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Request body decoded but `messages` is empty
    #[error("messages must not be empty")]
    EmptyMessages,

    /// Upstream returned a non-success status; the body is propagated verbatim
    #[error("OpenAI API error: {body}")]
    Upstream { status: u16, body: String },

    /// Transport-level failure reaching upstream (connect, DNS, timeout)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Assistant run reported a terminal failure status
    #[error("Assistant run ended with status '{status}'")]
    RunFailed { status: String },

    /// Assistant run polling exhausted its attempt budget
    #[error("Assistant run did not complete in time.")]
    RunTimeout,

    /// Run completed but the thread holds no assistant-authored message
    #[error("No assistant response found.")]
    MissingAssistantResponse,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ProxyError::EmptyMessages => (
                StatusCode::BAD_REQUEST,
                ERROR_TYPE_INVALID_REQUEST,
                self.to_string(),
            ),
            ProxyError::Upstream { status, body } => (
                // reqwest and axum ship different `http` major versions, so
                // the status crosses the boundary as a bare u16
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                ERROR_TYPE_API,
                format!("OpenAI API error: {}", body),
            ),
            ProxyError::Transport(ref e) => {
                tracing::error!(error = %e, "Transport failure reaching upstream");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ERROR_TYPE_API,
                    self.to_string(),
                )
            }
            ProxyError::RunFailed { .. } => {
                (StatusCode::BAD_GATEWAY, ERROR_TYPE_API, self.to_string())
            }
            ProxyError::RunTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                ERROR_TYPE_TIMEOUT,
                self.to_string(),
            ),
            ProxyError::MissingAssistantResponse => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ERROR_TYPE_API,
                self.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "type": error_type,
                "code": status.as_u16()
            }
        }));

        (status, body).into_response()
    }
}

/// Convenience type alias for Results using [`ProxyError`].
pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProxyError::EmptyMessages;
        assert_eq!(err.to_string(), "messages must not be empty");

        let err = ProxyError::RunTimeout;
        assert_eq!(err.to_string(), "Assistant run did not complete in time.");

        let err = ProxyError::MissingAssistantResponse;
        assert_eq!(err.to_string(), "No assistant response found.");
    }

    #[test]
    fn test_empty_messages_response() {
        let response = ProxyError::EmptyMessages.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_error_mirrors_status() {
        let err = ProxyError::Upstream {
            status: 401,
            body: r#"{"error": "Invalid API key"}"#.to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_upstream_error_with_bogus_status_falls_back() {
        let err = ProxyError::Upstream {
            status: 99,
            body: "weird".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_run_timeout_response() {
        let response = ProxyError::RunTimeout.into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_run_failed_response() {
        let err = ProxyError::RunFailed {
            status: "cancelled".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Assistant run ended with status 'cancelled'"
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_missing_assistant_response() {
        let response = ProxyError::MissingAssistantResponse.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_body_envelope() {
        let err = ProxyError::Upstream {
            status: 503,
            body: "Service temporarily unavailable".to_string(),
        };
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["error"]["type"], ERROR_TYPE_API);
        assert_eq!(json["error"]["code"], 503);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Service temporarily unavailable"));
    }
}
