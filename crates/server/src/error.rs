// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use mentor_chat_core::GenerationError;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes.
///
/// The generation variant carries the resolved model name for
/// diagnostics; raw provider detail stays in the logs and never reaches
/// the response body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("message cannot be empty")]
    EmptyMessage,

    #[error("generation with model {model} failed: {source}")]
    Generation {
        model: String,
        #[source]
        source: GenerationError,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::EmptyMessage => {
                tracing::warn!("Rejected chat request with empty message");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Message cannot be empty"),
                )
            }
            ApiError::Generation { model, source } => match source {
                GenerationError::Blocked { stage, reason } => {
                    tracing::warn!(model = %model, stage = %stage, reason = %reason, "Generation blocked by safety policy");
                    (
                        StatusCode::BAD_REQUEST,
                        ErrorResponse::with_details(
                            "Request blocked by the AI provider's safety policy",
                            format!("model: {}", model),
                        ),
                    )
                }
                GenerationError::Empty { detail } => {
                    tracing::error!(model = %model, detail = %detail, "Generation produced no usable text");
                    (
                        StatusCode::BAD_GATEWAY,
                        ErrorResponse::with_details(
                            "AI provider returned no usable response",
                            format!("model: {}", model),
                        ),
                    )
                }
                GenerationError::Transport { detail } => {
                    tracing::error!(model = %model, detail = %detail, "Failed to reach the AI provider");
                    (
                        StatusCode::BAD_GATEWAY,
                        ErrorResponse::with_details(
                            "Failed to get a response from the AI provider",
                            format!("model: {}", model),
                        ),
                    )
                }
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use mentor_chat_core::llm::BlockStage;

    /// Helper to extract status code and body from a response
    async fn extract_response(response: Response) -> (StatusCode, ErrorResponse) {
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        (status, error_response)
    }

    #[tokio::test]
    async fn test_empty_message_returns_400() {
        let response = ApiError::EmptyMessage.into_response();
        let (status, body) = extract_response(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Message cannot be empty");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_blocked_prompt_returns_400_with_model() {
        let error = ApiError::Generation {
            model: "gemini-2.0-flash".to_string(),
            source: GenerationError::Blocked {
                stage: BlockStage::Prompt,
                reason: "SAFETY".to_string(),
            },
        };
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Request blocked by the AI provider's safety policy");
        assert_eq!(body.details.as_deref(), Some("model: gemini-2.0-flash"));
    }

    #[tokio::test]
    async fn test_blocked_completion_returns_400() {
        let error = ApiError::Generation {
            model: "gemini-2.0-flash".to_string(),
            source: GenerationError::Blocked {
                stage: BlockStage::Completion,
                reason: "SAFETY".to_string(),
            },
        };
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        // The raw provider reason is not echoed to the client.
        assert!(!body.details.unwrap_or_default().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_empty_generation_returns_502() {
        let error = ApiError::Generation {
            model: "gemini-2.0-flash".to_string(),
            source: GenerationError::empty("no candidates"),
        };
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.error, "AI provider returned no usable response");
        assert_eq!(body.details.as_deref(), Some("model: gemini-2.0-flash"));
    }

    #[tokio::test]
    async fn test_transport_failure_returns_502_without_detail() {
        let error = ApiError::Generation {
            model: "gemini-2.0-flash".to_string(),
            source: GenerationError::transport("connection refused to 10.0.0.5:443"),
        };
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.error, "Failed to get a response from the AI provider");
        // Transport detail (addresses, auth hints) must never leak.
        assert!(!body.details.unwrap_or_default().contains("10.0.0.5"));
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new("Test error");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"error\":\"Test error\""));
        assert!(!json.contains("details")); // None should be skipped

        let response = ErrorResponse::with_details("Test error", "More info");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"details\":\"More info\""));
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::EmptyMessage;
        assert_eq!(err.to_string(), "message cannot be empty");

        let err = ApiError::Generation {
            model: "gemini-2.0-flash".to_string(),
            source: GenerationError::empty("no candidates"),
        };
        assert!(err.to_string().contains("gemini-2.0-flash"));
    }
}
