//! API error types with structured JSON responses.
//!
//! Every failure path produces a logged diagnostic and a client-visible body
//! with the stable shape `{error, details?}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::store::StoreError;
use crate::upstream::UpstreamError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No image provided")]
    MissingInput,
    #[error("Payload is not an image")]
    InvalidType,
    #[error("Image exceeds the size limit")]
    PayloadTooLarge,
    #[error("Upstream quota exceeded: {0}")]
    UpstreamQuota(String),
    #[error("Upstream credential error: {0}")]
    UpstreamCredential(String),
    #[error("Upstream model unavailable: {0}")]
    UpstreamModelUnavailable(String),
    #[error("Upstream failure: {0}")]
    Upstream(String),
    #[error("Chat failure: {0}")]
    ChatFailure(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::MissingInput => (
                StatusCode::BAD_REQUEST,
                "No image provided".to_string(),
                None,
            ),
            ApiError::InvalidType => (
                StatusCode::BAD_REQUEST,
                "Invalid file type. Please upload an image.".to_string(),
                None,
            ),
            ApiError::PayloadTooLarge => (
                StatusCode::BAD_REQUEST,
                "Image size too large. Maximum size is 20MB.".to_string(),
                None,
            ),
            ApiError::UpstreamQuota(detail) => {
                tracing::error!(detail, "Upstream quota failure");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "API quota exceeded or billing issue. Please check the account.".to_string(),
                    None,
                )
            }
            ApiError::UpstreamCredential(detail) => {
                tracing::error!(detail, "Upstream rejected credentials");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Invalid API key configuration.".to_string(),
                    None,
                )
            }
            ApiError::UpstreamModelUnavailable(detail) => {
                tracing::error!(detail, "Requested model unavailable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The specified model is not available. Please check the account's model access."
                        .to_string(),
                    None,
                )
            }
            ApiError::Upstream(detail) => {
                tracing::error!(detail, "Image analysis failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to analyze image".to_string(),
                    Some(detail),
                )
            }
            ApiError::ChatFailure(detail) => {
                tracing::error!(detail, "Chat request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process chat message".to_string(),
                    None,
                )
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::QuotaExceeded(detail) => ApiError::UpstreamQuota(detail),
            UpstreamError::CredentialRejected(detail) => ApiError::UpstreamCredential(detail),
            UpstreamError::ModelUnavailable(detail) => ApiError::UpstreamModelUnavailable(detail),
            UpstreamError::NoContent => {
                ApiError::Upstream("No analysis received from the model".into())
            }
            UpstreamError::Generic(detail) => ApiError::Upstream(detail),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
