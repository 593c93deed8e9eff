//! API error handling
//!
//! Every failure leaves the server as `{error, code[, details]}` JSON.
//! Pipeline and internal failures never carry details; the cause is logged
//! instead, since it may contain subprocess output and local paths.

use application::ApplicationError;
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// The form was rejected; the message is shown to the user as is
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("TTS generation failed: {0}")]
    SpeechSynthesis(String),

    #[error("Video generation failed: {0}")]
    VideoGeneration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            Self::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "not_found",
                "Video file not found".to_string(),
                None,
            ),
            Self::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                "Upload too large".to_string(),
                Some(msg),
            ),
            Self::SpeechSynthesis(msg) => {
                error!(error = %msg, "TTS generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "tts_failed",
                    "TTS generation failed".to_string(),
                    None,
                )
            },
            Self::VideoGeneration(msg) => {
                error!(error = %msg, "Video generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "video_failed",
                    "Video generation failed".to_string(),
                    None,
                )
            },
            Self::Internal(msg) => {
                error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                    None,
                )
            },
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) if e.is_validation() => Self::BadRequest(e.to_string()),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::SpeechSynthesis(msg) => Self::SpeechSynthesis(msg),
            ApplicationError::VideoGeneration(msg) => Self::VideoGeneration(msg),
            other @ (ApplicationError::Domain(_)
            | ApplicationError::Storage(_)
            | ApplicationError::Configuration(_)
            | ApplicationError::Internal(_)) => Self::Internal(other.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(err.body_text())
        } else {
            Self::BadRequest(format!("Malformed form data: {}", err.body_text()))
        }
    }
}
