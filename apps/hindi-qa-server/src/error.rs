//! Error types for the Hindi QA server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::ocr::OcrError;
use crate::qa::QaError;
use crate::upload::UploadError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Message returned alongside every 500 response
pub const PROCESSING_ERROR: &str = "An error occurred during processing.";

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Failed to read upload: {message}")]
    Multipart { status: StatusCode, message: String },

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Qa(#[from] QaError),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected upload: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone(), None)
            }
            AppError::Multipart { status, message } => {
                tracing::warn!("Failed to read multipart body: {}", message);
                (*status, "Failed to read upload".to_string(), Some(message.clone()))
            }
            AppError::Ocr(_) | AppError::Qa(_) => {
                tracing::error!("Error processing request: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    PROCESSING_ERROR.to_string(),
                    Some(self.to_string()),
                )
            }
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_model_error_exposes_message() {
        let response = AppError::Qa(QaError::Api("model exploded".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], PROCESSING_ERROR);
        assert_eq!(json["message"], "Model API error: model exploded");
    }

    #[tokio::test]
    async fn test_bad_request_has_no_message() {
        let response = AppError::BadRequest("No image provided".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "No image provided");
        assert!(json.get("message").is_none());
    }
}
