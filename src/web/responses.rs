//! HTTP response types and utilities
//!
//! Every error leaves the service as a `{"message": ...}` body. Client
//! mistakes carry their real message; server-side failures are logged and
//! reported with a fixed text so internal details never reach the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::errors::AppError;
use crate::models::MessageResponse;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { resource, .. } => {
                (StatusCode::NOT_FOUND, format!("{} not found", resource))
            }
            AppError::PayloadTooLarge { message } => {
                (StatusCode::PAYLOAD_TOO_LARGE, message.clone())
            }
            AppError::Repository(_) | AppError::Io(_) | AppError::Configuration { .. } => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

/// `200 OK` with a `{"message": ...}` body
pub fn message<S: Into<String>>(text: S) -> impl IntoResponse {
    (StatusCode::OK, Json(MessageResponse::new(text)))
}

/// `400 Bad Request` with a `{"message": ...}` body
pub fn bad_request(text: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(MessageResponse::new(text))).into_response()
}
