//! HTTP mapping for `domains::AppError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domains::AppError;
use serde_json::json;
use thiserror::Error;

/// Wraps the domain error so this crate can give it an HTTP shape without
/// the domain crate knowing about status codes.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::PolicyViolation(_) | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_, _) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // The category prefixes in the Display impl are for logs; the
        // client renders these strings directly, so the body carries the
        // bare message. Internal details never reach the wire at all.
        let message = match self.0 {
            AppError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                "internal server error".to_string()
            }
            AppError::NotFound(kind, key) => format!("{kind} not found with ID {key}"),
            AppError::ValidationError(message)
            | AppError::PolicyViolation(message)
            | AppError::Unauthorized(message)
            | AppError::Forbidden(message)
            | AppError::Conflict(message) => message,
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
