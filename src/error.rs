use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Duplicate(String),
    Unauthorized(String),
    TooManyRequests(String),
    Persistence(std::io::Error),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            AppError::Duplicate(msg) => write!(f, "duplicate submission: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "unauthorized: {msg}"),
            AppError::TooManyRequests(msg) => write!(f, "too many requests: {msg}"),
            AppError::Persistence(e) => write!(f, "ledger error: {e}"),
            AppError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => {
                tracing::warn!(error_type = "bad_request", message = %msg, "Responding with 400");
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Duplicate(msg) => {
                tracing::warn!(error_type = "duplicate", message = %msg, "Responding with 403");
                (StatusCode::FORBIDDEN, msg)
            }
            AppError::Unauthorized(msg) => {
                tracing::warn!(error_type = "unauthorized", message = %msg, "Responding with 401");
                (StatusCode::UNAUTHORIZED, msg)
            }
            AppError::TooManyRequests(msg) => {
                tracing::warn!(error_type = "too_many_requests", message = %msg, "Responding with 429");
                (StatusCode::TOO_MANY_REQUESTS, msg)
            }
            AppError::Persistence(e) => {
                tracing::error!(error_type = "persistence", error = %e, "Responding with 500");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error_type = "internal", message = %msg, "Responding with 500");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Persistence(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Persistence(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
