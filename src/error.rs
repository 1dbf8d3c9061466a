//! Error types for the portfolio backend
//!
//! One taxonomy shared by the repositories, the reconciliation engine and
//! the HTTP handlers. Every variant maps to a status code and the uniform
//! `{success, message, ...}` response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Common result type for portfolio-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// A single failed field check, reported in the 400 envelope
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// One or more request fields failed validation (400)
    #[error("Validation error")]
    Validation(Vec<FieldError>),

    /// Malformed request outside the per-field checks, e.g. a rejected
    /// upload or a broken multipart payload (400)
    #[error("{0}")]
    InvalidInput(String),

    /// Referenced row does not exist (404)
    #[error("{0}")]
    NotFound(String),

    /// Database operation error (wraps sqlx::Error, 500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// File write/delete error on the upload storage (wraps std::io::Error, 500)
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Anything else that should never reach the client verbatim (500)
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "message": "Validation error",
                    "errors": errors,
                })),
            )
                .into_response(),
            Error::InvalidInput(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": message })),
            )
                .into_response(),
            Error::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "message": message })),
            )
                .into_response(),
            Error::Database(err) => {
                error!("database failure: {err}");
                internal_error()
            }
            Error::Storage(err) => {
                error!("storage failure: {err}");
                internal_error()
            }
            Error::Internal(message) => {
                error!("internal failure: {message}");
                internal_error()
            }
        }
    }
}

/// Generic 500 body; the underlying detail stays in the log
fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": "Internal Server Error" })),
    )
        .into_response()
}
