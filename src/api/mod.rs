//! HTTP API handlers
//!
//! Handlers shape the uniform `{success, message?, count?, data?}` envelope;
//! failures render through `Error`'s `IntoResponse` with the same shape.

use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

pub mod contacts;
pub mod health;
pub mod projects;

/// Success envelope returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
        }
    }

    pub fn message_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            data: Some(data),
        }
    }

    /// List envelope carrying the item count alongside the data
    pub fn list(items: Vec<T>) -> ApiResponse<Vec<T>> {
        ApiResponse {
            success: true,
            message: None,
            count: Some(items.len()),
            data: Some(items),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            data: None,
        }
    }
}

/// GET /
///
/// Service banner with the endpoint map.
pub async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "apiEndpoints": {
            "contacts": "/api/contacts",
            "projects": "/api/projects",
        }
    }))
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": format!("Not Found - {uri}"),
        })),
    )
        .into_response()
}
