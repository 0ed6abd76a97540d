//! Liveness check.

use serde_json::{Value, json};

use crate::http::response::ApiResponse;

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
    .with_message("Chatlog API is running")
}

/// Fallback for unmatched routes.
pub async fn route_not_found() -> crate::http::error::AppError {
    crate::http::error::AppError::NotFound
}
