//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use chatlog_types::error::ConversationError;

use crate::http::response::ApiResponse;

const GENERIC_INTERNAL_MESSAGE: &str = "Internal server error";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Itemized input problems.
    Validation(Vec<String>),
    /// Store rejected a CHECK or NOT NULL rule.
    Constraint(String),
    /// Duplicate key.
    Conflict(String),
    /// No route matched.
    NotFound,
    /// Anything else. `expose` controls whether `detail` reaches the caller.
    Internal { detail: String, expose: bool },
}

impl AppError {
    /// Map a service error. Storage failures only show their detail when
    /// `debug_errors` is on.
    pub fn from_conversation(err: ConversationError, debug_errors: bool) -> Self {
        match err {
            ConversationError::Validation(errors) => AppError::Validation(errors),
            ConversationError::Constraint(msg) => AppError::Constraint(msg),
            ConversationError::Conflict(msg) => AppError::Conflict(msg),
            ConversationError::StorageError(msg) => AppError::Internal {
                detail: msg,
                expose: debug_errors,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, "Validation failed".to_string(), errors)
            }
            AppError::Constraint(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Constraint violation: {msg}"),
                Vec::new(),
            ),
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, format!("Conflict: {msg}"), Vec::new())
            }
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, "Route not found".to_string(), Vec::new())
            }
            AppError::Internal { detail, expose } => {
                tracing::error!(error = %detail, "request failed");
                let message = if expose {
                    detail
                } else {
                    GENERIC_INTERNAL_MESSAGE.to_string()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message, Vec::new())
            }
        };

        ApiResponse::error(status, message, errors).into_response()
    }
}
