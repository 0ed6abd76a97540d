//! Conversation create/list/history handlers for the REST API.

use axum::extract::{Path, State};
use axum::http::StatusCode;

use chatlog_types::conversation::{ConversationRecord, CreateConversationRequest};

use crate::http::error::AppError;
use crate::http::extractors::json::JsonBody;
use crate::http::extractors::query::ListQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /conversations - Log one conversation turn.
pub async fn create_conversation(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateConversationRequest>,
) -> Result<ApiResponse<ConversationRecord>, AppError> {
    let record = state
        .conversation_service
        .create(body)
        .await
        .map_err(|e| AppError::from_conversation(e, state.config.debug_errors))?;

    Ok(ApiResponse::success(record)
        .with_message("Conversation saved")
        .with_status(StatusCode::CREATED))
}

/// GET /conversations - List conversations with filtering, sorting, and pagination.
pub async fn list_conversations(
    State(state): State<AppState>,
    ListQuery(query): ListQuery,
) -> Result<ApiResponse<Vec<ConversationRecord>>, AppError> {
    let page = state
        .conversation_service
        .list(&query.into())
        .await
        .map_err(|e| AppError::from_conversation(e, state.config.debug_errors))?;

    Ok(ApiResponse::success(page.items).with_pagination(page.pagination))
}

/// GET /conversations/user/{userIdentifier} - One user's history.
pub async fn user_history(
    State(state): State<AppState>,
    Path(user_identifier): Path<String>,
    ListQuery(query): ListQuery,
) -> Result<ApiResponse<Vec<ConversationRecord>>, AppError> {
    let page = state
        .conversation_service
        .history(&user_identifier, &query.into())
        .await
        .map_err(|e| AppError::from_conversation(e, state.config.debug_errors))?;

    Ok(ApiResponse::success(page.items).with_pagination(page.pagination))
}
