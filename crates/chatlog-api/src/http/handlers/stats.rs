//! Aggregation endpoints.
//!
//! GET /conversations/stats and GET /conversations/stats/{userIdentifier}.

use axum::extract::{Path, State};

use chatlog_types::stats::ConversationStats;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /conversations/stats - Totals across all users.
pub async fn global_stats(
    State(state): State<AppState>,
) -> Result<ApiResponse<ConversationStats>, AppError> {
    stats_for(&state, None).await
}

/// GET /conversations/stats/{userIdentifier} - Totals for one user.
pub async fn user_stats(
    State(state): State<AppState>,
    Path(user_identifier): Path<String>,
) -> Result<ApiResponse<ConversationStats>, AppError> {
    stats_for(&state, Some(&user_identifier)).await
}

async fn stats_for(
    state: &AppState,
    user_identifier: Option<&str>,
) -> Result<ApiResponse<ConversationStats>, AppError> {
    let stats = state
        .conversation_service
        .stats(user_identifier)
        .await
        .map_err(|e| AppError::from_conversation(e, state.config.debug_errors))?;

    Ok(ApiResponse::success(stats))
}
