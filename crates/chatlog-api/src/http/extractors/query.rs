//! Query parameter extractors for list endpoints.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use chatlog_core::conversation::validate::QueryParams;
use serde::Deserialize;

use crate::http::error::AppError;

/// Query parameters for the list and history endpoints.
///
/// Everything is taken as a raw string; the core validator decides what is
/// acceptable so that bad values produce itemized messages instead of an
/// extractor rejection.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConversationListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Canonical media type tag.
    #[serde(alias = "tipo_medio")]
    pub media_type: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

impl From<ConversationListQuery> for QueryParams {
    fn from(q: ConversationListQuery) -> Self {
        QueryParams {
            start_date: q.start_date,
            end_date: q.end_date,
            media_type: q.media_type,
            sort_order: q.sort_order,
            limit: q.limit,
            page: q.page,
        }
    }
}

/// Extracts [`ConversationListQuery`]; a query string that fails to
/// deserialize becomes a 400 validation envelope.
pub struct ListQuery(pub ConversationListQuery);

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<ConversationListQuery>::from_request_parts(parts, state).await {
            Ok(Query(query)) => Ok(ListQuery(query)),
            Err(rejection) => Err(AppError::Validation(vec![rejection.body_text()])),
        }
    }
}
