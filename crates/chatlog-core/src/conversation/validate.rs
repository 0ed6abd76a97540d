//! Validation of conversation writes and list/history query parameters.
//!
//! Both validators collect every violated rule into one
//! [`ConversationError::Validation`] so the caller sees the full list at once.

use chatlog_types::conversation::MediaType;
use chatlog_types::error::ConversationError;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use super::normalize::NormalizedConversation;
use super::time::{DayBound, from_epoch_millis, parse_instant};
use crate::repository::SortOrder;

/// A write that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidConversation {
    pub user_identifier: String,
    pub media_type: MediaType,
    pub user_message: String,
    pub assistant_message: String,
    /// `None` means "use the current time".
    pub timestamp: Option<DateTime<FixedOffset>>,
}

/// Raw list/history query parameters, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub media_type: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

/// Query parameters that passed validation. Pagination is resolved separately
/// by the query builder, which coerces instead of rejecting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub since: Option<DateTime<FixedOffset>>,
    pub until: Option<DateTime<FixedOffset>>,
    pub media_type: Option<MediaType>,
    pub sort_order: SortOrder,
}

/// Check a normalized write.
///
/// Required: non-blank user identifier and a canonical media type. An
/// optional timestamp must be a parseable date, datetime, or epoch-millis number.
pub fn validate_write(
    conversation: &NormalizedConversation,
    offset: FixedOffset,
) -> Result<ValidConversation, ConversationError> {
    let mut errors = Vec::new();

    if conversation.user_identifier.trim().is_empty() {
        errors.push("userIdentifier is required".to_string());
    }

    let media_type = if conversation.media_type.trim().is_empty() {
        errors.push("mediaType is required".to_string());
        None
    } else {
        match conversation.media_type.parse::<MediaType>() {
            Ok(media_type) => Some(media_type),
            Err(_) => {
                errors.push(format!(
                    "mediaType must be one of: {}",
                    MediaType::allowed_list()
                ));
                None
            }
        }
    };

    let timestamp = match &conversation.timestamp {
        None => None,
        Some(value) => {
            let parsed = match value {
                Value::String(s) => parse_instant(s, offset, DayBound::Start),
                Value::Number(n) => n.as_i64().and_then(|ms| from_epoch_millis(ms, offset)),
                _ => None,
            };
            if parsed.is_none() {
                errors.push("timestamp must be a valid date".to_string());
            }
            parsed
        }
    };

    match media_type {
        Some(media_type) if errors.is_empty() => Ok(ValidConversation {
            user_identifier: conversation.user_identifier.trim().to_string(),
            media_type,
            user_message: conversation.user_message.clone(),
            assistant_message: conversation.assistant_message.clone(),
            timestamp,
        }),
        _ => Err(ConversationError::Validation(errors)),
    }
}

/// Check list/history query parameters.
///
/// Dates must parse; `mediaType` must be a canonical tag (synonyms are a
/// write-path convenience only); `sortOrder` must be `asc` or `desc`. Absent
/// or blank values fall back to "no filter" and descending order.
pub fn validate_query(
    params: &QueryParams,
    offset: FixedOffset,
) -> Result<ValidatedQuery, ConversationError> {
    let mut errors = Vec::new();

    let since = parse_bound(
        params.start_date.as_deref(),
        offset,
        DayBound::Start,
        "startDate",
        &mut errors,
    );
    let until = parse_bound(
        params.end_date.as_deref(),
        offset,
        DayBound::End,
        "endDate",
        &mut errors,
    );

    if let (Some(since), Some(until)) = (since, until) {
        if since > until {
            errors.push("startDate must not be after endDate".to_string());
        }
    }

    let media_type = match present(params.media_type.as_deref()) {
        None => None,
        Some(raw) => match raw.parse::<MediaType>() {
            Ok(media_type) => Some(media_type),
            Err(_) => {
                errors.push(format!(
                    "mediaType must be one of: {}",
                    MediaType::allowed_list()
                ));
                None
            }
        },
    };

    let sort_order = match present(params.sort_order.as_deref()) {
        None => SortOrder::default(),
        Some(raw) => raw.parse::<SortOrder>().unwrap_or_else(|_| {
            errors.push("sortOrder must be \"asc\" or \"desc\"".to_string());
            SortOrder::default()
        }),
    };

    if !errors.is_empty() {
        return Err(ConversationError::Validation(errors));
    }

    Ok(ValidatedQuery {
        since,
        until,
        media_type,
        sort_order,
    })
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bound(
    raw: Option<&str>,
    offset: FixedOffset,
    bound: DayBound,
    field: &str,
    errors: &mut Vec<String>,
) -> Option<DateTime<FixedOffset>> {
    let raw = present(raw)?;
    let parsed = parse_instant(raw, offset, bound);
    if parsed.is_none() {
        errors.push(format!("{field} must be a valid date"));
    }
    parsed
}
