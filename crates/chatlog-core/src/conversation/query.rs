//! Construction of the [`QuerySpec`] consumed by the repository.
//!
//! Pagination policy: `page` and `limit` are coerced, never rejected.
//! Anything that is not a positive integer falls back to the default, and
//! `limit` is clamped to the configured maximum.

use chrono::Utc;

use super::validate::{QueryParams, ValidatedQuery};
use crate::repository::conversation::{ConversationFilter, QuerySpec};

/// First page number.
pub const DEFAULT_PAGE: u32 = 1;

/// Builds query specs with the configured page-size limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryBuilder {
    default_limit: u32,
    max_limit: u32,
}

impl QueryBuilder {
    /// `default_limit` must be between 1 and `max_limit`; out-of-range values
    /// are clamped into that range.
    pub fn new(default_limit: u32, max_limit: u32) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    /// Build the `QuerySpec` for a list (`user_identifier = None`) or history query.
    pub fn build(
        &self,
        query: &ValidatedQuery,
        params: &QueryParams,
        user_identifier: Option<&str>,
    ) -> QuerySpec {
        let filter = ConversationFilter {
            user_identifier: user_identifier.map(|u| u.trim().to_string()),
            since: query.since.map(|dt| dt.with_timezone(&Utc)),
            until: query.until.map(|dt| dt.with_timezone(&Utc)),
            media_type: query.media_type,
        };

        let page = coerce_positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let limit = coerce_positive(params.limit.as_deref())
            .unwrap_or(self.default_limit)
            .min(self.max_limit);

        QuerySpec {
            filter,
            sort_order: query.sort_order,
            page,
            limit,
        }
    }

    /// Filter for a stats query: all records, or one user's.
    pub fn stats_filter(&self, user_identifier: Option<&str>) -> ConversationFilter {
        ConversationFilter {
            user_identifier: user_identifier.map(|u| u.trim().to_string()),
            ..Default::default()
        }
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(100, 1000)
    }
}

/// Parse a strictly positive integer. `None` for absent, blank, zero,
/// negative, fractional, or non-numeric input.
fn coerce_positive(raw: Option<&str>) -> Option<u32> {
    raw?.trim().parse::<u32>().ok().filter(|n| *n > 0)
}
