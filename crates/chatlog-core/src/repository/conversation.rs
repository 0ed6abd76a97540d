//! Conversation repository trait definition.
//!
//! Defines the storage interface for conversation records and the query
//! specification it consumes. The infrastructure layer (chatlog-infra)
//! implements this trait with SQLite persistence.

use chatlog_types::conversation::{ConversationRecord, MediaType};
use chatlog_types::error::RepositoryError;
use chatlog_types::stats::MediaTypeCount;
use chrono::{DateTime, Utc};

use super::SortOrder;

/// Filter criteria shared by list, history, count, and stats queries.
///
/// All present criteria are combined with AND. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationFilter {
    /// Exact match on the user identifier (no partial matching).
    pub user_identifier: Option<String>,
    /// Lower bound on the record timestamp (`>=`).
    pub since: Option<DateTime<Utc>>,
    /// Upper bound on the record timestamp (`<=`).
    pub until: Option<DateTime<Utc>>,
    pub media_type: Option<MediaType>,
}

/// Resolved filter, sort, and pagination for one read request.
///
/// Records are always ordered by `timestamp` in `sort_order`, with the record
/// id as a tiebreaker in the same direction so that the order is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub filter: ConversationFilter,
    pub sort_order: SortOrder,
    /// 1-based page number.
    pub page: u32,
    /// Page size, always at least 1.
    pub limit: u32,
}

impl QuerySpec {
    /// Number of records to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Repository trait for conversation record persistence.
///
/// Records are insert-only: there is no update or delete operation.
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait ConversationRepository: Send + Sync {
    /// Persist a new record. Returns `Conflict` if the id already exists.
    fn save(
        &self,
        record: &ConversationRecord,
    ) -> impl std::future::Future<Output = Result<ConversationRecord, RepositoryError>> + Send;

    /// Fetch one page of records matching `spec`, in canonical sort order.
    fn query(
        &self,
        spec: &QuerySpec,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationRecord>, RepositoryError>> + Send;

    /// Count all records matching the filter.
    fn count(
        &self,
        filter: &ConversationFilter,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Count matching records grouped by media type. Empty groups are omitted.
    fn count_by_media_type(
        &self,
        filter: &ConversationFilter,
    ) -> impl std::future::Future<Output = Result<Vec<MediaTypeCount>, RepositoryError>> + Send;

    /// Timestamp of the newest matching record in canonical sort order.
    fn latest_timestamp(
        &self,
        filter: &ConversationFilter,
    ) -> impl std::future::Future<Output = Result<Option<DateTime<Utc>>, RepositoryError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(page: u32, limit: u32) -> QuerySpec {
        QuerySpec {
            filter: ConversationFilter::default(),
            sort_order: SortOrder::Desc,
            page,
            limit,
        }
    }

    #[test]
    fn test_offset_first_page_is_zero() {
        assert_eq!(spec(1, 100).offset(), 0);
    }

    #[test]
    fn test_offset_later_pages() {
        assert_eq!(spec(2, 100).offset(), 100);
        assert_eq!(spec(5, 7).offset(), 28);
    }

    #[test]
    fn test_offset_does_not_underflow() {
        assert_eq!(spec(0, 10).offset(), 0);
    }
}
