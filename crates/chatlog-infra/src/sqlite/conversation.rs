//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `chatlog-core` using sqlx with
//! split read/write pools. Filters are bound parameters assembled with
//! `sqlx::QueryBuilder`; the sort column is fixed.

use chatlog_core::conversation::time::is_storable;
use chatlog_core::repository::conversation::{
    ConversationFilter, ConversationRepository, QuerySpec,
};
use chatlog_types::conversation::{ConversationId, ConversationRecord, MediaType};
use chatlog_types::error::RepositoryError;
use chatlog_types::stats::MediaTypeCount;
use chrono::{DateTime, FixedOffset, SubsecRound, Utc};
use sqlx::error::ErrorKind;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::pool::DatabasePool;

const SELECT_COLUMNS: &str = "SELECT id, user_identifier, user_message, assistant_message, \
     media_type, timestamp FROM conversations";

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row type
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: String,
    user_identifier: String,
    user_message: String,
    assistant_message: String,
    media_type: String,
    timestamp: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_identifier: row.try_get("user_identifier")?,
            user_message: row.try_get("user_message")?,
            assistant_message: row.try_get("assistant_message")?,
            media_type: row.try_get("media_type")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_record(self) -> Result<ConversationRecord, RepositoryError> {
        let id = self
            .id
            .parse::<ConversationId>()
            .map_err(|e| RepositoryError::Query(format!("invalid conversation id: {e}")))?;

        let media_type: MediaType = self
            .media_type
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ConversationRecord {
            id,
            user_identifier: self.user_identifier,
            user_message: self.user_message,
            assistant_message: self.assistant_message,
            media_type,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<FixedOffset>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC rendering. Every stored timestamp has the same width, so
/// comparing the strings compares the instants.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Append the WHERE clause for `filter`. Every value is a bound parameter.
fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ConversationFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(user) = &filter.user_identifier {
        qb.push(" AND user_identifier = ").push_bind(user.clone());
    }
    if let Some(since) = &filter.since {
        qb.push(" AND timestamp >= ").push_bind(format_datetime(since));
    }
    if let Some(until) = &filter.until {
        qb.push(" AND timestamp <= ").push_bind(format_datetime(until));
    }
    if let Some(media_type) = &filter.media_type {
        qb.push(" AND media_type = ").push_bind(media_type.as_str());
    }
}

fn map_insert_error(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db_err) => match db_err.kind() {
            ErrorKind::UniqueViolation => {
                RepositoryError::Conflict(format!("duplicate key: {}", db_err.message()))
            }
            ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                RepositoryError::Constraint(db_err.message().to_string())
            }
            _ => RepositoryError::Query(e.to_string()),
        },
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        _ => RepositoryError::Query(e.to_string()),
    }
}

fn map_read_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// ConversationRepository impl
// ---------------------------------------------------------------------------

impl ConversationRepository for SqliteConversationRepository {
    async fn save(
        &self,
        record: &ConversationRecord,
    ) -> Result<ConversationRecord, RepositoryError> {
        if !is_storable(&record.timestamp) {
            return Err(RepositoryError::Constraint(format!(
                "timestamp {} is outside years 0000-9999",
                record.timestamp
            )));
        }

        // The column keeps microseconds; answer with exactly what was stored.
        let mut stored = record.clone();
        stored.timestamp = stored.timestamp.trunc_subsecs(6);

        sqlx::query(
            r#"INSERT INTO conversations
               (id, user_identifier, user_message, assistant_message, media_type, timestamp)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(stored.id.to_string())
        .bind(&stored.user_identifier)
        .bind(&stored.user_message)
        .bind(&stored.assistant_message)
        .bind(stored.media_type.as_str())
        .bind(format_datetime(&stored.timestamp.with_timezone(&Utc)))
        .execute(&self.pool.writer)
        .await
        .map_err(map_insert_error)?;

        Ok(stored)
    }

    async fn query(&self, spec: &QuerySpec) -> Result<Vec<ConversationRecord>, RepositoryError> {
        let order = spec.sort_order.as_sql();

        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        push_filter(&mut qb, &spec.filter);
        qb.push(format!(" ORDER BY timestamp {order}, id {order}"));
        qb.push(" LIMIT ").push_bind(i64::from(spec.limit));
        qb.push(" OFFSET ")
            .push_bind(i64::try_from(spec.offset()).unwrap_or(i64::MAX));

        let rows = qb
            .build()
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_read_error)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = ConversationRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            records.push(r.into_record()?);
        }
        Ok(records)
    }

    async fn count(&self, filter: &ConversationFilter) -> Result<u64, RepositoryError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) AS cnt FROM conversations");
        push_filter(&mut qb, filter);

        let row = qb
            .build()
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_read_error)?;
        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count.max(0) as u64)
    }

    async fn count_by_media_type(
        &self,
        filter: &ConversationFilter,
    ) -> Result<Vec<MediaTypeCount>, RepositoryError> {
        let mut qb =
            QueryBuilder::<Sqlite>::new("SELECT media_type, COUNT(*) AS cnt FROM conversations");
        push_filter(&mut qb, filter);
        qb.push(" GROUP BY media_type");

        let rows = qb
            .build()
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_read_error)?;

        let mut groups = Vec::with_capacity(rows.len());
        for row in &rows {
            let media_type: String = row
                .try_get("media_type")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let count: i64 = row
                .try_get("cnt")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            groups.push(MediaTypeCount {
                media_type: media_type.parse().map_err(|e: String| RepositoryError::Query(e))?,
                count: count.max(0) as u64,
            });
        }
        Ok(groups)
    }

    async fn latest_timestamp(
        &self,
        filter: &ConversationFilter,
    ) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT timestamp FROM conversations");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY timestamp DESC, id DESC LIMIT 1");

        let row = qb
            .build()
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_read_error)?;

        match row {
            Some(row) => {
                let ts: String = row
                    .try_get("timestamp")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(parse_datetime(&ts)?.with_timezone(&Utc)))
            }
            None => Ok(None),
        }
    }
}
