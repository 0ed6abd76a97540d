//! Conversation service orchestrating normalization, validation, and storage.
//!
//! Generic over `ConversationRepository` so the core crate never depends on
//! a concrete database. Validation failures are returned before the
//! repository is touched.

use chatlog_types::config::ServiceConfig;
use chatlog_types::conversation::{ConversationId, ConversationRecord, CreateConversationRequest};
use chatlog_types::error::ConversationError;
use chatlog_types::pagination::Pagination;
use chatlog_types::stats::ConversationStats;
use chrono::{FixedOffset, Utc};

use super::normalize::normalize_request;
use super::query::QueryBuilder;
use super::validate::{QueryParams, validate_query, validate_write};
use crate::repository::Page;
use crate::repository::conversation::{ConversationRepository, QuerySpec};

pub struct ConversationService<R: ConversationRepository> {
    repo: R,
    query_builder: QueryBuilder,
    civil_offset: FixedOffset,
}

impl<R: ConversationRepository> ConversationService<R> {
    pub fn new(repo: R, config: &ServiceConfig) -> Self {
        Self {
            repo,
            query_builder: QueryBuilder::new(config.default_page_size, config.max_page_size),
            civil_offset: config.civil_offset(),
        }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Normalize, validate, and persist one conversation turn.
    ///
    /// A missing timestamp defaults to now in the civil timezone.
    pub async fn create(
        &self,
        request: CreateConversationRequest,
    ) -> Result<ConversationRecord, ConversationError> {
        let normalized = normalize_request(&request);
        let valid = validate_write(&normalized, self.civil_offset).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected conversation write");
        })?;

        let record = ConversationRecord {
            id: ConversationId::new(),
            user_identifier: valid.user_identifier,
            user_message: valid.user_message,
            assistant_message: valid.assistant_message,
            media_type: valid.media_type,
            timestamp: valid
                .timestamp
                .unwrap_or_else(|| Utc::now().with_timezone(&self.civil_offset)),
        };

        let saved = self.repo.save(&record).await?;
        tracing::info!(
            id = %saved.id,
            media_type = %saved.media_type,
            "conversation saved"
        );
        Ok(self.localize(saved))
    }

    /// All conversations matching the query parameters.
    pub async fn list(
        &self,
        params: &QueryParams,
    ) -> Result<Page<ConversationRecord>, ConversationError> {
        let validated = validate_query(params, self.civil_offset)?;
        let spec = self.query_builder.build(&validated, params, None);
        self.fetch_page(&spec).await
    }

    /// One user's conversations matching the query parameters.
    pub async fn history(
        &self,
        user_identifier: &str,
        params: &QueryParams,
    ) -> Result<Page<ConversationRecord>, ConversationError> {
        if user_identifier.trim().is_empty() {
            return Err(ConversationError::invalid("userIdentifier is required"));
        }
        let validated = validate_query(params, self.civil_offset)?;
        let spec = self
            .query_builder
            .build(&validated, params, Some(user_identifier));
        self.fetch_page(&spec).await
    }

    /// Totals grouped by media type, for everyone or for one user.
    pub async fn stats(
        &self,
        user_identifier: Option<&str>,
    ) -> Result<ConversationStats, ConversationError> {
        let filter = self.query_builder.stats_filter(user_identifier);

        let total = self.repo.count(&filter).await?;
        let mut by_media_type = self.repo.count_by_media_type(&filter).await?;
        by_media_type.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.media_type.cmp(&b.media_type))
        });
        let last_record_timestamp = self
            .repo
            .latest_timestamp(&filter)
            .await?
            .map(|ts| ts.with_timezone(&self.civil_offset));

        Ok(ConversationStats {
            total,
            by_media_type,
            last_record_timestamp,
        })
    }

    async fn fetch_page(
        &self,
        spec: &QuerySpec,
    ) -> Result<Page<ConversationRecord>, ConversationError> {
        tracing::debug!(
            user = ?spec.filter.user_identifier,
            media_type = ?spec.filter.media_type,
            sort = %spec.sort_order,
            page = spec.page,
            limit = spec.limit,
            "querying conversations"
        );

        let total = self.repo.count(&spec.filter).await?;
        let items = self
            .repo
            .query(spec)
            .await?
            .into_iter()
            .map(|record| self.localize(record))
            .collect();

        Ok(Page {
            items,
            pagination: Pagination::new(total, spec.page, spec.limit),
        })
    }

    fn localize(&self, mut record: ConversationRecord) -> ConversationRecord {
        record.timestamp = record.timestamp.with_timezone(&self.civil_offset);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::SortOrder;
    use crate::repository::conversation::ConversationFilter;
    use chatlog_types::conversation::MediaType;
    use chatlog_types::error::RepositoryError;
    use chatlog_types::stats::MediaTypeCount;
    use chrono::DateTime;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory repository mirroring the SQLite ordering rules.
    #[derive(Default)]
    struct InMemoryRepository {
        records: Mutex<Vec<ConversationRecord>>,
        saves: AtomicUsize,
    }

    impl InMemoryRepository {
        fn matching(&self, filter: &ConversationFilter) -> Vec<ConversationRecord> {
            self.records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    filter
                        .user_identifier
                        .as_ref()
                        .is_none_or(|u| &r.user_identifier == u)
                        && filter.since.is_none_or(|s| r.timestamp.with_timezone(&Utc) >= s)
                        && filter.until.is_none_or(|u| r.timestamp.with_timezone(&Utc) <= u)
                        && filter.media_type.is_none_or(|m| r.media_type == m)
                })
                .cloned()
                .collect()
        }
    }

    impl ConversationRepository for InMemoryRepository {
        async fn save(
            &self,
            record: &ConversationRecord,
        ) -> Result<ConversationRecord, RepositoryError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            let mut records = self.records.lock().unwrap();
            if records.iter().any(|r| r.id == record.id) {
                return Err(RepositoryError::Conflict(record.id.to_string()));
            }
            records.push(record.clone());
            Ok(record.clone())
        }

        async fn query(
            &self,
            spec: &QuerySpec,
        ) -> Result<Vec<ConversationRecord>, RepositoryError> {
            let mut matching = self.matching(&spec.filter);
            matching.sort_by(|a, b| (a.timestamp, a.id).cmp(&(b.timestamp, b.id)));
            if spec.sort_order == SortOrder::Desc {
                matching.reverse();
            }
            Ok(matching
                .into_iter()
                .skip(spec.offset() as usize)
                .take(spec.limit as usize)
                .collect())
        }

        async fn count(&self, filter: &ConversationFilter) -> Result<u64, RepositoryError> {
            Ok(self.matching(filter).len() as u64)
        }

        async fn count_by_media_type(
            &self,
            filter: &ConversationFilter,
        ) -> Result<Vec<MediaTypeCount>, RepositoryError> {
            let mut groups: BTreeMap<MediaType, u64> = BTreeMap::new();
            for record in self.matching(filter) {
                *groups.entry(record.media_type).or_default() += 1;
            }
            Ok(groups
                .into_iter()
                .map(|(media_type, count)| MediaTypeCount { media_type, count })
                .collect())
        }

        async fn latest_timestamp(
            &self,
            filter: &ConversationFilter,
        ) -> Result<Option<DateTime<Utc>>, RepositoryError> {
            Ok(self
                .matching(filter)
                .iter()
                .map(|r| r.timestamp.with_timezone(&Utc))
                .max())
        }
    }

    fn service() -> ConversationService<InMemoryRepository> {
        ConversationService::new(InMemoryRepository::default(), &ServiceConfig::default())
    }

    fn request(user: &str, media_type: &str, timestamp: &str) -> CreateConversationRequest {
        CreateConversationRequest {
            user_identifier: Some(json!(user)),
            user_message: Some(json!("hola")),
            assistant_message: Some(json!("hi")),
            media_type: Some(json!(media_type)),
            timestamp: Some(json!(timestamp)),
        }
    }

    fn page_params(page: u32, limit: u32) -> QueryParams {
        QueryParams {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_photo_scenario() {
        let svc = service();
        let record = svc
            .create(CreateConversationRequest {
                user_identifier: Some(json!("+59170000000")),
                user_message: Some(json!("")),
                assistant_message: Some(json!("ok")),
                media_type: Some(json!("photo")),
                timestamp: None,
            })
            .await
            .unwrap();
        assert_eq!(record.media_type, MediaType::Image);
        assert_eq!(record.user_message, "[Image received]");
        assert_eq!(record.assistant_message, "ok");
        assert_eq!(record.timestamp.offset().local_minus_utc(), -4 * 3600);
    }

    #[tokio::test]
    async fn test_create_video_and_text_placeholders() {
        let svc = service();
        let mut req = request("u1", "video", "2024-01-01T10:00:00");
        req.user_message = Some(json!(""));
        assert_eq!(svc.create(req).await.unwrap().user_message, "[Video received]");

        let mut req = request("u1", "text", "2024-01-01T10:00:00");
        req.user_message = None;
        assert_eq!(svc.create(req).await.unwrap().user_message, "[Text message]");
    }

    #[tokio::test]
    async fn test_invalid_write_never_reaches_store() {
        let svc = service();
        let err = svc.create(request("   ", "hologram", "2024-01-01")).await.unwrap_err();
        match err {
            ConversationError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0], "userIdentifier is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(svc.repo().saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_persisted_media_type_is_canonical() {
        let svc = service();
        for label in ["photo", "ptt", "sticker", "document", "voice", "gif", "TEXT"] {
            let record = svc.create(request("u1", label, "2024-01-01")).await.unwrap();
            assert!(MediaType::ALL.contains(&record.media_type));
        }
        for record in svc.repo().records.lock().unwrap().iter() {
            assert!(MediaType::ALL.contains(&record.media_type));
        }
    }

    #[tokio::test]
    async fn test_pages_have_no_overlap_or_gap() {
        let svc = service();
        // Several records share a timestamp so the id tiebreaker matters.
        for i in 0..23 {
            let ts = format!("2024-03-{:02}T12:00:00", 1 + i / 3);
            svc.create(request("u1", "text", &ts)).await.unwrap();
        }

        let all = svc.list(&page_params(1, 100)).await.unwrap();
        assert_eq!(all.items.len(), 23);

        let mut paged = Vec::new();
        for page in 1..=5 {
            let result = svc.list(&page_params(page, 5)).await.unwrap();
            assert_eq!(result.pagination.total, 23);
            assert_eq!(result.pagination.pages, 5);
            assert_eq!(result.pagination.page, page);
            paged.extend(result.items);
        }
        let all_ids: Vec<_> = all.items.iter().map(|r| r.id).collect();
        let paged_ids: Vec<_> = paged.iter().map(|r| r.id).collect();
        assert_eq!(all_ids, paged_ids);

        let past_end = svc.list(&page_params(6, 5)).await.unwrap();
        assert!(past_end.items.is_empty());
    }

    #[tokio::test]
    async fn test_list_default_order_is_newest_first() {
        let svc = service();
        svc.create(request("u1", "text", "2024-01-01")).await.unwrap();
        svc.create(request("u1", "text", "2024-02-01")).await.unwrap();

        let desc = svc.list(&QueryParams::default()).await.unwrap();
        assert!(desc.items[0].timestamp > desc.items[1].timestamp);

        let asc = svc
            .list(&QueryParams {
                sort_order: Some("asc".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(asc.items[0].timestamp < asc.items[1].timestamp);
    }

    #[tokio::test]
    async fn test_repeated_read_is_identical() {
        let svc = service();
        for i in 0..7 {
            svc.create(request(&format!("u{}", i % 2), "audio", "2024-01-01")).await.unwrap();
        }
        let params = page_params(2, 3);
        let first = svc.list(&params).await.unwrap();
        let second = svc.list(&params).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_list_filters_by_media_type_and_dates() {
        let svc = service();
        svc.create(request("u1", "text", "2024-01-15")).await.unwrap();
        svc.create(request("u1", "image", "2024-01-20")).await.unwrap();
        svc.create(request("u1", "image", "2024-03-01")).await.unwrap();

        let result = svc
            .list(&QueryParams {
                media_type: Some("image".to_string()),
                start_date: Some("2024-01-01".to_string()),
                end_date: Some("2024-01-31".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(result.pagination.total, 1);
        assert_eq!(result.items[0].media_type, MediaType::Image);
    }

    #[tokio::test]
    async fn test_end_date_includes_whole_day() {
        let svc = service();
        svc.create(request("u1", "text", "2024-12-31T23:30:00")).await.unwrap();
        let result = svc
            .list(&QueryParams {
                end_date: Some("2024-12-31".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(result.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_list_rejects_bogus_media_type() {
        let svc = service();
        let err = svc
            .list(&QueryParams {
                media_type: Some("bogus".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ConversationError::Validation(ref e) if e[0].contains("mediaType")));
    }

    #[tokio::test]
    async fn test_history_pins_user() {
        let svc = service();
        svc.create(request("+591700", "text", "2024-01-01")).await.unwrap();
        svc.create(request("+5917001", "text", "2024-01-01")).await.unwrap();
        svc.create(request("+591700", "image", "2024-01-02")).await.unwrap();

        let history = svc.history("+591700", &QueryParams::default()).await.unwrap();
        assert_eq!(history.pagination.total, 2);
        assert!(history.items.iter().all(|r| r.user_identifier == "+591700"));
    }

    #[tokio::test]
    async fn test_history_blank_user_rejected() {
        let svc = service();
        let err = svc.history("  ", &QueryParams::default()).await.unwrap_err();
        assert!(matches!(err, ConversationError::Validation(_)));
    }

    #[tokio::test]
    async fn test_stats_six_text_four_image() {
        let svc = service();
        for _ in 0..6 {
            svc.create(request("u1", "text", "2024-01-01")).await.unwrap();
        }
        for _ in 0..4 {
            svc.create(request("u2", "photo", "2024-02-01T08:00:00")).await.unwrap();
        }

        let stats = svc.stats(None).await.unwrap();
        assert_eq!(stats.total, 10);
        assert_eq!(
            stats.by_media_type,
            vec![
                MediaTypeCount { media_type: MediaType::Text, count: 6 },
                MediaTypeCount { media_type: MediaType::Image, count: 4 },
            ]
        );
        assert_eq!(
            stats.last_record_timestamp.unwrap().to_rfc3339(),
            "2024-02-01T08:00:00-04:00"
        );

        let user_stats = svc.stats(Some("u2")).await.unwrap();
        assert_eq!(user_stats.total, 4);
        assert_eq!(user_stats.by_media_type.len(), 1);
    }

    #[tokio::test]
    async fn test_stats_empty() {
        let stats = service().stats(Some("nobody")).await.unwrap();
        assert_eq!(stats.total, 0);
        assert!(stats.by_media_type.is_empty());
        assert!(stats.last_record_timestamp.is_none());
    }
}
