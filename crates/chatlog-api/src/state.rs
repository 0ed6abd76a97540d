//! Application state wiring the service to its storage.
//!
//! `ConversationService` is generic over the repository trait; AppState pins
//! it to the SQLite implementation.

use std::path::Path;
use std::sync::Arc;

use chatlog_core::conversation::service::ConversationService;
use chatlog_infra::config::resolve_database_url;
use chatlog_infra::sqlite::conversation::SqliteConversationRepository;
use chatlog_infra::sqlite::pool::DatabasePool;
use chatlog_types::config::ServiceConfig;

/// Concrete type alias for the service generic pinned to the infra implementation.
pub type ConcreteConversationService = ConversationService<SqliteConversationRepository>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub conversation_service: Arc<ConcreteConversationService>,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init(config: ServiceConfig, data_dir: &Path) -> anyhow::Result<Self> {
        // Ensure data directory exists
        tokio::fs::create_dir_all(data_dir).await?;

        let db_url = resolve_database_url(&config, data_dir);
        let db_pool = DatabasePool::new(&db_url).await?;

        Ok(Self::from_pool(db_pool, config))
    }

    /// Wire services over an already-open pool.
    pub fn from_pool(db_pool: DatabasePool, config: ServiceConfig) -> Self {
        let repo = SqliteConversationRepository::new(db_pool);
        let conversation_service = Arc::new(ConversationService::new(repo, &config));

        Self {
            conversation_service,
            config: Arc::new(config),
        }
    }
}
