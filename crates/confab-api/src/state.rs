//! Application state wiring all services together.
//!
//! AppState holds the concrete service instance used by both CLI and REST
//! API. The service is generic over repository/collaborator traits, but
//! AppState pins it to the concrete infra implementations.

use std::sync::Arc;

use confab_core::conversation::service::ConversationService;
use confab_infra::agent::{EchoReplyGenerator, StoreBackedCollaborator};
use confab_infra::sqlite::conversation::SqliteConversationRepository;
use confab_infra::sqlite::pool::{resolve_data_dir, DatabasePool};

/// Concrete type aliases for the service generics pinned to infra implementations.
///
/// The echo generator is the default wiring; an LLM-backed `ReplyGenerator`
/// slots in here without touching the rest of the application.
pub type ConcreteCollaborator =
    StoreBackedCollaborator<SqliteConversationRepository, EchoReplyGenerator>;

pub type ConcreteConversationService =
    ConversationService<SqliteConversationRepository, ConcreteCollaborator>;

/// Shared application state holding the conversation service.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub conversation_service: Arc<ConcreteConversationService>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        // Initialize database
        let db_url = format!("sqlite://{}?mode=rwc", data_dir.join("confab.db").display());
        let db_pool = DatabasePool::new(&db_url).await?;

        // Wire the conversation service with its repository and collaborator
        let repo = SqliteConversationRepository::new(db_pool.clone());
        let collaborator = StoreBackedCollaborator::new(repo.clone(), EchoReplyGenerator);
        let conversation_service = ConversationService::new(repo, collaborator);

        Ok(Self {
            conversation_service: Arc::new(conversation_service),
            db_pool,
        })
    }
}
