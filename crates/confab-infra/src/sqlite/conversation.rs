//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `confab-core` using sqlx with
//! split read/write pools: raw queries, private Row structs, and explicit
//! transactions for the two multi-statement operations (message append and
//! conversation delete).

use confab_core::conversation::repository::ConversationRepository;
use confab_types::conversation::{Conversation, ConversationSummary};
use confab_types::error::RepositoryError;
use confab_types::message::{ConversationMessage, MessageRole};
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationRepository`.
#[derive(Clone)]
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
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Internal row type for mapping SQLite rows to domain Conversation.
struct ConversationRow {
    id: String,
    user_id: String,
    title: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation id: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;
        let updated_at = parse_datetime(&self.updated_at)?;

        Ok(Conversation {
            id,
            user_id,
            title: self.title,
            created_at,
            updated_at,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain ConversationMessage.
struct MessageRow {
    id: String,
    conversation_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ConversationMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let conversation_id = Uuid::parse_str(&self.conversation_id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation_id: {e}")))?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(ConversationMessage {
            id,
            conversation_id,
            role,
            content: self.content,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// ConversationRepository implementation
// ---------------------------------------------------------------------------

impl ConversationRepository for SqliteConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO agent_conversations (id, user_id, title, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(conversation.id.to_string())
        .bind(conversation.user_id.to_string())
        .bind(&conversation.title)
        .bind(format_datetime(&conversation.created_at))
        .bind(format_datetime(&conversation.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(conversation.clone())
    }

    async fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM agent_conversations WHERE id = ?")
            .bind(conversation_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conversation_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conversation_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn list_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT id, title, updated_at FROM agent_conversations
               WHERE user_id = ? ORDER BY updated_at DESC"#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row
                .try_get("id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let title: Option<String> = row
                .try_get("title")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let updated_at: String = row
                .try_get("updated_at")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

            summaries.push(ConversationSummary {
                id: Uuid::parse_str(&id)
                    .map_err(|e| RepositoryError::Query(format!("invalid conversation id: {e}")))?,
                title,
                updated_at: parse_datetime(&updated_at)?,
            });
        }

        Ok(summaries)
    }

    async fn append_message(&self, message: &ConversationMessage) -> Result<(), RepositoryError> {
        // Insert and parent-timestamp refresh are one atomic unit, so a
        // conversation's updated_at can never advance without a
        // corresponding persisted message.
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO agent_conversation_messages (id, conversation_id, role, content, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.conversation_id.to_string())
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(format_datetime(&message.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("UPDATE agent_conversations SET updated_at = ? WHERE id = ?")
            .bind(format_datetime(&message.created_at))
            .bind(message.conversation_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_messages(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<ConversationMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM agent_conversation_messages
               WHERE conversation_id = ? AND role IN ('user', 'assistant')
               ORDER BY created_at ASC, id ASC"#,
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }

    async fn delete_conversation(&self, conversation_id: &Uuid) -> Result<(), RepositoryError> {
        // Messages first: the schema has no ON DELETE CASCADE, the
        // repository owns the cascade. Deleting an absent id is a no-op.
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("DELETE FROM agent_conversation_messages WHERE conversation_id = ?")
            .bind(conversation_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("DELETE FROM agent_conversations WHERE id = ?")
            .bind(conversation_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;
    use chrono::Duration;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_conversation(user_id: Uuid) -> Conversation {
        Conversation::new(user_id, Some("Test conversation".to_string()))
    }

    #[tokio::test]
    async fn test_create_and_get_conversation() {
        let repo = SqliteConversationRepository::new(test_pool().await);

        let user_id = Uuid::now_v7();
        let conversation = make_conversation(user_id);
        let created = repo.create_conversation(&conversation).await.unwrap();
        assert_eq!(created.id, conversation.id);

        let found = repo.get_conversation(&conversation.id).await.unwrap().unwrap();
        assert_eq!(found.id, conversation.id);
        assert_eq!(found.user_id, user_id);
        assert_eq!(found.title.as_deref(), Some("Test conversation"));
        assert_eq!(found.created_at, found.updated_at);
    }

    #[tokio::test]
    async fn test_get_missing_conversation_returns_none() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        let found = repo.get_conversation(&Uuid::now_v7()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_for_user_orders_by_updated_at_desc() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        let user_id = Uuid::now_v7();
        let now = Utc::now();

        let mut stale = Conversation::new(user_id, Some("stale".to_string()));
        stale.created_at = now - Duration::hours(2);
        stale.updated_at = now - Duration::hours(2);
        let mut fresh = Conversation::new(user_id, Some("fresh".to_string()));
        fresh.created_at = now - Duration::hours(1);
        fresh.updated_at = now;

        repo.create_conversation(&stale).await.unwrap();
        repo.create_conversation(&fresh).await.unwrap();

        // Another user's conversation must not leak into the listing.
        repo.create_conversation(&Conversation::new(Uuid::now_v7(), None))
            .await
            .unwrap();

        let listed = repo.list_for_user(&user_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, fresh.id);
        assert_eq!(listed[1].id, stale.id);
    }

    #[tokio::test]
    async fn test_list_for_user_empty() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        let listed = repo.list_for_user(&Uuid::now_v7()).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_append_message_advances_updated_at() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        let user_id = Uuid::now_v7();
        let now = Utc::now();

        let mut conversation = Conversation::new(user_id, None);
        conversation.created_at = now - Duration::minutes(10);
        conversation.updated_at = now - Duration::minutes(10);
        repo.create_conversation(&conversation).await.unwrap();

        let message = ConversationMessage::user(conversation.id, "Hello".to_string());
        repo.append_message(&message).await.unwrap();

        let found = repo.get_conversation(&conversation.id).await.unwrap().unwrap();
        assert!(found.updated_at > found.created_at);
        assert_eq!(found.updated_at, message.created_at);
    }

    #[tokio::test]
    async fn test_append_then_get_roundtrips_in_order() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        let conversation = make_conversation(Uuid::now_v7());
        repo.create_conversation(&conversation).await.unwrap();

        let user_msg = ConversationMessage::user(conversation.id, "Hello, AI!".to_string());
        let assistant_msg =
            ConversationMessage::assistant(conversation.id, "Hello, human!".to_string());
        repo.append_message(&user_msg).await.unwrap();
        repo.append_message(&assistant_msg).await.unwrap();

        let messages = repo.get_messages(&conversation.id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "Hello, AI!");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].content, "Hello, human!");
    }

    #[tokio::test]
    async fn test_get_messages_excludes_system_rows() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        let conversation = make_conversation(Uuid::now_v7());
        repo.create_conversation(&conversation).await.unwrap();

        let system_msg = ConversationMessage {
            id: Uuid::now_v7(),
            conversation_id: conversation.id,
            role: MessageRole::System,
            content: "internal instructions".to_string(),
            created_at: Utc::now(),
        };
        repo.append_message(&system_msg).await.unwrap();
        repo.append_message(&ConversationMessage::user(
            conversation.id,
            "Hello".to_string(),
        ))
        .await
        .unwrap();

        let messages = repo.get_messages(&conversation.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_append_to_missing_conversation_fails() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        let orphan = ConversationMessage::user(Uuid::now_v7(), "lost".to_string());
        let err = repo.append_message(&orphan).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }

    #[tokio::test]
    async fn test_delete_conversation_cascades_messages() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        let conversation = make_conversation(Uuid::now_v7());
        repo.create_conversation(&conversation).await.unwrap();
        repo.append_message(&ConversationMessage::user(
            conversation.id,
            "Hello".to_string(),
        ))
        .await
        .unwrap();

        repo.delete_conversation(&conversation.id).await.unwrap();

        assert!(repo.get_conversation(&conversation.id).await.unwrap().is_none());
        assert!(repo.get_messages(&conversation.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        let conversation = make_conversation(Uuid::now_v7());
        repo.create_conversation(&conversation).await.unwrap();

        repo.delete_conversation(&conversation.id).await.unwrap();
        // Deleting again, or deleting an id that never existed, is a no-op.
        repo.delete_conversation(&conversation.id).await.unwrap();
        repo.delete_conversation(&Uuid::now_v7()).await.unwrap();
    }
}
