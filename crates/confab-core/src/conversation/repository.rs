//! ConversationRepository trait definition.
//!
//! Pure persistence operations for conversations and messages -- ordering
//! and existence checks only, no authorization logic. Uses native async fn
//! in traits (RPITIT, Rust 2024 edition).

use confab_types::conversation::{Conversation, ConversationSummary};
use confab_types::error::RepositoryError;
use confab_types::message::ConversationMessage;
use uuid::Uuid;

/// Repository trait for conversation and message persistence.
///
/// Implementations live in confab-infra (e.g., `SqliteConversationRepository`).
pub trait ConversationRepository: Send + Sync {
    /// Create a new conversation with `created_at == updated_at`.
    fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by its unique ID.
    fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List conversations owned by a user, ordered by updated_at DESC.
    fn list_for_user(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationSummary>, RepositoryError>> + Send;

    /// Append a message and advance the parent conversation's `updated_at`
    /// to the message's `created_at`, as a single atomic unit.
    fn append_message(
        &self,
        message: &ConversationMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get user-facing messages for a conversation, restricted to the
    /// `user` and `assistant` roles, ordered by created_at ASC.
    fn get_messages(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationMessage>, RepositoryError>> + Send;

    /// Delete a conversation and all its messages together.
    ///
    /// Idempotent: deleting an absent id is not an error at this layer
    /// (the service pre-checks existence through the guard).
    fn delete_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
