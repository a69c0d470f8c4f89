//! Ownership gate for conversation-scoped operations.
//!
//! Every read, append, or delete that names a conversation id must pass
//! through [`authorize`] first. The check collapses "does not exist" and
//! "owned by someone else" into the same `Forbidden` outcome so that
//! callers cannot probe for conversation existence.

use confab_types::error::ChatError;
use uuid::Uuid;

use crate::conversation::repository::ConversationRepository;

/// Allow the operation iff a conversation with `conversation_id` exists and
/// is owned by `user_id`. No side effects.
pub async fn authorize<R: ConversationRepository>(
    repo: &R,
    user_id: &Uuid,
    conversation_id: &Uuid,
) -> Result<(), ChatError> {
    match repo.get_conversation(conversation_id).await? {
        Some(conversation) if conversation.user_id == *user_id => Ok(()),
        _ => Err(ChatError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::testing::InMemoryRepository;
    use confab_types::conversation::Conversation;

    #[tokio::test]
    async fn test_owner_is_allowed() {
        let repo = InMemoryRepository::default();
        let user_id = Uuid::now_v7();
        let conversation = Conversation::new(user_id, None);
        repo.create_conversation(&conversation).await.unwrap();

        assert!(authorize(&repo, &user_id, &conversation.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_other_user_is_denied() {
        let repo = InMemoryRepository::default();
        let owner = Uuid::now_v7();
        let intruder = Uuid::now_v7();
        let conversation = Conversation::new(owner, None);
        repo.create_conversation(&conversation).await.unwrap();

        let err = authorize(&repo, &intruder, &conversation.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Forbidden));
    }

    #[tokio::test]
    async fn test_missing_conversation_is_denied() {
        let repo = InMemoryRepository::default();
        let user_id = Uuid::now_v7();

        let err = authorize(&repo, &user_id, &Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, ChatError::Forbidden));
    }

    #[tokio::test]
    async fn test_missing_and_foreign_are_indistinguishable() {
        let repo = InMemoryRepository::default();
        let owner = Uuid::now_v7();
        let intruder = Uuid::now_v7();
        let conversation = Conversation::new(owner, None);
        repo.create_conversation(&conversation).await.unwrap();

        let foreign = authorize(&repo, &intruder, &conversation.id)
            .await
            .unwrap_err();
        let missing = authorize(&repo, &intruder, &Uuid::now_v7())
            .await
            .unwrap_err();

        assert_eq!(foreign.to_string(), missing.to_string());
    }
}
