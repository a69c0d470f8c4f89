//! In-memory `ConversationRepository` used by guard and service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use confab_types::conversation::{Conversation, ConversationSummary};
use confab_types::error::RepositoryError;
use confab_types::message::{ConversationMessage, MessageRole};
use uuid::Uuid;

use crate::conversation::repository::ConversationRepository;

#[derive(Default)]
struct State {
    conversations: HashMap<Uuid, Conversation>,
    messages: Vec<ConversationMessage>,
}

/// HashMap-backed repository mirroring the SQLite implementation's
/// ordering and role-filtering behavior.
#[derive(Clone, Default)]
pub(crate) struct InMemoryRepository {
    inner: Arc<Mutex<State>>,
}

impl InMemoryRepository {
    pub(crate) fn message_count(&self, conversation_id: &Uuid) -> usize {
        let state = self.inner.lock().unwrap();
        state
            .messages
            .iter()
            .filter(|m| m.conversation_id == *conversation_id)
            .count()
    }
}

impl ConversationRepository for InMemoryRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        let mut state = self.inner.lock().unwrap();
        state
            .conversations
            .insert(conversation.id, conversation.clone());
        Ok(conversation.clone())
    }

    async fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let state = self.inner.lock().unwrap();
        Ok(state.conversations.get(conversation_id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let state = self.inner.lock().unwrap();
        let mut summaries: Vec<ConversationSummary> = state
            .conversations
            .values()
            .filter(|c| c.user_id == *user_id)
            .map(|c| ConversationSummary {
                id: c.id,
                title: c.title.clone(),
                updated_at: c.updated_at,
            })
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn append_message(
        &self,
        message: &ConversationMessage,
    ) -> Result<(), RepositoryError> {
        let mut state = self.inner.lock().unwrap();
        let conversation = state
            .conversations
            .get_mut(&message.conversation_id)
            .ok_or(RepositoryError::NotFound)?;
        conversation.updated_at = message.created_at;
        state.messages.push(message.clone());
        Ok(())
    }

    async fn get_messages(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<ConversationMessage>, RepositoryError> {
        let state = self.inner.lock().unwrap();
        let mut messages: Vec<ConversationMessage> = state
            .messages
            .iter()
            .filter(|m| {
                m.conversation_id == *conversation_id
                    && matches!(m.role, MessageRole::User | MessageRole::Assistant)
            })
            .cloned()
            .collect();
        messages.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(messages)
    }

    async fn delete_conversation(&self, conversation_id: &Uuid) -> Result<(), RepositoryError> {
        let mut state = self.inner.lock().unwrap();
        state.conversations.remove(conversation_id);
        state.messages.retain(|m| m.conversation_id != *conversation_id);
        Ok(())
    }
}
