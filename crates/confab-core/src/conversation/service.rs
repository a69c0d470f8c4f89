//! Conversation service orchestrating authorization, persistence, and
//! generation.
//!
//! Every operation takes the calling user explicitly -- there is no ambient
//! "current user". Conversation-scoped operations consult the guard before
//! touching the store; `send_message` additionally validates the text bound
//! before anything is persisted or forwarded to the collaborator.

use confab_types::conversation::{ConversationDetail, ConversationSummary};
use confab_types::error::ChatError;
use tracing::{debug, info};
use uuid::Uuid;

use crate::agent::{AgentCollaborator, AgentReply};
use crate::conversation::guard;
use crate::conversation::repository::ConversationRepository;

/// Upper bound on message text, measured in characters (not bytes).
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Orchestrates conversation operations under authorization.
///
/// Generic over `ConversationRepository` and `AgentCollaborator` to maintain
/// clean architecture (confab-core never depends on confab-infra).
pub struct ConversationService<R: ConversationRepository, A: AgentCollaborator> {
    repo: R,
    collaborator: A,
}

impl<R: ConversationRepository, A: AgentCollaborator> ConversationService<R, A> {
    /// Create a new service with the given repository and collaborator.
    pub fn new(repo: R, collaborator: A) -> Self {
        Self { repo, collaborator }
    }

    /// Access the conversation repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// List the caller's conversations, most recently updated first.
    pub async fn list_conversations(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<ConversationSummary>, ChatError> {
        Ok(self.repo.list_for_user(user_id).await?)
    }

    /// Show a conversation with its user-facing messages.
    pub async fn show_conversation(
        &self,
        user_id: &Uuid,
        conversation_id: &Uuid,
    ) -> Result<ConversationDetail, ChatError> {
        guard::authorize(&self.repo, user_id, conversation_id).await?;
        let messages = self.repo.get_messages(conversation_id).await?;
        Ok(ConversationDetail {
            id: *conversation_id,
            messages,
        })
    }

    /// Send a message, delegating generation to the agent collaborator.
    ///
    /// With a conversation id, the guard runs first; without one, a new
    /// conversation is minted as a side effect of invoking the collaborator.
    /// The text bound is enforced before any persistence or generation
    /// occurs, and the collaborator's reply is returned untouched.
    pub async fn send_message(
        &self,
        user_id: Uuid,
        conversation_id: Option<Uuid>,
        text: &str,
    ) -> Result<AgentReply, ChatError> {
        if let Some(ref cid) = conversation_id {
            guard::authorize(&self.repo, &user_id, cid).await?;
        }
        validate_message_text(text)?;

        debug!(
            user_id = %user_id,
            continued = conversation_id.is_some(),
            "Dispatching message to collaborator"
        );
        self.collaborator
            .generate(user_id, conversation_id, text)
            .await
    }

    /// Delete a conversation and all its messages, synchronously.
    pub async fn delete_conversation(
        &self,
        user_id: &Uuid,
        conversation_id: &Uuid,
    ) -> Result<(), ChatError> {
        guard::authorize(&self.repo, user_id, conversation_id).await?;
        self.repo.delete_conversation(conversation_id).await?;
        info!(conversation_id = %conversation_id, "Conversation deleted");
        Ok(())
    }
}

/// Enforce the message text bound: non-empty, at most
/// [`MAX_MESSAGE_CHARS`] characters.
pub fn validate_message_text(text: &str) -> Result<(), ChatError> {
    if text.is_empty() {
        return Err(ChatError::Validation(
            "message must not be empty".to_string(),
        ));
    }
    let chars = text.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(ChatError::Validation(format!(
            "message exceeds {MAX_MESSAGE_CHARS} characters (got {chars})"
        )));
    }
    Ok(())
}
