//! Store-backed agent collaborator.
//!
//! Wraps a [`ReplyGenerator`] with the persistence semantics the
//! conversation service relies on:
//!
//! - no conversation id supplied: a new conversation is minted for the user,
//!   titled from the first message;
//! - the user message is durably appended before generation starts;
//! - reply chunks are forwarded to the caller while being accumulated, and
//!   the complete assistant message is appended only once the generator's
//!   stream finishes. A stream error, or a stream that is dropped before
//!   completion, leaves no assistant row and no orphaned `updated_at`
//!   advance (append and timestamp refresh are one transaction).

use confab_core::agent::{AgentCollaborator, AgentReply, ReplyGenerator};
use confab_core::conversation::repository::ConversationRepository;
use confab_types::conversation::Conversation;
use confab_types::error::ChatError;
use confab_types::message::ConversationMessage;
use futures_util::StreamExt;
use tracing::debug;
use uuid::Uuid;

/// Conversation titles derived from the first message are capped at this
/// many characters.
const TITLE_MAX_CHARS: usize = 60;

pub struct StoreBackedCollaborator<R, G> {
    repo: R,
    generator: G,
}

impl<R, G> StoreBackedCollaborator<R, G> {
    pub fn new(repo: R, generator: G) -> Self {
        Self { repo, generator }
    }
}

/// Derive a conversation title from the first message: the first line,
/// capped at [`TITLE_MAX_CHARS`] characters.
fn derive_title(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let mut title: String = first_line.chars().take(TITLE_MAX_CHARS).collect();
    if first_line.chars().count() > TITLE_MAX_CHARS {
        title.push('…');
    }
    title
}

impl<R, G> AgentCollaborator for StoreBackedCollaborator<R, G>
where
    R: ConversationRepository + Clone + 'static,
    G: ReplyGenerator,
{
    async fn generate(
        &self,
        user_id: Uuid,
        conversation_id: Option<Uuid>,
        text: &str,
    ) -> Result<AgentReply, ChatError> {
        let conversation_id = match conversation_id {
            Some(id) => id,
            None => {
                let conversation = Conversation::new(user_id, Some(derive_title(text)));
                let created = self.repo.create_conversation(&conversation).await?;
                debug!(conversation_id = %created.id, "Minted conversation for first message");
                created.id
            }
        };

        // The user message is durable before generation starts.
        self.repo
            .append_message(&ConversationMessage::user(
                conversation_id,
                text.to_string(),
            ))
            .await?;

        let history = self.repo.get_messages(&conversation_id).await?;
        let inner = self.generator.reply(&history)?;

        let repo = self.repo.clone();
        let stream = async_stream::try_stream! {
            let mut inner = std::pin::pin!(inner);
            let mut full = String::new();
            while let Some(chunk) = inner.next().await {
                let chunk = chunk?;
                full.push_str(&chunk);
                yield chunk;
            }
            // Persisted only after the generator ran to completion.
            if !full.is_empty() {
                repo.append_message(&ConversationMessage::assistant(conversation_id, full))
                    .await?;
            }
        };

        Ok(AgentReply {
            conversation_id,
            stream: stream.boxed(),
        })
    }
}
