//! Agent collaborator seam.
//!
//! The conversation service does not generate replies itself: it hands the
//! user identity, the optional existing conversation, and the message text
//! to an [`AgentCollaborator`], which yields the conversation id (minting a
//! new conversation when none was supplied) and a stream of reply chunks.
//! The collaborator owns persistence of the user/assistant exchange; the
//! service never inspects or transforms the generated content.

use confab_types::error::ChatError;
use confab_types::message::ConversationMessage;
use futures_util::stream::BoxStream;
use uuid::Uuid;

/// Incrementally produced reply text, consumed until end-of-stream or error.
pub type ReplyStream = BoxStream<'static, Result<String, ChatError>>;

/// The outcome of invoking the collaborator: the conversation the exchange
/// belongs to, and the streamed assistant reply.
pub struct AgentReply {
    /// Existing conversation id, or the id minted for this exchange.
    pub conversation_id: Uuid,
    pub stream: ReplyStream,
}

impl std::fmt::Debug for AgentReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentReply")
            .field("conversation_id", &self.conversation_id)
            .finish_non_exhaustive()
    }
}

/// External AI-response-generation service.
///
/// Given a user and a message (optionally within an existing conversation),
/// produces a streamed response and persists the exchange into the
/// conversation store. Dropping the stream before completion must leave the
/// conversation state unchanged beyond the already-persisted user message.
pub trait AgentCollaborator: Send + Sync {
    fn generate(
        &self,
        user_id: Uuid,
        conversation_id: Option<Uuid>,
        text: &str,
    ) -> impl std::future::Future<Output = Result<AgentReply, ChatError>> + Send;
}

/// The provider seam inside a collaborator: turns conversation history
/// (ending with the just-appended user message) into a reply stream.
///
/// Real implementations wrap an LLM provider; Confab ships only a
/// deterministic development generator.
pub trait ReplyGenerator: Send + Sync {
    fn reply(&self, history: &[ConversationMessage]) -> Result<ReplyStream, ChatError>;
}
