//! Deterministic development reply generator.
//!
//! Echoes the latest user message back in word-sized chunks so SSE
//! consumers exercise incremental delivery. This is the default wiring for
//! the `confab serve` binary; a real LLM-backed generator plugs into the
//! same `ReplyGenerator` seam.

use confab_core::agent::{ReplyGenerator, ReplyStream};
use confab_types::error::ChatError;
use confab_types::message::{ConversationMessage, MessageRole};
use futures_util::StreamExt;

pub struct EchoReplyGenerator;

impl ReplyGenerator for EchoReplyGenerator {
    fn reply(&self, history: &[ConversationMessage]) -> Result<ReplyStream, ChatError> {
        let text = history
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let reply = format!("You said: {text}");

        let chunks: Vec<Result<String, ChatError>> = reply
            .split_inclusive(' ')
            .map(|piece| Ok(piece.to_string()))
            .collect();

        Ok(futures_util::stream::iter(chunks).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_echoes_latest_user_message() {
        let conversation_id = Uuid::now_v7();
        let history = vec![
            ConversationMessage::user(conversation_id, "first".to_string()),
            ConversationMessage::assistant(conversation_id, "You said: first".to_string()),
            ConversationMessage::user(conversation_id, "second".to_string()),
        ];

        let stream = EchoReplyGenerator.reply(&history).unwrap();
        let chunks: Vec<String> = stream.map(|c| c.unwrap()).collect::<Vec<_>>().await;
        assert_eq!(chunks.concat(), "You said: second");
        assert!(chunks.len() > 1, "reply should arrive in multiple chunks");
    }
}
