//! Message types for Confab conversations.
//!
//! A message belongs to exactly one conversation and is append-only:
//! once persisted, a row is never updated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Role of a message within a conversation.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('system', 'user', 'assistant'))`
///
/// `System` rows may exist in storage but are excluded from user-facing
/// reads; only `User` and `Assistant` messages surface to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message within a conversation.
///
/// Messages are ordered by `created_at` (ascending) within a conversation;
/// the v7 message id acts as a tiebreaker for same-instant rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    /// Text payload; non-empty for every persisted row.
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationMessage {
    /// Build a user message with a fresh v7 id, timestamped now.
    pub fn user(conversation_id: Uuid, content: String) -> Self {
        Self::new(conversation_id, MessageRole::User, content)
    }

    /// Build an assistant message with a fresh v7 id, timestamped now.
    pub fn assistant(conversation_id: Uuid, content: String) -> Self {
        Self::new(conversation_id, MessageRole::Assistant, content)
    }

    fn new(conversation_id: Uuid, role: MessageRole, content: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            conversation_id,
            role,
            content,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [
            MessageRole::System,
            MessageRole::User,
            MessageRole::Assistant,
        ] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_serde() {
        let role = MessageRole::Assistant;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_message_role_rejects_unknown() {
        let err = "moderator".parse::<MessageRole>().unwrap_err();
        assert!(err.contains("moderator"));
    }

    #[test]
    fn test_message_constructors() {
        let conversation_id = Uuid::now_v7();
        let user = ConversationMessage::user(conversation_id, "Hello".to_string());
        assert_eq!(user.role, MessageRole::User);
        assert_eq!(user.conversation_id, conversation_id);

        let assistant =
            ConversationMessage::assistant(conversation_id, "Hi there!".to_string());
        assert_eq!(assistant.role, MessageRole::Assistant);
        assert!(assistant.id != user.id);
    }
}
