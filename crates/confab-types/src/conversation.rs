//! Conversation types for Confab.
//!
//! A conversation is a user-owned thread of exchanged messages. Exactly one
//! user owns each conversation; ownership is set at creation and never
//! reassigned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::ConversationMessage;

/// A persisted conversation record.
///
/// `updated_at` advances whenever a message is appended; `created_at` is
/// immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Build a fresh conversation for a user with a v7 id and
    /// `created_at == updated_at == now`.
    pub fn new(user_id: Uuid, title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            title,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The listing projection of a conversation: id, title, and recency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub title: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A conversation with its user-facing messages, as returned by the
/// show operation. Holds only `user` and `assistant` messages in
/// chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDetail {
    pub id: Uuid,
    pub messages: Vec<ConversationMessage>,
}
