use chrono::{DateTime, Utc};
use lexai_types::Role;
use uuid::Uuid;

/// A single message row in the `chat_messages` table.
///
/// Immutable once written; ordered by `created_at` within its chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub chat_id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// New message with a fresh id and a server-assigned timestamp.
    pub fn new(chat_id: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}
