use chrono::{DateTime, Utc};
use lexai_types::Mode;
use uuid::Uuid;

/// A row in the `chats` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Source document for the conversation; mutable, and always the exact
    /// text the answer flow sees for questions in this chat.
    pub document_text: String,
    pub mode: Mode,
    /// Owning user. Anonymous sessions never reach the store, so this is
    /// never empty.
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields the caller supplies when creating a chat; ids and timestamps are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewChat {
    pub title: String,
    pub description: String,
    pub document_text: String,
    pub mode: Mode,
    pub owner_id: String,
}

impl NewChat {
    pub(crate) fn into_session(self) -> ChatSession {
        let now = Utc::now();
        ChatSession {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            description: self.description,
            document_text: self.document_text,
            mode: self.mode,
            owner_id: self.owner_id,
            created_at: now,
            updated_at: now,
        }
    }
}
