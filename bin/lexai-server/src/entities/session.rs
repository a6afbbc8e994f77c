//! Chat session records.

use std::future::Future;
use std::str::FromStr;

use chrono::Utc;
use lexai_types::{Mode, Role, WELCOME_MESSAGE};

use crate::entities::{
    chat::ChatStore,
    dao::{ChatMessage, ChatSession, NewChat},
    AnyStore,
};

pub trait SessionStore: Send + Sync + 'static {
    /// Create a chat. A non-empty `document_text` seeds exactly one
    /// assistant welcome message; an empty one starts with zero messages.
    fn create_chat(
        &self,
        new: NewChat,
    ) -> impl Future<Output = Result<ChatSession, sqlx::Error>> + Send;

    fn get_chat(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<ChatSession>, sqlx::Error>> + Send;

    /// All chats owned by `owner_id`, most recently created first.
    fn list_chats(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = Result<Vec<ChatSession>, sqlx::Error>> + Send;

    /// Replace the session's document text in place. Message history is
    /// untouched. Returns `false` if no such chat exists.
    fn update_document_text(
        &self,
        id: &str,
        new_text: &str,
    ) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
}

impl SessionStore for AnyStore {
    async fn create_chat(&self, new: NewChat) -> Result<ChatSession, sqlx::Error> {
        let session = new.into_session();
        let created_at = session.created_at.to_rfc3339();
        let updated_at = session.updated_at.to_rfc3339();
        sqlx::query(
            "INSERT INTO chats (id, title, description, document_text, mode, owner_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&session.id)
        .bind(&session.title)
        .bind(&session.description)
        .bind(&session.document_text)
        .bind(session.mode.as_str())
        .bind(&session.owner_id)
        .bind(&created_at)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        if !session.document_text.is_empty() {
            self.append_message(ChatMessage::new(
                session.id.clone(),
                Role::Assistant,
                WELCOME_MESSAGE,
            ))
            .await?;
        }
        Ok(session)
    }

    async fn get_chat(&self, id: &str) -> Result<Option<ChatSession>, sqlx::Error> {
        let row: Option<(String, String, String, String, String, String, String, String)> =
            sqlx::query_as(
                "SELECT id, title, description, document_text, mode, owner_id, created_at, updated_at \
                 FROM chats WHERE id = ?1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(session_from_row).transpose()
    }

    async fn list_chats(&self, owner_id: &str) -> Result<Vec<ChatSession>, sqlx::Error> {
        let rows: Vec<(String, String, String, String, String, String, String, String)> =
            sqlx::query_as(
                "SELECT id, title, description, document_text, mode, owner_id, created_at, updated_at \
                 FROM chats WHERE owner_id = ?1 ORDER BY created_at DESC",
            )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(session_from_row).collect()
    }

    async fn update_document_text(&self, id: &str, new_text: &str) -> Result<bool, sqlx::Error> {
        let updated_at = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE chats SET document_text = ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(new_text)
        .bind(&updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[allow(clippy::type_complexity)]
fn session_from_row(
    (id, title, description, document_text, mode, owner_id, created_at, updated_at): (
        String,
        String,
        String,
        String,
        String,
        String,
        String,
        String,
    ),
) -> Result<ChatSession, sqlx::Error> {
    Ok(ChatSession {
        id,
        title,
        description,
        document_text,
        mode: Mode::from_str(&mode).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        owner_id,
        created_at: created_at.parse().unwrap_or_else(|e: chrono::ParseError| {
            tracing::warn!(raw = %created_at, error = %e, "failed to parse chat created_at; using now");
            Utc::now()
        }),
        updated_at: updated_at.parse().unwrap_or_else(|e: chrono::ParseError| {
            tracing::warn!(raw = %updated_at, error = %e, "failed to parse chat updated_at; using now");
            Utc::now()
        }),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn new_chat(owner: &str, document_text: &str) -> NewChat {
        NewChat {
            title: "Lease review".into(),
            description: "Quarterly lease check".into(),
            document_text: document_text.into(),
            mode: Mode::Review,
            owner_id: owner.into(),
        }
    }

    #[tokio::test]
    async fn chat_with_document_seeds_exactly_one_welcome_message() {
        let store = AnyStore::connect_in_memory().await.unwrap();
        let session = store
            .create_chat(new_chat("u-1", "This agreement expires in 12 months."))
            .await
            .unwrap();
        let messages = store.list_messages(&session.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::Assistant);
        assert_eq!(messages[0].content, WELCOME_MESSAGE);
    }

    #[tokio::test]
    async fn chat_without_document_starts_empty() {
        let store = AnyStore::connect_in_memory().await.unwrap();
        let session = store.create_chat(new_chat("u-1", "")).await.unwrap();
        assert!(store.list_messages(&session.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_returns_owned_chats_newest_first_and_hydratable() {
        let store = AnyStore::connect_in_memory().await.unwrap();
        let first = store.create_chat(new_chat("u-1", "doc one")).await.unwrap();
        // Keep the two creation timestamps distinct.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create_chat(new_chat("u-1", "doc two")).await.unwrap();
        store.create_chat(new_chat("u-2", "not mine")).await.unwrap();

        let chats = store.list_chats("u-1").await.unwrap();
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].id, second.id);
        assert_eq!(chats[1].id, first.id);
        assert_eq!(chats[0].title, "Lease review");
        assert_eq!(chats[0].description, "Quarterly lease check");

        // Each listed chat hydrates with its own history.
        for chat in &chats {
            let messages = store.list_messages(&chat.id).await.unwrap();
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].content, WELCOME_MESSAGE);
        }
    }

    #[tokio::test]
    async fn update_document_text_leaves_history_alone() {
        let store = AnyStore::connect_in_memory().await.unwrap();
        let session = store.create_chat(new_chat("u-1", "old text")).await.unwrap();
        store
            .append_message(ChatMessage::new(&session.id, Role::User, "What changed?"))
            .await
            .unwrap();

        let updated = store
            .update_document_text(&session.id, "new text")
            .await
            .unwrap();
        assert!(updated);

        let reloaded = store.get_chat(&session.id).await.unwrap().unwrap();
        assert_eq!(reloaded.document_text, "new text");
        assert_eq!(store.list_messages(&session.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_of_missing_chat_reports_false() {
        let store = AnyStore::connect_in_memory().await.unwrap();
        assert!(!store.update_document_text("no-such", "text").await.unwrap());
    }

    #[tokio::test]
    async fn get_chat_round_trips_mode_and_owner() {
        let store = AnyStore::connect_in_memory().await.unwrap();
        let mut new = new_chat("u-9", "");
        new.mode = Mode::Research;
        let session = store.create_chat(new).await.unwrap();
        let reloaded = store.get_chat(&session.id).await.unwrap().unwrap();
        assert_eq!(reloaded.mode, Mode::Research);
        assert_eq!(reloaded.owner_id, "u-9");
    }
}
