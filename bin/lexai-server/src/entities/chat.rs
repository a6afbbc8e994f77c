//! Append-only message log.

use std::future::Future;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use lexai_agent::TurnSink;
use lexai_types::Role;

use crate::entities::{dao::ChatMessage, AnyStore};

pub trait ChatStore: Send + Sync + 'static {
    /// Append one message. No update or delete exists by design.
    fn append_message(
        &self,
        msg: ChatMessage,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// All messages of a chat in creation order.
    fn list_messages(
        &self,
        chat_id: &str,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, sqlx::Error>> + Send;
}

impl ChatStore for AnyStore {
    async fn append_message(&self, msg: ChatMessage) -> Result<(), sqlx::Error> {
        let created_at = msg.created_at.to_rfc3339();
        sqlx::query(
            "INSERT INTO chat_messages (id, chat_id, role, content, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&msg.id)
        .bind(&msg.chat_id)
        .bind(msg.role.as_str())
        .bind(&msg.content)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT id, chat_id, role, content, created_at \
             FROM chat_messages WHERE chat_id = ?1 ORDER BY created_at ASC",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|(id, chat_id, role, content, created_at)| {
                Ok(ChatMessage {
                    id,
                    chat_id,
                    role: Role::from_str(&role).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
                    content,
                    created_at: created_at.parse().unwrap_or_else(|e: chrono::ParseError| {
                        tracing::warn!(raw = %created_at, error = %e, "failed to parse message created_at; using now");
                        Utc::now()
                    }),
                })
            })
            .collect()
    }
}

/// The orchestrator's persistence seam: one completed exchange becomes two
/// appended messages, user question first, assistant answer second.
#[async_trait]
impl TurnSink for AnyStore {
    async fn append_turn(
        &self,
        chat_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.append_message(ChatMessage::new(chat_id, Role::User, question))
            .await?;
        self.append_message(ChatMessage::new(chat_id, Role::Assistant, answer))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn messages_come_back_in_creation_order() {
        let store = AnyStore::connect_in_memory().await.unwrap();
        for (role, content) in [
            (Role::User, "What is the term?"),
            (Role::Assistant, "12 months."),
            (Role::User, "Who are the parties?"),
        ] {
            store
                .append_message(ChatMessage::new("chat-1", role, content))
                .await
                .unwrap();
        }
        let messages = store.list_messages("chat-1").await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, "What is the term?");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[2].content, "Who are the parties?");
    }

    #[tokio::test]
    async fn messages_are_scoped_to_their_chat() {
        let store = AnyStore::connect_in_memory().await.unwrap();
        store
            .append_message(ChatMessage::new("chat-a", Role::User, "a"))
            .await
            .unwrap();
        store
            .append_message(ChatMessage::new("chat-b", Role::User, "b"))
            .await
            .unwrap();
        let messages = store.list_messages("chat-a").await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "a");
    }

    #[tokio::test]
    async fn append_turn_writes_user_then_assistant() {
        let store = AnyStore::connect_in_memory().await.unwrap();
        store
            .append_turn("chat-1", "What is the term?", "12 months.")
            .await
            .unwrap();
        let messages = store.list_messages("chat-1").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "What is the term?");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "12 months.");
    }
}
