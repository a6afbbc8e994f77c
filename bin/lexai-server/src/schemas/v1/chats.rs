//! Request / response types for chat persistence operations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::entities::{ChatMessage, ChatSession};

/// Request body for `POST /v1/chats`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateChatRequest {
    #[validate(custom(function = title_not_blank))]
    pub title: String,
    #[validate(custom(function = description_not_blank))]
    pub description: String,
    /// Optional seed document; when present and non-empty, the chat starts
    /// with the assistant welcome message.
    #[serde(default)]
    pub document_text: Option<String>,
    /// `review`, `write`, or `research`; defaults to `review`.
    #[serde(default)]
    pub mode: Option<String>,
}

fn title_not_blank(value: &str) -> Result<(), ValidationError> {
    not_blank(value, "Title cannot be empty.")
}

fn description_not_blank(value: &str) -> Result<(), ValidationError> {
    not_blank(value, "Description cannot be empty.")
}

fn not_blank(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(std::borrow::Cow::Borrowed(message));
        return Err(err);
    }
    Ok(())
}

/// Request body for `PUT /v1/chats/{id}/document`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateDocumentRequest {
    pub document_text: String,
}

/// Response body for `PUT /v1/chats/{id}/document`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateDocumentResponse {
    pub updated: bool,
}

/// One persisted message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: String,
    pub chat_id: String,
    pub role: String,
    pub content: String,
    pub created_at: String,
}

/// One chat session, hydrated with its message history.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub document_text: String,
    pub mode: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
    /// Full history in creation order.
    pub messages: Vec<MessageResponse>,
}

impl ChatSession {
    pub fn to_response(&self, messages: Vec<MessageResponse>) -> ChatResponse {
        ChatResponse {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            document_text: self.document_text.clone(),
            mode: self.mode.as_str().to_owned(),
            owner_id: self.owner_id.clone(),
            created_at: self.created_at.to_rfc3339(),
            updated_at: self.updated_at.to_rfc3339(),
            messages,
        }
    }
}

impl ChatMessage {
    pub fn to_response(&self) -> MessageResponse {
        MessageResponse {
            id: self.id.clone(),
            chat_id: self.chat_id.clone(),
            role: self.role.as_str().to_owned(),
            content: self.content.clone(),
            created_at: self.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blank_title_and_description_are_rejected() {
        let req = CreateChatRequest {
            title: "  ".into(),
            description: String::new(),
            document_text: None,
            mode: None,
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
    }

    #[test]
    fn populated_request_validates() {
        let req = CreateChatRequest {
            title: "Lease review".into(),
            description: "Quarterly lease check".into(),
            document_text: Some("This agreement expires in 12 months.".into()),
            mode: Some("review".into()),
        };
        assert!(req.validate().is_ok());
    }
}
