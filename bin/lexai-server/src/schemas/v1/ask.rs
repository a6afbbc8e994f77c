//! Request / response types for the ask operation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /v1/ask`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AskRequest {
    /// The document the question is about. Required, non-blank.
    pub document_text: String,
    /// The question. Required, non-blank.
    pub question: String,
    /// Chat to persist the exchange into. Only honored for authenticated
    /// callers that own the chat.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub chat_id: Option<String>,
    /// Anonymous usage-gate key, chosen and persisted by the client.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub client_key: Option<String>,
}

/// Response body for `POST /v1/ask`.
///
/// Validation and generation failures are carried in `error` with HTTP 200;
/// exactly one of `answer` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AskResponse {
    pub answer: Option<String>,
    /// At most three follow-up suggestions, in model order.
    pub suggested_questions: Vec<String>,
    pub error: Option<String>,
    /// Anonymous questions left before the gate caps; absent for
    /// authenticated callers and for anonymous callers without a client key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_remaining: Option<u32>,
    /// True while the caller's gate is capped: the client should open the
    /// authentication prompt.
    pub must_authenticate: bool,
}
