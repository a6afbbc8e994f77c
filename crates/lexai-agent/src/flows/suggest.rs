//! Suggested-questions flow: follow-ups for the conversation's next turn.
//!
//! The output is transient view-state. The orchestrator truncates it to
//! three entries; this flow passes the model's list through untouched, in
//! the order the model produced it.

use std::sync::LazyLock;

use genai::chat::{ChatMessage, ChatRequest};
use genai::Client;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::prompt::exec_structured;
use crate::error::AgentError;

const SYSTEM_PROMPT: &str =
    "You are an AI assistant helping lawyers explore legal documents more effectively. \
     Given the content of a document and the lawyer's previous question, generate a list \
     of suggested follow-up questions that the lawyer might find useful.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestInput {
    /// The content of the legal document.
    pub document_content: String,
    /// The user's previous question.
    pub previous_question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SuggestOutput {
    /// Suggested follow-up questions, in model order.
    pub suggested_questions: Vec<String>,
}

static OUTPUT_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    serde_json::to_value(schema_for!(SuggestOutput)).unwrap_or_else(|_| json!({ "type": "object" }))
});

pub async fn run(
    client: &Client,
    model: &str,
    input: SuggestInput,
) -> Result<SuggestOutput, AgentError> {
    let req = ChatRequest::new(vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Document Content: {}\n\nPrevious Question: {}\n\nSuggested Follow-up Questions:",
            input.document_content, input.previous_question,
        )),
    ]);
    exec_structured(client, model, "suggest_questions", &OUTPUT_SCHEMA, req).await
}
