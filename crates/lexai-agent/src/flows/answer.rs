//! Answer-question flow: one question against one document's text.

use std::sync::LazyLock;

use genai::chat::{ChatMessage, ChatRequest};
use genai::Client;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::prompt::exec_structured;
use crate::error::AgentError;

const SYSTEM_PROMPT: &str =
    "You are an AI assistant helping lawyers find information in legal documents. \
     Provide a concise and relevant answer to the question.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerInput {
    /// The text content of the legal document.
    pub document_text: String,
    /// The question about the document.
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnswerOutput {
    /// The answer to the question.
    pub answer: String,
}

static OUTPUT_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    serde_json::to_value(schema_for!(AnswerOutput)).unwrap_or_else(|_| json!({ "type": "object" }))
});

pub async fn run(
    client: &Client,
    model: &str,
    input: AnswerInput,
) -> Result<AnswerOutput, AgentError> {
    let req = ChatRequest::new(vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Document Text: {}\n\nQuestion: {}\n\nAnswer:",
            input.document_text, input.question,
        )),
    ]);
    exec_structured(client, model, "answer_question", &OUTPUT_SCHEMA, req).await
}
