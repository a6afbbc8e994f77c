//! Extract-text flow: turn an uploaded file into plain text.
//!
//! No local parsing happens here. Images are forwarded to the provider as
//! inline base64 parts; textual payloads (plain text, JSON, XML, …) are
//! decoded and passed through the same extraction prompt so the model
//! normalizes them the way it does everything else. Binary document formats
//! the provider cannot take inline are refused with a clear error.

use std::sync::LazyLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use genai::chat::{ChatMessage, ChatRequest, ContentPart};
use genai::Client;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::prompt::exec_structured;
use crate::error::AgentError;

const EXTRACT_PROMPT: &str = "Extract all the text from the following file.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractInput {
    /// Original file name, if the caller had one. Diagnostic only.
    pub file_name: Option<String>,
    /// Declared media type, e.g. `image/png` or `text/plain`.
    pub media_type: String,
    /// File content, base64-encoded.
    pub data_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractOutput {
    /// The extracted text from the file.
    pub extracted_text: String,
}

static OUTPUT_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    serde_json::to_value(schema_for!(ExtractOutput)).unwrap_or_else(|_| json!({ "type": "object" }))
});

/// Media types forwarded as decoded text rather than as binary parts.
fn is_textual(media_type: &str) -> bool {
    media_type.starts_with("text/")
        || matches!(
            media_type,
            "application/json" | "application/xml" | "application/x-yaml"
        )
}

pub async fn run(
    client: &Client,
    model: &str,
    input: ExtractInput,
) -> Result<ExtractOutput, AgentError> {
    let user_message = if input.media_type.starts_with("image/") {
        ChatMessage::user(vec![
            ContentPart::from_text(EXTRACT_PROMPT),
            ContentPart::from_binary_base64(input.media_type.clone(), input.data_base64, None),
        ])
    } else if is_textual(&input.media_type) {
        let bytes = BASE64
            .decode(input.data_base64.as_bytes())
            .map_err(|e| AgentError::InvalidPayload(e.to_string()))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| AgentError::InvalidPayload(e.to_string()))?;
        ChatMessage::user(format!("{EXTRACT_PROMPT}\n\nFile:\n{text}"))
    } else {
        return Err(AgentError::UnsupportedMedia(input.media_type));
    };

    let req = ChatRequest::new(vec![user_message]);
    exec_structured(client, model, "extract_text", &OUTPUT_SCHEMA, req).await
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn textual_media_types_are_recognised() {
        assert!(is_textual("text/plain"));
        assert!(is_textual("text/markdown"));
        assert!(is_textual("application/json"));
        assert!(!is_textual("application/pdf"));
        assert!(!is_textual("image/png"));
    }

    #[tokio::test]
    async fn unsupported_media_is_refused_before_any_provider_call() {
        let client = Client::default();
        let err = run(
            &client,
            "test-model",
            ExtractInput {
                file_name: Some("contract.docx".into()),
                media_type:
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                        .into(),
                data_base64: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AgentError::UnsupportedMedia(_)));
    }

    #[tokio::test]
    async fn bad_base64_in_text_payload_is_an_invalid_payload() {
        let client = Client::default();
        let err = run(
            &client,
            "test-model",
            ExtractInput {
                file_name: None,
                media_type: "text/plain".into(),
                data_base64: "not-base64!!!".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AgentError::InvalidPayload(_)));
    }
}
