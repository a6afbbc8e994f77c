//! Agent error type.
//!
//! Every flow returns `Result<_, AgentError>`. The orchestrator and the
//! server log these with full detail but never forward them raw to an end
//! user; the ask path replaces them with a generic message, the extract path
//! appends them to a fixed prefix (the failure concerns the user's own file,
//! so detail is intentionally exposed there).

use thiserror::Error;

/// All errors that can occur inside a prompt flow.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The underlying generative provider call failed.
    #[error("provider error: {0}")]
    Provider(#[from] genai::Error),

    /// The model returned no usable content at all.
    #[error("model returned no content")]
    EmptyOutput,

    /// The model returned content that is not valid JSON.
    #[error("model output is not valid JSON: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    /// The model returned JSON that does not match the flow's output schema.
    #[error("model output failed schema validation: {0}")]
    SchemaViolation(String),

    /// The uploaded payload has a media type no flow can forward.
    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),

    /// The uploaded payload could not be decoded (bad base64, or a text
    /// payload that is not UTF-8).
    #[error("invalid file payload: {0}")]
    InvalidPayload(String),
}
