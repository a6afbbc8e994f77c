//! Shared execute-and-validate plumbing for the flows.

use genai::chat::{ChatOptions, ChatRequest, ChatResponseFormat, JsonSpec};
use genai::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::AgentError;

/// Execute `req` against `model`, constraining the response to `schema`,
/// and parse the result into `O`.
///
/// The schema is enforced twice: sent to the provider as the required JSON
/// response format, and checked locally against whatever actually came back
/// before deserialization. Providers do occasionally return JSON that is
/// valid but off-schema; catching that here keeps a clean [`AgentError`]
/// boundary instead of a confusing serde failure deeper in.
pub(crate) async fn exec_structured<O: DeserializeOwned>(
    client: &Client,
    model: &str,
    flow: &str,
    schema: &Value,
    req: ChatRequest,
) -> Result<O, AgentError> {
    let options = ChatOptions::default()
        .with_response_format(ChatResponseFormat::JsonSpec(JsonSpec::new(
            flow,
            schema.clone(),
        )));

    let res = client.exec_chat(model, req, Some(&options)).await?;
    let text = res
        .content_text_as_str()
        .ok_or(AgentError::EmptyOutput)?;
    debug!(flow, output_len = text.len(), "flow completed");

    let value: Value = serde_json::from_str(text)?;
    if let Err(e) = jsonschema::validate(schema, &value) {
        return Err(AgentError::SchemaViolation(e.to_string()));
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod test {
    use schemars::{schema_for, JsonSchema};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct Sample {
        answer: String,
    }

    #[test]
    fn derived_schema_accepts_conforming_output() {
        let schema = serde_json::to_value(schema_for!(Sample)).unwrap();
        assert!(jsonschema::validate(&schema, &json!({ "answer": "12 months." })).is_ok());
    }

    #[test]
    fn derived_schema_rejects_wrong_shape() {
        let schema = serde_json::to_value(schema_for!(Sample)).unwrap();
        assert!(jsonschema::validate(&schema, &json!({ "answer": 42 })).is_err());
        assert!(jsonschema::validate(&schema, &json!({})).is_err());
    }
}
