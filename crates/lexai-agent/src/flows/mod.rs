//! Prompt-invocation flows.
//!
//! A flow is one boundary call to the generative provider: a fixed prompt,
//! a typed input, and a typed output whose JSON schema is both sent to the
//! provider (as the required response format) and enforced locally on
//! whatever comes back. The three flows are deliberately uniform; the
//! shared execute/validate plumbing lives in [`prompt`].
//!
//! [`DocumentFlows`] is the seam the orchestrator and the server program
//! against. [`GenaiFlows`] is the live implementation; tests substitute
//! their own.

pub mod answer;
pub mod extract;
pub mod prompt;
pub mod suggest;

use async_trait::async_trait;
use genai::Client;

use crate::error::AgentError;
use answer::{AnswerInput, AnswerOutput};
use extract::{ExtractInput, ExtractOutput};
use suggest::{SuggestInput, SuggestOutput};

/// The three generative capabilities the assistant is built on.
#[async_trait]
pub trait DocumentFlows: Send + Sync + 'static {
    /// Answer a question against a document's text.
    async fn answer(&self, input: AnswerInput) -> Result<AnswerOutput, AgentError>;

    /// Suggest follow-up questions given the document and the previous
    /// question.
    async fn suggest(&self, input: SuggestInput) -> Result<SuggestOutput, AgentError>;

    /// Extract plain text from an uploaded file.
    async fn extract(&self, input: ExtractInput) -> Result<ExtractOutput, AgentError>;
}

/// Live flows backed by the multi-provider `genai` client.
///
/// Provider credentials are resolved by the client from the environment;
/// the model name decides which provider is spoken to.
pub struct GenaiFlows {
    client: Client,
    model: String,
}

impl GenaiFlows {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl DocumentFlows for GenaiFlows {
    async fn answer(&self, input: AnswerInput) -> Result<AnswerOutput, AgentError> {
        answer::run(&self.client, &self.model, input).await
    }

    async fn suggest(&self, input: SuggestInput) -> Result<SuggestOutput, AgentError> {
        suggest::run(&self.client, &self.model, input).await
    }

    async fn extract(&self, input: ExtractInput) -> Result<ExtractOutput, AgentError> {
        extract::run(&self.client, &self.model, input).await
    }
}
