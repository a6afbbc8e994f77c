//! Question-answering orchestration.
//!
//! [`answer_question`] is the one sequence the whole product hangs off:
//! validate the submission, generate the answer, generate the follow-up
//! suggestions, persist the exchange when a sink is supplied, shape the
//! reply. Control flow is deliberately flat — each step either produces a
//! value or ends the operation with an in-band error; nothing here panics
//! or lets a provider diagnostic escape to the caller.

use std::borrow::Cow;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AgentError;
use crate::flows::answer::AnswerInput;
use crate::flows::suggest::SuggestInput;
use crate::flows::DocumentFlows;

/// Upper bound on suggestions returned to the caller, however many the
/// model produced.
pub const MAX_SUGGESTIONS: usize = 3;

/// What the user sees when generation fails. The real diagnostic goes to
/// the log, never to the caller.
pub const GENERIC_ANSWER_ERROR: &str =
    "An error occurred while processing your question. Please try again.";

/// A validated ask submission.
///
/// Both text fields reject blank input, where blank includes
/// whitespace-only. Validation runs before any provider or storage call.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AskRequest {
    #[validate(custom(function = document_text_not_blank))]
    pub document_text: String,
    #[validate(custom(function = question_not_blank))]
    pub question: String,
    /// Chat to persist the exchange into; only honored when the caller also
    /// supplies a sink.
    pub chat_id: Option<String>,
}

/// Result of one ask operation. Exactly one of `answer` / `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskReply {
    pub answer: Option<String>,
    pub suggested_questions: Vec<String>,
    pub error: Option<String>,
}

impl AskReply {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            answer: None,
            suggested_questions: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Destination for a completed question/answer exchange.
///
/// Persistence is best-effort relative to the live reply: the orchestrator
/// logs a sink failure and still returns the answer. Implementations must
/// append the user question before the assistant answer so the stored log
/// keeps request/response pairing.
#[async_trait]
pub trait TurnSink: Send + Sync {
    async fn append_turn(
        &self,
        chat_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

fn blank_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("blank");
    err.message = Some(Cow::Borrowed(message));
    err
}

fn document_text_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(blank_error("Document text cannot be empty."));
    }
    Ok(())
}

fn question_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(blank_error("Question cannot be empty."));
    }
    Ok(())
}

/// Flatten field errors into one user-facing string, in field declaration
/// order.
fn validation_messages(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    let mut parts: Vec<String> = Vec::new();
    for field in ["document_text", "question"] {
        if let Some(list) = fields.get(field) {
            for err in list.iter() {
                match &err.message {
                    Some(msg) => parts.push(msg.clone().into_owned()),
                    None => parts.push(format!("{field} is invalid.")),
                }
            }
        }
    }
    parts.join(" ")
}

/// Run the ask pipeline.
///
/// 1. Validate; a failed submission returns field messages and touches no
///    flow.
/// 2. Answer flow; any failure ends the operation with the generic error.
/// 3. Suggestion flow; capped at [`MAX_SUGGESTIONS`], model order kept,
///    duplicates passed through. A failure here is downgraded to an empty
///    list — the answer is already paid for and still useful.
/// 4. With a sink and a chat id, append the `[question, answer]` pair;
///    failures are logged and swallowed.
pub async fn answer_question(
    flows: &dyn DocumentFlows,
    sink: Option<&dyn TurnSink>,
    req: &AskRequest,
) -> AskReply {
    if let Err(errors) = req.validate() {
        return AskReply::failed(validation_messages(&errors));
    }

    let answer = match flows
        .answer(AnswerInput {
            document_text: req.document_text.clone(),
            question: req.question.clone(),
        })
        .await
    {
        Ok(output) => output.answer,
        Err(e) => {
            log_flow_failure("answer", &e);
            return AskReply::failed(GENERIC_ANSWER_ERROR);
        }
    };

    let mut suggested_questions = match flows
        .suggest(SuggestInput {
            document_content: req.document_text.clone(),
            previous_question: req.question.clone(),
        })
        .await
    {
        Ok(output) => output.suggested_questions,
        Err(e) => {
            warn!(error = %e, "suggestion flow failed; returning answer without suggestions");
            Vec::new()
        }
    };
    suggested_questions.truncate(MAX_SUGGESTIONS);

    if let (Some(sink), Some(chat_id)) = (sink, req.chat_id.as_deref()) {
        if let Err(e) = sink.append_turn(chat_id, &req.question, &answer).await {
            warn!(chat_id, error = %e, "failed to persist exchange; reply unaffected");
        }
    }

    AskReply {
        answer: Some(answer),
        suggested_questions,
        error: None,
    }
}

fn log_flow_failure(flow: &str, e: &AgentError) {
    error!(flow, error = %e, "generation flow failed");
}
