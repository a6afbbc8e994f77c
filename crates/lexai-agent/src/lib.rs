//! Agent layer for lexai.
//!
//! Three prompt-invocation flows (answer a question about a document,
//! extract text from an uploaded file, suggest follow-up questions) plus the
//! orchestrator that sequences them for the ask operation. Each flow wraps a
//! single generative call: fixed prompt in, schema-constrained JSON out,
//! validated against the output struct's schema before deserialization.
//!
//! This crate has no database dependency; persistence is reached through the
//! [`orchestrator::TurnSink`] seam so the orchestrator can be tested (and
//! reused) without a server.

pub mod error;
pub mod flows;
pub mod orchestrator;

pub use error::AgentError;
pub use flows::{DocumentFlows, GenaiFlows};
pub use flows::answer::{AnswerInput, AnswerOutput};
pub use flows::extract::{ExtractInput, ExtractOutput};
pub use flows::suggest::{SuggestInput, SuggestOutput};
pub use orchestrator::{answer_question, AskReply, AskRequest, TurnSink, MAX_SUGGESTIONS};
