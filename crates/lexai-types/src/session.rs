//! Client session state machine.
//!
//! Mediates between user input events and the ask pipeline: it owns the
//! active chat, the ordered message list, the current mode, and the
//! transient suggested questions, plus the anonymous usage gate.
//!
//! Two rules are enforced here rather than left to UI accident:
//!
//! - At most one question may be in flight per session. A second submission
//!   while one is outstanding is rejected with
//!   [`SessionError::RequestInFlight`] instead of producing interleaved or
//!   duplicate turns.
//! - Suggested questions are view-state, not domain state. They are replaced
//!   wholesale after every answered question and cleared the moment a new
//!   question is submitted; they are never persisted.

use crate::gate::{GateSignal, UsageGate};
use crate::message::{ChatMessage, Role, WELCOME_MESSAGE};
use crate::mode::Mode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A question was submitted while a previous one is still outstanding.
    #[error("a question is already in flight; wait for the reply")]
    RequestInFlight,
    /// A question was submitted with no document loaded.
    #[error("no document loaded")]
    NoDocument,
}

/// Live state of one client conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSession {
    mode: Mode,
    /// Server chat id once the session is persisted; `None` while the
    /// conversation is local-only (anonymous).
    active_chat: Option<String>,
    document_text: String,
    messages: Vec<ChatMessage>,
    suggested_questions: Vec<String>,
    gate: UsageGate,
    in_flight: bool,
}

impl ClientSession {
    pub fn new(mode: Mode, gate: UsageGate) -> Self {
        Self {
            mode,
            active_chat: None,
            document_text: String::new(),
            messages: Vec::new(),
            suggested_questions: Vec::new(),
            gate,
            in_flight: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn active_chat(&self) -> Option<&str> {
        self.active_chat.as_deref()
    }

    pub fn document_text(&self) -> &str {
        &self.document_text
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn suggested_questions(&self) -> &[String] {
        &self.suggested_questions
    }

    pub fn gate(&self) -> &UsageGate {
        &self.gate
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Bind this session to a persisted server chat.
    pub fn attach_chat(&mut self, chat_id: impl Into<String>) {
        self.active_chat = Some(chat_id.into());
    }

    /// Load (or replace) the source document.
    ///
    /// A non-empty document starts a fresh conversation seeded with the
    /// welcome message; an empty one clears the conversation entirely.
    /// Either way the suggestions vanish and the question counter restarts.
    pub fn load_document(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.document_text {
            return;
        }
        self.document_text = text;
        self.messages.clear();
        if !self.document_text.is_empty() {
            self.messages
                .push(ChatMessage::new(Role::Assistant, WELCOME_MESSAGE));
        }
        self.suggested_questions.clear();
        self.gate.reset_counter();
    }

    /// Submit a question: appends the user message, clears the suggestions,
    /// marks the session in flight, and advances the gate.
    ///
    /// Refuses while another question is outstanding — the documented
    /// double-submit policy is "reject", not "queue" or "duplicate".
    pub fn begin_question(&mut self, question: &str) -> Result<GateSignal, SessionError> {
        if self.in_flight {
            return Err(SessionError::RequestInFlight);
        }
        if self.document_text.is_empty() {
            return Err(SessionError::NoDocument);
        }
        self.messages.push(ChatMessage::new(Role::User, question));
        self.suggested_questions.clear();
        self.in_flight = true;
        Ok(self.gate.record_question())
    }

    /// Apply a successful reply: assistant message appended, suggestions
    /// replaced wholesale.
    pub fn apply_answer(&mut self, answer: &str, suggestions: Vec<String>) {
        self.messages.push(ChatMessage::new(Role::Assistant, answer));
        self.suggested_questions = suggestions;
        self.in_flight = false;
    }

    /// Apply a failed ask: the error text becomes an assistant message (the
    /// conversation shows what happened) and the suggestions are cleared.
    pub fn apply_error(&mut self, message: &str) {
        self.messages.push(ChatMessage::new(Role::Assistant, message));
        self.suggested_questions.clear();
        self.in_flight = false;
    }

    /// Successful authentication of any kind.
    pub fn sign_in(&mut self) {
        self.gate.authenticate();
    }

    /// Sign-out; `persisted_count` is whatever the client still has stored
    /// locally (0 if nothing survived).
    pub fn sign_out(&mut self, persisted_count: u32) {
        self.gate.sign_out(persisted_count);
        self.active_chat = None;
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new(Mode::default(), UsageGate::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gate::GateState;

    fn session_with_document() -> ClientSession {
        let mut s = ClientSession::default();
        s.load_document("This agreement expires in 12 months.");
        s
    }

    #[test]
    fn loading_a_document_seeds_the_welcome_message() {
        let s = session_with_document();
        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.messages()[0].role, Role::Assistant);
        assert_eq!(s.messages()[0].content, WELCOME_MESSAGE);
    }

    #[test]
    fn clearing_the_document_clears_the_conversation() {
        let mut s = session_with_document();
        s.load_document("");
        assert!(s.messages().is_empty());
        assert!(s.suggested_questions().is_empty());
    }

    #[test]
    fn reloading_the_same_document_is_a_no_op() {
        let mut s = session_with_document();
        s.begin_question("What is the term?").unwrap();
        s.apply_answer("12 months.", vec!["Who are the parties?".into()]);
        let before = s.messages().len();
        s.load_document("This agreement expires in 12 months.");
        assert_eq!(s.messages().len(), before);
        assert_eq!(s.suggested_questions().len(), 1);
    }

    #[test]
    fn second_submission_while_in_flight_is_rejected() {
        let mut s = session_with_document();
        s.begin_question("first").unwrap();
        assert_eq!(
            s.begin_question("second"),
            Err(SessionError::RequestInFlight)
        );
        // Only the welcome message and the first question made it in.
        assert_eq!(s.messages().len(), 2);
    }

    #[test]
    fn question_without_document_is_rejected() {
        let mut s = ClientSession::default();
        assert_eq!(s.begin_question("hello"), Err(SessionError::NoDocument));
    }

    #[test]
    fn answer_replaces_suggestions_and_clears_in_flight() {
        let mut s = session_with_document();
        s.begin_question("What is the term?").unwrap();
        s.apply_answer("12 months.", vec!["Who are the parties?".into()]);
        assert!(!s.is_in_flight());
        assert_eq!(s.suggested_questions(), ["Who are the parties?"]);

        s.begin_question("Who are the parties?").unwrap();
        // Suggestions vanish as soon as the next question is asked.
        assert!(s.suggested_questions().is_empty());
    }

    #[test]
    fn error_becomes_an_assistant_message() {
        let mut s = session_with_document();
        s.begin_question("What is the term?").unwrap();
        s.apply_error("An error occurred while processing your question. Please try again.");
        let last = s.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert!(last.content.starts_with("An error occurred"));
        assert!(!s.is_in_flight());
    }

    #[test]
    fn gate_advances_with_each_question() {
        let mut s = session_with_document();
        for expect_prompt in [false, false, true] {
            let signal = s.begin_question("q").unwrap();
            assert_eq!(signal == GateSignal::PromptAuthentication, expect_prompt);
            s.apply_answer("a", Vec::new());
        }
        assert_eq!(s.gate().state(), GateState::AnonymousCapped);
    }

    #[test]
    fn sign_in_lifts_the_gate_and_sign_out_restores_it() {
        let mut s = session_with_document();
        for _ in 0..3 {
            s.begin_question("q").unwrap();
            s.apply_answer("a", Vec::new());
        }
        assert!(s.gate().must_authenticate());
        s.sign_in();
        assert!(s.gate().is_authenticated());
        s.sign_out(3);
        assert!(s.gate().must_authenticate());
    }
}
