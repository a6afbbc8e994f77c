//! The ask-question route.
//!
//! Thin HTTP shell around [`lexai_agent::answer_question`]: resolve the
//! caller's identity, decide whether the exchange persists, advance the
//! anonymous usage gate, and shape the reply. Validation and generation
//! failures travel in-band in the response body — this route answers 200
//! for everything a well-formed HTTP request can produce.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Extension, Json, Router};
use lexai_agent::{answer_question, AskRequest as OrchestratorRequest, TurnSink};
use lexai_types::Identity;
use tracing::warn;
use utoipa::OpenApi;

use crate::entities::SessionStore;
use crate::schemas::v1::ask::{AskRequest, AskResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(ask), components(schemas(AskRequest, AskResponse)))]
pub struct AskApi;

/// Register the ask route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ask", post(ask))
}

/// Ask a question about a document (`POST /v1/ask`).
///
/// For authenticated callers that name a chat they own, the exchange is
/// appended to that chat's log — best-effort: a persistence failure never
/// costs the caller their answer. Anonymous callers advance their usage
/// gate instead; after the configured number of questions the response
/// starts carrying `must_authenticate: true`.
#[utoipa::path(
    post,
    path = "/v1/ask",
    tag = "ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Reply (answer or in-band error)", body = AskResponse),
    )
)]
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<AskRequest>,
) -> Json<AskResponse> {
    // Persist only into a chat the caller actually owns; anything else
    // (missing chat, foreign chat, lookup failure) downgrades to a
    // non-persisted ask rather than failing it.
    let persist_chat = match (identity.owner_id(), req.chat_id.as_deref()) {
        (Some(owner), Some(chat_id)) => match state.store.get_chat(chat_id).await {
            Ok(Some(chat)) if chat.owner_id == owner => Some(chat_id.to_owned()),
            Ok(_) => {
                warn!(chat_id, "ask referenced a chat the caller does not own; not persisting");
                None
            }
            Err(e) => {
                warn!(chat_id, error = %e, "chat lookup failed; not persisting");
                None
            }
        },
        _ => None,
    };

    // Gate bookkeeping mirrors the client rule: a submission with a real
    // question counts, whatever the generation outcome.
    let (questions_remaining, must_authenticate) = match &identity {
        Identity::User { .. } => {
            if let Some(key) = req.client_key.as_deref() {
                state.gates.clear(key);
            }
            (None, false)
        }
        Identity::Anonymous { .. } => match req.client_key.as_deref() {
            Some(key) if !req.question.trim().is_empty() => {
                let status = state
                    .gates
                    .record_question(key, state.config.question_limit);
                (Some(status.questions_remaining), status.must_authenticate)
            }
            _ => (None, false),
        },
    };

    let orchestrator_req = OrchestratorRequest {
        document_text: req.document_text,
        question: req.question,
        chat_id: persist_chat,
    };
    let sink: Option<&dyn TurnSink> = if orchestrator_req.chat_id.is_some() {
        Some(state.store.as_ref())
    } else {
        None
    };

    let reply = answer_question(state.flows.as_ref(), sink, &orchestrator_req).await;

    Json(AskResponse {
        answer: reply.answer,
        suggested_questions: reply.suggested_questions,
        error: reply.error,
        questions_remaining,
        must_authenticate,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::entities::{AnyStore, ChatStore, NewChat};
    use crate::middleware::auth::TokenMap;
    use crate::state::GateRegistry;
    use async_trait::async_trait;
    use lexai_agent::flows::answer::{AnswerInput, AnswerOutput};
    use lexai_agent::flows::extract::{ExtractInput, ExtractOutput};
    use lexai_agent::flows::suggest::{SuggestInput, SuggestOutput};
    use lexai_agent::{AgentError, DocumentFlows};
    use lexai_types::{Mode, Role};

    struct MockFlows {
        answer: String,
        suggestions: Vec<String>,
    }

    impl MockFlows {
        fn new(answer: &str, suggestions: &[&str]) -> Self {
            Self {
                answer: answer.to_owned(),
                suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl DocumentFlows for MockFlows {
        async fn answer(&self, _input: AnswerInput) -> Result<AnswerOutput, AgentError> {
            Ok(AnswerOutput { answer: self.answer.clone() })
        }

        async fn suggest(&self, _input: SuggestInput) -> Result<SuggestOutput, AgentError> {
            Ok(SuggestOutput { suggested_questions: self.suggestions.clone() })
        }

        async fn extract(&self, _input: ExtractInput) -> Result<ExtractOutput, AgentError> {
            unreachable!("extract is not served by this route")
        }
    }

    async fn test_state(flows: MockFlows) -> Arc<AppState> {
        Arc::new(AppState {
            config: Arc::new(crate::config::Config::from_env()),
            store: Arc::new(AnyStore::connect_in_memory().await.unwrap()),
            flows: Arc::new(flows),
            tokens: Arc::new(TokenMap::from_spec("tok-1:u-1")),
            gates: Arc::new(GateRegistry::new()),
        })
    }

    async fn seed_chat(state: &AppState, owner: &str) -> String {
        state
            .store
            .create_chat(NewChat {
                title: "Lease review".into(),
                description: "Quarterly lease check".into(),
                document_text: String::new(),
                mode: Mode::Review,
                owner_id: owner.into(),
            })
            .await
            .unwrap()
            .id
    }

    fn ask_request(chat_id: Option<String>, client_key: Option<String>) -> AskRequest {
        AskRequest {
            document_text: "This agreement expires in 12 months.".into(),
            question: "What is the term of this agreement?".into(),
            chat_id,
            client_key,
        }
    }

    #[tokio::test]
    async fn authenticated_ask_appends_user_then_assistant() {
        let state = test_state(MockFlows::new("12 months.", &["Who are the parties?"])).await;
        let chat_id = seed_chat(&state, "u-1").await;

        let Json(resp) = ask(
            State(state.clone()),
            Extension(Identity::User { user_id: "u-1".into() }),
            Json(ask_request(Some(chat_id.clone()), None)),
        )
        .await;

        assert_eq!(resp.answer.as_deref(), Some("12 months."));
        assert_eq!(resp.error, None);
        assert!(!resp.must_authenticate);

        let messages = state.store.list_messages(&chat_id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "What is the term of this agreement?");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "12 months.");
    }

    #[tokio::test]
    async fn anonymous_ask_never_persists() {
        let state = test_state(MockFlows::new("12 months.", &[])).await;
        let chat_id = seed_chat(&state, "u-1").await;

        let Json(resp) = ask(
            State(state.clone()),
            Extension(Identity::anonymous()),
            Json(ask_request(Some(chat_id.clone()), None)),
        )
        .await;

        assert_eq!(resp.answer.as_deref(), Some("12 months."));
        assert!(state.store.list_messages(&chat_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn foreign_chat_downgrades_to_non_persisted() {
        let state = test_state(MockFlows::new("12 months.", &[])).await;
        let chat_id = seed_chat(&state, "someone-else").await;

        let Json(resp) = ask(
            State(state.clone()),
            Extension(Identity::User { user_id: "u-1".into() }),
            Json(ask_request(Some(chat_id.clone()), None)),
        )
        .await;

        assert_eq!(resp.answer.as_deref(), Some("12 months."));
        assert!(state.store.list_messages(&chat_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn gate_caps_on_the_third_anonymous_question() {
        let state = test_state(MockFlows::new("fine", &[])).await;
        let identity = Identity::Anonymous { client_key: Some("k-1".into()) };

        for expected_must_auth in [false, false, true] {
            let Json(resp) = ask(
                State(state.clone()),
                Extension(identity.clone()),
                Json(ask_request(None, Some("k-1".into()))),
            )
            .await;
            assert_eq!(resp.must_authenticate, expected_must_auth);
        }
    }

    #[tokio::test]
    async fn authenticated_ask_resets_the_anonymous_gate() {
        let state = test_state(MockFlows::new("fine", &[])).await;
        for _ in 0..3 {
            ask(
                State(state.clone()),
                Extension(Identity::anonymous()),
                Json(ask_request(None, Some("k-1".into()))),
            )
            .await;
        }

        // Signing in voids the anonymous counter…
        ask(
            State(state.clone()),
            Extension(Identity::User { user_id: "u-1".into() }),
            Json(ask_request(None, Some("k-1".into()))),
        )
        .await;

        // …so the next anonymous question starts a fresh gate.
        let Json(resp) = ask(
            State(state.clone()),
            Extension(Identity::anonymous()),
            Json(ask_request(None, Some("k-1".into()))),
        )
        .await;
        assert!(!resp.must_authenticate);
        assert_eq!(resp.questions_remaining, Some(2));
    }

    #[tokio::test]
    async fn validation_failure_is_in_band_and_skips_generation() {
        let state = test_state(MockFlows::new("unused", &[])).await;
        let Json(resp) = ask(
            State(state.clone()),
            Extension(Identity::anonymous()),
            Json(AskRequest {
                document_text: "   ".into(),
                question: "What is the term?".into(),
                chat_id: None,
                client_key: None,
            }),
        )
        .await;
        assert_eq!(resp.answer, None);
        assert_eq!(resp.error.as_deref(), Some("Document text cannot be empty."));
    }
}
