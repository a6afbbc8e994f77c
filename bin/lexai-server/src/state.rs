//! Shared application state injected into every Axum handler.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lexai_agent::DocumentFlows;
use lexai_types::{GateSignal, UsageGate};

use crate::config::Config;
use crate::entities::AnyStore;
use crate::middleware::auth::TokenMap;

/// Snapshot of one client's gate after recording a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateStatus {
    pub questions_remaining: u32,
    pub must_authenticate: bool,
    /// True exactly when this question crossed the cap.
    pub prompt_authentication: bool,
}

/// Tracks anonymous usage gates, keyed by the caller's client key.
///
/// In-memory only: losing this map merely uncaps the affected gates, which
/// the design accepts. The client-persisted counter re-seeds it on the next
/// question.
pub struct GateRegistry {
    gates: Mutex<HashMap<String, UsageGate>>,
}

impl std::fmt::Debug for GateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.gates.lock().map(|g| g.len()).unwrap_or(0);
        write!(f, "GateRegistry({count} gates)")
    }
}

impl GateRegistry {
    pub fn new() -> Self {
        Self {
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Record one anonymous question for `client_key` and report where the
    /// gate stands.
    pub fn record_question(&self, client_key: &str, limit: u32) -> GateStatus {
        let mut gates = match self.gates.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let gate = gates
            .entry(client_key.to_owned())
            .or_insert_with(|| UsageGate::new(limit));
        let signal = gate.record_question();
        GateStatus {
            questions_remaining: gate.questions_remaining().unwrap_or(0),
            must_authenticate: gate.must_authenticate(),
            prompt_authentication: signal == GateSignal::PromptAuthentication,
        }
    }

    /// Drop the gate for `client_key` — the identity behind it
    /// authenticated, so the anonymous counter is void.
    pub fn clear(&self, client_key: &str) {
        let mut gates = match self.gates.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        gates.remove(client_key);
    }
}

impl Default for GateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Persistent chat / message store.
    pub store: Arc<AnyStore>,
    /// Generative flows (live genai client in production, mocks in tests).
    pub flows: Arc<dyn DocumentFlows>,
    /// Bearer-token → user table for the auth middleware.
    pub tokens: Arc<TokenMap>,
    /// Anonymous usage gates.
    pub gates: Arc<GateRegistry>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("gates", &self.gates)
            .finish_non_exhaustive()
    }
}
