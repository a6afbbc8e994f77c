//! Anonymous usage gate.
//!
//! Unauthenticated callers get a fixed number of questions before the client
//! is told to open the sign-up prompt. The gate is a small state machine:
//!
//! ```text
//! AnonymousUncapped --(question count reaches limit)--> AnonymousCapped
//! any state --(successful authentication)------------->  Authenticated
//! Authenticated --(sign-out, counter replayed)-------->  Anonymous*
//! ```
//!
//! Counter storage is best-effort: the gate itself is in-memory, and a lost
//! counter simply re-enters `AnonymousUncapped` at zero. That is a feature,
//! not a failure mode — the gate is a conversion nudge, not an enforcement
//! boundary.

use serde::{Deserialize, Serialize};

/// Default number of anonymous questions before the gate caps.
pub const DEFAULT_QUESTION_LIMIT: u32 = 3;

/// Current position of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    AnonymousUncapped,
    AnonymousCapped,
    Authenticated,
}

/// What the caller should do after recording a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateSignal {
    /// Carry on; `remaining` questions left before the cap.
    Proceed { remaining: u32 },
    /// The cap was crossed on this question: open the authentication prompt.
    PromptAuthentication,
}

/// Per-client question counter with the threshold baked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageGate {
    state: GateState,
    count: u32,
    limit: u32,
}

impl UsageGate {
    /// Fresh anonymous gate.
    pub fn new(limit: u32) -> Self {
        Self {
            state: GateState::AnonymousUncapped,
            count: 0,
            limit,
        }
    }

    /// Gate restored from a persisted counter (e.g. after a page reload).
    /// A counter already at or past the limit re-enters capped.
    pub fn restored(limit: u32, persisted_count: u32) -> Self {
        let state = if persisted_count >= limit {
            GateState::AnonymousCapped
        } else {
            GateState::AnonymousUncapped
        };
        Self {
            state,
            count: persisted_count,
            limit,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == GateState::Authenticated
    }

    /// True whenever the gate is capped; unlike the [`GateSignal`] returned
    /// by [`record_question`](Self::record_question), which fires once per
    /// crossing, this flag stays up until authentication.
    pub fn must_authenticate(&self) -> bool {
        self.state == GateState::AnonymousCapped
    }

    /// Questions left before the cap; `None` once authenticated (unlimited).
    pub fn questions_remaining(&self) -> Option<u32> {
        match self.state {
            GateState::Authenticated => None,
            _ => Some(self.limit.saturating_sub(self.count)),
        }
    }

    /// Record one user-authored question.
    ///
    /// While authenticated this is a no-op that always proceeds. While
    /// anonymous the counter increments; reaching the limit flips the gate
    /// to capped and signals the prompt. Further questions while capped
    /// keep counting but do not re-signal.
    pub fn record_question(&mut self) -> GateSignal {
        match self.state {
            GateState::Authenticated => GateSignal::Proceed { remaining: 0 },
            GateState::AnonymousCapped => {
                self.count = self.count.saturating_add(1);
                GateSignal::Proceed { remaining: 0 }
            }
            GateState::AnonymousUncapped => {
                self.count = self.count.saturating_add(1);
                if self.count >= self.limit {
                    self.state = GateState::AnonymousCapped;
                    GateSignal::PromptAuthentication
                } else {
                    GateSignal::Proceed {
                        remaining: self.limit - self.count,
                    }
                }
            }
        }
    }

    /// Successful sign-up, login, or federated sign-in from any state.
    pub fn authenticate(&mut self) {
        self.state = GateState::Authenticated;
        self.count = 0;
    }

    /// Sign-out: back to anonymous, replaying the counter the client had
    /// persisted locally (or 0 if none survived).
    pub fn sign_out(&mut self, persisted_count: u32) {
        *self = UsageGate::restored(self.limit, persisted_count);
    }

    /// Reset the counter without changing state. Used when a fresh document
    /// starts a new conversation.
    pub fn reset_counter(&mut self) {
        self.count = 0;
        if self.state == GateState::AnonymousCapped {
            self.state = GateState::AnonymousUncapped;
        }
    }
}

impl Default for UsageGate {
    fn default() -> Self {
        Self::new(DEFAULT_QUESTION_LIMIT)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn caps_exactly_on_third_question() {
        let mut gate = UsageGate::new(3);
        assert_eq!(gate.record_question(), GateSignal::Proceed { remaining: 2 });
        assert_eq!(gate.record_question(), GateSignal::Proceed { remaining: 1 });
        assert_eq!(gate.record_question(), GateSignal::PromptAuthentication);
        assert!(gate.must_authenticate());
    }

    #[test]
    fn prompt_fires_once_per_crossing() {
        let mut gate = UsageGate::new(1);
        assert_eq!(gate.record_question(), GateSignal::PromptAuthentication);
        // Still capped, but the signal does not repeat.
        assert_eq!(gate.record_question(), GateSignal::Proceed { remaining: 0 });
        assert!(gate.must_authenticate());
    }

    #[test]
    fn authentication_resets_counter_at_any_value() {
        for asked in [0, 1, 2, 3, 7] {
            let mut gate = UsageGate::new(3);
            for _ in 0..asked {
                gate.record_question();
            }
            gate.authenticate();
            assert!(gate.is_authenticated());
            assert_eq!(gate.count(), 0);
            assert!(!gate.must_authenticate());
            assert_eq!(gate.questions_remaining(), None);
        }
    }

    #[test]
    fn sign_out_replays_persisted_count() {
        let mut gate = UsageGate::new(3);
        gate.authenticate();
        gate.sign_out(2);
        assert_eq!(gate.state(), GateState::AnonymousUncapped);
        assert_eq!(gate.questions_remaining(), Some(1));

        gate.authenticate();
        gate.sign_out(5);
        assert!(gate.must_authenticate());
    }

    #[test]
    fn lost_counter_restores_uncapped() {
        let gate = UsageGate::restored(3, 0);
        assert_eq!(gate.state(), GateState::AnonymousUncapped);
        assert_eq!(gate.questions_remaining(), Some(3));
    }

    #[test]
    fn questions_while_authenticated_are_not_counted_against_the_gate() {
        let mut gate = UsageGate::new(3);
        gate.authenticate();
        for _ in 0..10 {
            assert_eq!(gate.record_question(), GateSignal::Proceed { remaining: 0 });
        }
        assert_eq!(gate.count(), 0);
    }

    #[test]
    fn reset_counter_uncaps() {
        let mut gate = UsageGate::new(2);
        gate.record_question();
        gate.record_question();
        assert!(gate.must_authenticate());
        gate.reset_counter();
        assert!(!gate.must_authenticate());
        assert_eq!(gate.questions_remaining(), Some(2));
    }
}
