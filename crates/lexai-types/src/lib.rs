//! Shared domain types for lexai.
//!
//! This crate is I/O-free: it defines the vocabulary the other crates speak
//! (message roles, assistant modes, caller identity) together with the two
//! pure state machines of the system — the anonymous usage gate and the
//! client session. Everything here is plain data plus transitions, so both
//! the server and any embedding client can depend on it without dragging in
//! HTTP or database code.

pub mod gate;
pub mod identity;
pub mod message;
pub mod mode;
pub mod session;

pub use gate::{GateSignal, GateState, UsageGate};
pub use identity::Identity;
pub use message::{ChatMessage, Role, WELCOME_MESSAGE};
pub use mode::Mode;
pub use session::{ClientSession, SessionError};
