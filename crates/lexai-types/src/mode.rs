//! Assistant modes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What the user is doing with the assistant in a given chat.
///
/// Stored verbatim on the chat record; the mode does not change the
/// question-answering pipeline, only which surface the client renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Upload documents and interrogate them.
    #[default]
    Review,
    /// Draft a contract with the assistant alongside.
    Write,
    /// Open-ended research against a source document.
    Research,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Review => "review",
            Mode::Write => "write",
            Mode::Research => "research",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "review" => Ok(Mode::Review),
            "write" => Ok(Mode::Write),
            "research" => Ok(Mode::Research),
            other => Err(ParseModeError(other.to_owned())),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown mode: {0:?} (expected review, write, or research)")]
pub struct ParseModeError(String);
