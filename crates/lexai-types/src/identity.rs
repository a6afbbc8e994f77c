//! Caller identity.
//!
//! Identity is an explicit value threaded through every operation that needs
//! it, never ambient process state. The server's auth middleware resolves a
//! bearer token into an [`Identity`] and attaches it to the request; handlers
//! read it from there.

use serde::{Deserialize, Serialize};

/// Who is making a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Identity {
    /// No verified identity. `client_key` is the caller's self-chosen key
    /// for the anonymous usage gate, persisted client-side so the counter
    /// survives reloads.
    Anonymous { client_key: Option<String> },
    /// A verified user.
    User { user_id: String },
}

impl Identity {
    pub fn anonymous() -> Self {
        Identity::Anonymous { client_key: None }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::User { .. })
    }

    /// Owner id for persistence calls; `None` for anonymous callers, which
    /// the persistence gateway refuses.
    pub fn owner_id(&self) -> Option<&str> {
        match self {
            Identity::User { user_id } => Some(user_id),
            Identity::Anonymous { .. } => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn anonymous_has_no_owner() {
        assert!(!Identity::anonymous().is_authenticated());
        assert_eq!(Identity::anonymous().owner_id(), None);
    }

    #[test]
    fn user_owner_id_matches() {
        let id = Identity::User { user_id: "u-1".into() };
        assert!(id.is_authenticated());
        assert_eq!(id.owner_id(), Some("u-1"));
    }
}
