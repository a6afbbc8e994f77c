//! Identity middleware.
//!
//! Resolves the `Authorization: Bearer` header into an explicit
//! [`Identity`] attached to the request extensions — identity is a value
//! handlers read, never ambient state they look up. No header means
//! anonymous; a token the verifier does not know is a hard 401 (a caller
//! who presented credentials deserves to learn they were wrong, not to be
//! silently downgraded).
//!
//! The default verifier is a static `token:user_id` table from
//! configuration. Credential validation proper belongs to an external
//! identity provider; this table is the seam where one plugs in.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use lexai_types::Identity;

use crate::state::AppState;

/// Bearer-token → user-id table.
#[derive(Debug, Clone, Default)]
pub struct TokenMap {
    tokens: HashMap<String, String>,
}

impl TokenMap {
    /// Parse a `token:user_id,token:user_id` spec. Entries without a colon
    /// or with an empty side are skipped.
    pub fn from_spec(spec: &str) -> Self {
        let tokens = spec
            .split(',')
            .filter_map(|entry| {
                let (token, user) = entry.trim().split_once(':')?;
                if token.is_empty() || user.is_empty() {
                    return None;
                }
                Some((token.to_owned(), user.to_owned()))
            })
            .collect();
        Self { tokens }
    }

    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.tokens.get(token).map(String::as_str)
    }
}

/// Attach the caller's [`Identity`] to the request.
pub async fn identity_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let identity = match bearer {
        Some(token) => match state.tokens.resolve(token) {
            Some(user_id) => Identity::User {
                user_id: user_id.to_owned(),
            },
            None => {
                return (
                    StatusCode::UNAUTHORIZED,
                    axum::Json(serde_json::json!({ "error": "invalid bearer token" })),
                )
                    .into_response();
            }
        },
        None => Identity::anonymous(),
    };

    req.extensions_mut().insert(identity);
    next.run(req).await
}

/// Handlers that persist call this to turn an anonymous caller into a 401
/// before any store access.
pub fn require_user(identity: &Identity) -> Result<&str, crate::error::ServerError> {
    identity.owner_id().ok_or_else(|| {
        crate::error::ServerError::Unauthorized("sign in to use chat persistence".to_owned())
    })
}
