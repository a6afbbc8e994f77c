//! Chat persistence routes.
//!
//! Everything here requires a verified identity — anonymous conversations
//! live purely in client state and never reach the store. Unlike the ask
//! path, persistence failures ARE surfaced: persistence is the point of
//! these calls.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use lexai_types::{Identity, Mode};
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

use crate::entities::{ChatStore, NewChat, SessionStore};
use crate::error::ServerError;
use crate::middleware::auth::require_user;
use crate::schemas::v1::chats::{
    ChatResponse, CreateChatRequest, MessageResponse, UpdateDocumentRequest,
    UpdateDocumentResponse,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(create_chat, list_chats, list_chat_messages, update_document),
    components(schemas(
        CreateChatRequest,
        ChatResponse,
        MessageResponse,
        UpdateDocumentRequest,
        UpdateDocumentResponse,
    ))
)]
pub struct ChatsApi;

/// Register chat persistence routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chats", post(create_chat).get(list_chats))
        .route("/chats/{id}/messages", get(list_chat_messages))
        .route("/chats/{id}/document", put(update_document))
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// Create a chat (`POST /v1/chats`).
///
/// A non-empty `document_text` seeds the assistant welcome message, so the
/// returned chat already carries one message.
#[utoipa::path(
    post,
    path = "/v1/chats",
    tag = "chats",
    request_body = CreateChatRequest,
    responses(
        (status = 200, description = "Chat created", body = ChatResponse),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn create_chat(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    let owner = require_user(&identity)?;

    if let Err(errors) = req.validate() {
        return Err(ServerError::BadRequest(flatten_messages(&errors)));
    }
    let mode = match req.mode.as_deref() {
        Some(raw) => Mode::from_str(raw).map_err(|e| ServerError::BadRequest(e.to_string()))?,
        None => Mode::default(),
    };

    let session = state
        .store
        .create_chat(NewChat {
            title: req.title,
            description: req.description,
            document_text: req.document_text.unwrap_or_default(),
            mode,
            owner_id: owner.to_owned(),
        })
        .await?;
    info!(chat_id = %session.id, owner, "chat created");

    let messages = state.store.list_messages(&session.id).await?;
    Ok(Json(session.to_response(
        messages.iter().map(|m| m.to_response()).collect(),
    )))
}

/// List the caller's chats (`GET /v1/chats`), newest first, each hydrated
/// with its full message history in creation order.
#[utoipa::path(
    get,
    path = "/v1/chats",
    tag = "chats",
    responses(
        (status = 200, description = "Chat list", body = Vec<ChatResponse>),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn list_chats(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<ChatResponse>>, ServerError> {
    let owner = require_user(&identity)?;
    let sessions = state.store.list_chats(owner).await?;

    let mut out = Vec::with_capacity(sessions.len());
    for session in sessions {
        let messages = state.store.list_messages(&session.id).await?;
        out.push(session.to_response(messages.iter().map(|m| m.to_response()).collect()));
    }
    Ok(Json(out))
}

/// Message history of one owned chat (`GET /v1/chats/{id}/messages`).
#[utoipa::path(
    get,
    path = "/v1/chats/{id}/messages",
    tag = "chats",
    responses(
        (status = 200, description = "Messages in creation order", body = Vec<MessageResponse>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "No such chat"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn list_chat_messages(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MessageResponse>>, ServerError> {
    let owner = require_user(&identity)?;
    let _session = owned_chat(&state, &id, owner).await?;
    let messages = state.store.list_messages(&id).await?;
    Ok(Json(messages.iter().map(|m| m.to_response()).collect()))
}

/// Replace a chat's document text (`PUT /v1/chats/{id}/document`).
///
/// Message history is untouched; subsequent questions in this chat see the
/// new text.
#[utoipa::path(
    put,
    path = "/v1/chats/{id}/document",
    tag = "chats",
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "Document replaced", body = UpdateDocumentResponse),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "No such chat"),
        (status = 500, description = "Store error"),
    )
)]
pub async fn update_document(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDocumentRequest>,
) -> Result<Json<UpdateDocumentResponse>, ServerError> {
    let owner = require_user(&identity)?;
    let _session = owned_chat(&state, &id, owner).await?;
    let updated = state
        .store
        .update_document_text(&id, &req.document_text)
        .await?;
    Ok(Json(UpdateDocumentResponse { updated }))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Fetch a chat and check ownership. A foreign chat reads as not-found so
/// callers cannot probe for other users' chat ids.
async fn owned_chat(
    state: &AppState,
    chat_id: &str,
    owner: &str,
) -> Result<crate::entities::ChatSession, ServerError> {
    match state.store.get_chat(chat_id).await? {
        Some(session) if session.owner_id == owner => Ok(session),
        _ => Err(ServerError::NotFound(format!("no chat with id {chat_id}"))),
    }
}

fn flatten_messages(errors: &validator::ValidationErrors) -> String {
    let fields = errors.field_errors();
    let mut parts: Vec<String> = Vec::new();
    for field in ["title", "description"] {
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

// ── Tests ──────────────────────────────────────────────────────────────────────
