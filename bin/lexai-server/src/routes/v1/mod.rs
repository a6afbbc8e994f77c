pub mod ask;
pub mod chats;
pub mod extract;

use crate::state::AppState;
use utoipa::OpenApi;

use axum::Router;
use std::sync::Arc;

/// Routes nested under `/v1`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(ask::router())
        .merge(chats::router())
        .merge(extract::router())
}

#[derive(OpenApi)]
#[openapi()]
pub struct V1Api;

pub fn api_docs() -> utoipa::openapi::OpenApi {
    let mut spec = V1Api::openapi();
    spec.merge(ask::AskApi::openapi());
    spec.merge(chats::ChatsApi::openapi());
    spec.merge(extract::ExtractApi::openapi());
    spec
}
