//! The extract-text route.
//!
//! Accepts a file via multipart/form-data, hands it to the extract flow as
//! base64, and returns the extracted text. No parsing happens server-side;
//! which media types work is the flow's decision. Errors are in-band, with
//! the adapter's detail appended — the failure concerns the caller's own
//! file, so detail helps rather than leaks.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use lexai_agent::{AgentError, DocumentFlows, ExtractInput};
use tracing::{debug, info, warn};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::v1::extract::ExtractResponse;
use crate::state::AppState;

/// What the user sees in front of the adapter's detail.
const EXTRACT_ERROR_PREFIX: &str =
    "An error occurred while extracting text from the file. \
     Please ensure it is a valid document or image.";

#[derive(OpenApi)]
#[openapi(paths(extract), components(schemas(ExtractResponse)))]
pub struct ExtractApi;

/// Generous transport-level cap; the configured per-file limit is enforced
/// in the handler.
const BODY_LIMIT_BYTES: usize = 64 * 1024 * 1024;

/// Register the extract route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/extract", post(extract))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}

/// Extract text from an uploaded file (`POST /v1/extract`).
///
/// Expects one multipart field named `file`. The upload size cap is
/// configurable via `LEXAI_MAX_UPLOAD_SIZE_MB`.
#[utoipa::path(
    post,
    path = "/v1/extract",
    tag = "extract",
    request_body(content = String, description = "File upload (multipart/form-data, field name `file`)"),
    responses(
        (status = 200, description = "Extraction result (text or in-band error)", body = ExtractResponse),
        (status = 400, description = "Malformed upload"),
        (status = 413, description = "File too large"),
    )
)]
pub async fn extract(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, ServerError> {
    let max_bytes = state.config.max_upload_size_mb * 1024 * 1024;

    let mut upload: Option<(Option<String>, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("failed to read multipart field: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(ToOwned::to_owned);
        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(format!("failed to read upload: {e}")))?;
        if bytes.len() > max_bytes {
            return Err(ServerError::BadRequest(format!(
                "file too large ({} bytes); maximum is {max_bytes} bytes",
                bytes.len(),
            )));
        }
        upload = Some((file_name, media_type, bytes.to_vec()));
        break;
    }

    let (file_name, media_type, bytes) = upload
        .ok_or_else(|| ServerError::BadRequest("missing multipart field `file`".to_owned()))?;
    debug!(?file_name, media_type, size = bytes.len(), "extract upload received");

    let input = ExtractInput {
        file_name,
        media_type,
        data_base64: BASE64.encode(&bytes),
    };

    match state.flows.extract(input).await {
        Ok(output) => {
            info!(output_len = output.extracted_text.len(), "extraction done");
            Ok(Json(ExtractResponse {
                extracted_text: Some(output.extracted_text),
                error: None,
            }))
        }
        Err(e) => {
            warn!(error = %e, "extraction failed");
            Ok(Json(ExtractResponse {
                extracted_text: None,
                error: Some(extract_error_message(&e)),
            }))
        }
    }
}

fn extract_error_message(e: &AgentError) -> String {
    format!("{EXTRACT_ERROR_PREFIX} Details: {e}")
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_message_carries_the_adapter_detail() {
        let msg = extract_error_message(&AgentError::UnsupportedMedia("application/pdf".into()));
        assert!(msg.starts_with(EXTRACT_ERROR_PREFIX));
        assert!(msg.contains("application/pdf"));
    }
}
