//! Response type for the extract operation (the request is a multipart
//! file upload, documented on the route).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body for `POST /v1/extract`.
///
/// Extraction failures are in-band: `extracted_text` is null and `error`
/// carries the generic prefix plus the adapter's detail (the failure
/// concerns the caller's own file, so detail is useful rather than
/// sensitive).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExtractResponse {
    pub extracted_text: Option<String>,
    pub error: Option<String>,
}
