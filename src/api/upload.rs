//! Image upload endpoint (payment proofs, menu and seating images).
//!
//! POST /api/upload - multipart, field `file` → `{ success, url }`

use crate::{
    api::ApiState,
    core::upload::MAX_UPLOAD_BYTES,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
};
use serde::Serialize;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Always true on success
    pub success: bool,
    /// Where the stored file is served
    pub url: String,
}

/// Routes anyone may call.
pub fn public_routes() -> Router<ApiState> {
    Router::new().route(
        "/api/upload",
        post(upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD)),
    )
}

fn multipart_error(error: impl std::fmt::Display) -> Error {
    Error::Upload {
        message: format!("Multipart error: {error}"),
    }
}

async fn upload(State(state): State<ApiState>, mut multipart: Multipart) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(ToString::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;
        let stored = state.uploads.store(file_name.as_deref(), &data).await?;
        return Ok(Json(UploadResponse {
            success: true,
            url: stored.url,
        }));
    }

    Err(Error::Upload {
        message: "No file provided".to_string(),
    })
}
