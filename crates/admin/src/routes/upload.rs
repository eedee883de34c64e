//! Product image upload handler.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::UploadError;
use crate::state::AppState;

/// Multipart field names accepted for the image.
const IMAGE_FIELDS: [&str; 2] = ["image", "file"];

/// Upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Path to store as the product's `image_url`.
    pub url: String,
}

/// Accept one image from a multipart form (field `image` or `file`).
///
/// Other fields are ignored. The body is read in chunks and rejected as
/// soon as it passes the size cap.
#[instrument(skip(state, admin, multipart), fields(admin_id = %admin.id))]
pub async fn upload(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut multipart = multipart.map_err(|e| UploadError::Multipart(e.body_text()))?;
    let store = state.uploads();
    let malformed = |e: axum::extract::multipart::MultipartError| {
        UploadError::Multipart(e.body_text())
    };

    while let Some(mut field) = multipart.next_field().await.map_err(malformed)? {
        if !field.name().is_some_and(|n| IMAGE_FIELDS.contains(&n)) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(malformed)? {
            if bytes.len() + chunk.len() > store.max_bytes() {
                return Err(UploadError::TooLarge {
                    limit: store.max_bytes(),
                }
                .into());
            }
            bytes.extend_from_slice(&chunk);
        }

        let url = store.save(&content_type, &bytes).await?;
        return Ok((StatusCode::CREATED, Json(UploadResponse { url })));
    }

    Err(UploadError::MissingFile.into())
}
