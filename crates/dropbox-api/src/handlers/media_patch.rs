use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use dropbox_core::models::PatchMediaRequest;
use dropbox_core::{apply_patch, AppError, MediaId, MediaResponse};
use std::sync::Arc;

#[utoipa::path(
    patch,
    path = "/dropbox/{media}",
    tag = "dropbox",
    params(("media" = String, Path, description = "Media ID")),
    request_body = PatchMediaRequest,
    responses(
        (status = 200, description = "Entry updated", body = MediaResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Invalid password", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, patch))]
pub async fn patch_media(
    State(state): State<Arc<AppState>>,
    Path(media): Path<String>,
    ValidatedJson(patch): ValidatedJson<PatchMediaRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = MediaId::from(media);

    let updated = state
        .library
        .update(&id, |entry| {
            apply_patch(entry, &patch).map_err(HttpAppError::from)
        })
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

    tracing::info!(media_id = %id, tags = ?updated.tags, "Media updated");
    Ok(Json(MediaResponse::from(updated)))
}
