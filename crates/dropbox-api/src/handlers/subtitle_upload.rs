use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::read_upload_form;
use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use dropbox_core::{AppError, MediaId, MediaResponse};
use std::sync::Arc;

/// Attach a subtitle track. SRT uploads are converted to WebVTT.
#[utoipa::path(
    put,
    path = "/dropbox/{media}/subtitles",
    tag = "dropbox",
    params(("media" = String, Path, description = "Media ID")),
    request_body(content_type = "multipart/form-data", description = "Subtitle file in a `subtitles` (or `file`) part"),
    responses(
        (status = 200, description = "Subtitle attached", body = MediaResponse),
        (status = 400, description = "No subtitle file provided", body = ErrorResponse),
        (status = 401, description = "Invalid password", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 500, description = "Subtitle conversion failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_subtitles(
    State(state): State<Arc<AppState>>,
    Path(media): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = MediaId::from(media);

    if !state.library.contains(&id).await {
        return Err(AppError::NotFound("Media not found".to_string()).into());
    }

    let mut form = read_upload_form(
        multipart,
        state.intake.media_root(),
        &["subtitles", "file"],
    )
    .await?;

    let Some(file) = form.file.take() else {
        return Err(AppError::InvalidInput("No subtitle file provided".to_string()).into());
    };

    let entry = state
        .intake
        .attach_subtitle(&id, &file.path, &file.filename)
        .await?;

    Ok(Json(MediaResponse::from(entry)))
}
