//! Availability endpoints. Every entry is playable as soon as it exists, so
//! these answer with constants once the id resolves.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use dropbox_core::MediaId;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Always `available`
    pub status: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressResponse {
    /// Percent complete; always 100
    pub progress: u8,
}

#[utoipa::path(
    get,
    path = "/dropbox/{media}/status",
    tag = "dropbox",
    params(("media" = String, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media is available", body = StatusResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    )
)]
pub async fn media_status(
    State(state): State<Arc<AppState>>,
    Path(media): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    super::lookup(&state.library, &MediaId::from(media)).await?;
    Ok(Json(StatusResponse {
        status: "available",
    }))
}

#[utoipa::path(
    get,
    path = "/dropbox/{media}/progress",
    tag = "dropbox",
    params(("media" = String, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Processing progress", body = ProgressResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    )
)]
pub async fn media_progress(
    State(state): State<Arc<AppState>>,
    Path(media): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    super::lookup(&state.library, &MediaId::from(media)).await?;
    Ok(Json(ProgressResponse { progress: 100 }))
}

#[utoipa::path(
    post,
    path = "/dropbox/{media}/request",
    tag = "dropbox",
    params(("media" = String, Path, description = "Media ID")),
    responses(
        (status = 202, description = "Request accepted"),
        (status = 404, description = "Media not found", body = ErrorResponse)
    )
)]
pub async fn media_request(
    State(state): State<Arc<AppState>>,
    Path(media): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = MediaId::from(media);
    super::lookup(&state.library, &id).await?;
    tracing::debug!(media_id = %id, "Playback request accepted");
    Ok(StatusCode::ACCEPTED)
}
