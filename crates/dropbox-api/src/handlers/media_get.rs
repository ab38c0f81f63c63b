use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use dropbox_core::models::SearchQuery;
use dropbox_core::{search, MediaId, MediaResponse};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/dropbox",
    tag = "dropbox",
    params(SearchQuery),
    responses(
        (status = 200, description = "Library entries in store order", body = Vec<MediaResponse>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let entries = state.library.values().await;
    let found: Vec<MediaResponse> = search(&entries, &query)
        .into_iter()
        .map(MediaResponse::from)
        .collect();

    tracing::debug!(total = entries.len(), matched = found.len(), "Library listed");
    Ok(Json(found))
}

#[utoipa::path(
    get,
    path = "/dropbox/{media}",
    tag = "dropbox",
    params(
        ("media" = String, Path, description = "Media ID")
    ),
    responses(
        (status = 200, description = "Entry found", body = MediaResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_media(
    State(state): State<Arc<AppState>>,
    Path(media): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let entry = super::lookup(&state.library, &MediaId::from(media)).await?;
    Ok(Json(MediaResponse::from(entry)))
}
