use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use dropbox_core::models::SearchQuery;
use dropbox_core::{search, AppError, MediaId, MediaResponse};
use std::sync::Arc;

/// Remove an entry and return the remaining library, filtered like `GET /dropbox`.
#[utoipa::path(
    delete,
    path = "/dropbox/{media}",
    tag = "dropbox",
    params(
        ("media" = String, Path, description = "Media ID"),
        SearchQuery
    ),
    responses(
        (status = 200, description = "Entry removed; remaining entries", body = Vec<MediaResponse>),
        (status = 401, description = "Invalid password", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(operation = "delete_media"))]
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    Path(media): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = MediaId::from(media);

    state
        .intake
        .remove(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

    let entries = state.library.values().await;
    let remaining: Vec<MediaResponse> = search(&entries, &query)
        .into_iter()
        .map(MediaResponse::from)
        .collect();

    Ok(Json(remaining))
}
