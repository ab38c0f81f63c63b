use crate::state::UploadLimits;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct LimitResponse {
    /// Maximum accepted upload size in bytes
    pub limit: usize,
}

#[utoipa::path(
    get,
    path = "/dropbox-limit",
    tag = "dropbox",
    responses(
        (status = 200, description = "Upload size limit", body = LimitResponse)
    )
)]
pub async fn upload_limit(State(limits): State<UploadLimits>) -> impl IntoResponse {
    Json(LimitResponse {
        limit: limits.max_upload_size_bytes,
    })
}
