use crate::error::ErrorResponse;
use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorizedResponse {
    pub authorized: bool,
}

/// Credential check. Reaching the handler means the password middleware passed.
#[utoipa::path(
    post,
    path = "/dropbox/auth",
    tag = "dropbox",
    responses(
        (status = 200, description = "Credential accepted", body = AuthorizedResponse),
        (status = 401, description = "Invalid password", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn authorize() -> impl IntoResponse {
    Json(AuthorizedResponse { authorized: true })
}
