use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::upload::read_upload_form;
use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header,
    response::IntoResponse,
    Json,
};
use dropbox_core::models::CreateMediaRequest;
use dropbox_core::{AppError, MediaResponse};
use std::sync::Arc;

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
}

/// Create a library entry.
///
/// A JSON body `{title?, url}` registers external media. A multipart body with a
/// `file` part (and optional `title` part) ingests a local file.
#[utoipa::path(
    post,
    path = "/dropbox",
    tag = "dropbox",
    request_body(content = CreateMediaRequest, description = "External media reference, or multipart upload with a `file` part"),
    responses(
        (status = 200, description = "Entry created", body = MediaResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid password", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Media processing failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request))]
pub async fn create_media(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<impl IntoResponse, HttpAppError> {
    let entry = if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {}", e)))?;
        let mut form =
            read_upload_form(multipart, state.intake.media_root(), &["file"]).await?;

        let Some(file) = form.file.take() else {
            return Err(AppError::InvalidInput("No file provided".to_string()).into());
        };
        let title = form.text("title").map(str::to_string);

        tracing::info!(
            filename = %file.filename,
            size_bytes = file.size_bytes,
            "Ingesting uploaded media"
        );

        state
            .intake
            .ingest_file(&file.path, &file.filename, title.as_deref())
            .await?
    } else {
        let ValidatedJson(body) =
            ValidatedJson::<CreateMediaRequest>::from_request(request, &state).await?;
        state
            .intake
            .register_url(body.title.as_deref(), &body.url)
            .await?
    };

    Ok(Json(MediaResponse::from(entry)))
}
