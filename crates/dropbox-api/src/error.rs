//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors from the
//! storage and processing crates convert into `AppError` here so every failure
//! renders with the same status, body and log level.

use axum::{
    extract::rejection::JsonRejection,
    extract::{multipart::MultipartError, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dropbox_core::{AppError, ErrorMetadata, LogLevel};
use dropbox_processing::PipelineError;
use dropbox_storage::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use utoipa::ToSchema;

static HIDE_DETAILS: AtomicBool = AtomicBool::new(false);

/// Strip `details` and `error_type` from every error body (set once at startup in production).
pub fn hide_error_details(hide: bool) {
    HIDE_DETAILS.store(hide, Ordering::Relaxed);
}

/// JSON error body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Client-safe message, e.g. `Invalid password.`
    pub title: String,
    pub code: String,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Error chain, outside production and for non-sensitive errors only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    fn new(error: &AppError, expose_details: bool) -> Self {
        let expose = expose_details && !error.is_sensitive();
        ErrorResponse {
            title: error.client_message(),
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
            violations: error.violations().map(<[String]>::to_vec),
            error_type: expose.then(|| error.error_type().to_string()),
            details: expose.then(|| error.detailed_message()),
        }
    }
}

/// Newtype so `IntoResponse` can be implemented for the core error.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Upload exceeds the dropbox limit".to_string())
        } else {
            AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
        };
        HttpAppError(app)
    }
}

/// `Json<T>` whose rejection renders as an `ErrorResponse`.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| ValidatedJson(value))
            .map_err(HttpAppError::from)
    }
}

fn log_error(error: &AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(code, error = %error, "Request rejected"),
        LogLevel::Warn => tracing::warn!(code, error = %error, "Request rejected"),
        LogLevel::Error => tracing::error!(code, error = %error, "Request failed"),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        log_error(&self.0);

        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse::new(&self.0, !HIDE_DETAILS.load(Ordering::Relaxed));

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::AlreadyExists(id) => {
                AppError::Internal(format!("Media {} already exists", id))
            }
            StorageError::LoadFailed(msg) | StorageError::SaveFailed(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

impl From<PipelineError> for HttpAppError {
    fn from(err: PipelineError) -> Self {
        let app = match err {
            PipelineError::NotFound(_) => AppError::NotFound("Media not found".to_string()),
            PipelineError::InvalidInput(msg) => AppError::InvalidInput(msg),
            PipelineError::Storage(inner) => return HttpAppError::from(inner),
            err @ (PipelineError::Probe(_) | PipelineError::Subtitle(_)) => {
                AppError::Pipeline(err.to_string())
            }
        };
        HttpAppError(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropbox_processing::SubtitleError;

    #[test]
    fn test_error_body_omits_details_for_sensitive_errors() {
        let body = ErrorResponse::new(&AppError::Storage("disk full".into()), true);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["title"], "Failed to persist library");
        assert_eq!(json["code"], "STORAGE_ERROR");
        assert!(json.get("details").is_none());
        assert!(json.get("violations").is_none());
    }

    #[test]
    fn test_error_body_exposes_pipeline_details() {
        let body = ErrorResponse::new(&AppError::Pipeline("no cues".into()), true);
        assert_eq!(body.error_type.as_deref(), Some("PipelineFailure"));
        assert!(body.details.unwrap().contains("no cues"));

        let hidden = ErrorResponse::new(&AppError::Pipeline("no cues".into()), false);
        assert!(hidden.details.is_none());
        assert_eq!(hidden.title, "Failed to process uploaded file");
    }

    #[test]
    fn test_unauthorized_is_401() {
        let response = HttpAppError(AppError::Unauthorized("Invalid password.".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_validation_is_400() {
        let response =
            HttpAppError(AppError::Validation(vec!["setTitle too long".into()])).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_errors_map_to_500() {
        let err = HttpAppError::from(StorageError::SaveFailed("disk full".into()));
        assert!(matches!(err.0, AppError::Storage(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_pipeline_errors_map() {
        let not_found = HttpAppError::from(PipelineError::NotFound("x".into()));
        assert!(matches!(not_found.0, AppError::NotFound(_)));

        let subtitle = HttpAppError::from(PipelineError::Subtitle(SubtitleError::NoCues));
        assert!(matches!(subtitle.0, AppError::Pipeline(_)));

        let storage = HttpAppError::from(PipelineError::Storage(StorageError::SaveFailed(
            "x".into(),
        )));
        assert!(matches!(storage.0, AppError::Storage(_)));
    }
}
