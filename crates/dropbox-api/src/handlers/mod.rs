pub mod authorize;
pub mod health;
pub mod media_availability;
pub mod media_create;
pub mod media_delete;
pub mod media_get;
pub mod media_patch;
pub mod subtitle_upload;
pub mod upload_limit;

use crate::error::HttpAppError;
use dropbox_core::{AppError, MediaEntry, MediaId};
use dropbox_storage::LibraryStore;

/// Resolve a path parameter to its entry.
pub(crate) async fn lookup(library: &LibraryStore, id: &MediaId) -> Result<MediaEntry, HttpAppError> {
    library
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()).into())
}
