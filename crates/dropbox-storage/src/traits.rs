//! Library persistence seam and the storage error type.

use async_trait::async_trait;
use dropbox_core::{MediaEntry, MediaId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to load library: {0}")]
    LoadFailed(String),

    #[error("Failed to save library: {0}")]
    SaveFailed(String),

    #[error("Invalid file name: {0}")]
    InvalidKey(String),

    #[error("Media {0} already exists")]
    AlreadyExists(MediaId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Media root unusable: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Library persistence trait
///
/// A backend stores the complete ordered list of entries. `save` always receives
/// the full library and replaces whatever was stored before.
#[async_trait]
pub trait LibraryPersistence: Send + Sync {
    /// Load every persisted `(id, entry)` pair in store order.
    ///
    /// Returns an empty list when nothing has been persisted yet.
    async fn load(&self) -> StorageResult<Vec<(MediaId, MediaEntry)>>;

    /// Replace the persisted library with `entries`.
    async fn save(&self, entries: &[(MediaId, MediaEntry)]) -> StorageResult<()>;
}
