use crate::traits::{StorageError, StorageResult};
use dropbox_core::MediaId;
use std::path::{Path, PathBuf};
use tokio::fs;

const STAGING_DIR: &str = ".incoming";

/// Directory holding ingested media and subtitle files.
///
/// Files live directly under the root and are addressed by bare file name.
/// Uploads are staged under `.incoming/` so relocation is a same-filesystem rename.
#[derive(Clone, Debug)]
pub struct MediaRoot {
    base_path: PathBuf,
    base_url: String,
}

impl MediaRoot {
    /// Create the root (and its staging directory) if missing.
    ///
    /// # Arguments
    /// * `base_path` - Directory media files are written to (e.g. "./media")
    /// * `base_url` - Prefix clients fetch those files from (e.g. "/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: impl Into<String>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(base_path.join(STAGING_DIR))
            .await
            .map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create media directory {}: {}",
                    base_path.display(),
                    e
                ))
            })?;

        Ok(MediaRoot {
            base_path,
            base_url: base_url.into(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a file name inside the root.
    ///
    /// Only single path components are accepted.
    pub fn path_for(&self, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty()
            || name.contains("..")
            || name.starts_with('/')
            || name.contains('/')
            || name.contains('\\')
            || name == STAGING_DIR
        {
            return Err(StorageError::InvalidKey(format!(
                "File name {:?} is not allowed",
                name
            )));
        }
        Ok(self.base_path.join(name))
    }

    /// Public URL for a file in the root.
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    /// A fresh path in the staging directory for an incoming upload.
    pub fn staging_path(&self) -> PathBuf {
        self.base_path
            .join(STAGING_DIR)
            .join(MediaId::generate().as_str())
    }

    pub async fn exists(&self, name: &str) -> StorageResult<bool> {
        let path = self.path_for(name)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    /// Move `source` into the root under `name`.
    ///
    /// Falls back to copy-then-remove when rename fails (e.g. across filesystems).
    pub async fn move_into(&self, source: &Path, name: &str) -> StorageResult<PathBuf> {
        let dest = self.path_for(name)?;
        let start = std::time::Instant::now();

        if let Err(rename_err) = fs::rename(source, &dest).await {
            tracing::debug!(
                error = %rename_err,
                source = %source.display(),
                "Rename failed, copying instead"
            );
            fs::copy(source, &dest).await.map_err(|e| {
                StorageError::SaveFailed(format!(
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    dest.display(),
                    e
                ))
            })?;
            if let Err(e) = fs::remove_file(source).await {
                tracing::warn!(error = %e, source = %source.display(), "Failed to remove source after copy");
            }
        }

        tracing::info!(
            path = %dest.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Media file stored"
        );

        Ok(dest)
    }

    /// Open a fresh staging file for writing. Nothing in the root is touched
    /// until the caller moves it into place with `move_into`.
    pub async fn create_staged(&self) -> StorageResult<(PathBuf, fs::File)> {
        let path = self.staging_path();
        let file = fs::File::create(&path).await.map_err(|e| {
            StorageError::SaveFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        Ok((path, file))
    }

    /// Remove a file from the root. Missing files are not an error.
    pub async fn remove(&self, name: &str) -> StorageResult<bool> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Media file removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    /// Remove a file by absolute path, logging instead of failing.
    pub async fn discard(path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, path = %path.display(), "Failed to remove file");
            }
        }
    }

    /// Map a public URL back to a file name in the root, if it points here.
    pub fn name_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let prefix = self.base_url.trim_end_matches('/');
        let name = url.strip_prefix(prefix)?.strip_prefix('/')?;
        self.path_for(name).ok().map(|_| name)
    }
}
