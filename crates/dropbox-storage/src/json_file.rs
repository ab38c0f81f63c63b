use crate::traits::{LibraryPersistence, StorageError, StorageResult};
use async_trait::async_trait;
use dropbox_core::{MediaEntry, MediaId};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Library document stored as a single JSON file.
///
/// The document is an array of `[mediaId, entry]` pairs. Saves go through a
/// sibling temporary file that is synced and then renamed over the target.
#[derive(Clone, Debug)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFilePersistence { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "library.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl LibraryPersistence for JsonFilePersistence {
    async fn load(&self) -> StorageResult<Vec<(MediaId, MediaEntry)>> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            tracing::info!(path = %self.path.display(), "Library file not found, starting empty");
            return Ok(Vec::new());
        }

        let data = fs::read(&self.path).await.map_err(|e| {
            StorageError::LoadFailed(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let entries: Vec<(MediaId, MediaEntry)> = serde_json::from_slice(&data).map_err(|e| {
            StorageError::LoadFailed(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        tracing::info!(
            path = %self.path.display(),
            entries = entries.len(),
            "Library loaded"
        );

        Ok(entries)
    }

    async fn save(&self, entries: &[(MediaId, MediaEntry)]) -> StorageResult<()> {
        let start = std::time::Instant::now();

        let data = serde_json::to_vec_pretty(entries)
            .map_err(|e| StorageError::SaveFailed(format!("Failed to serialize library: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            StorageError::SaveFailed(format!("Failed to create {}: {}", temp_path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::SaveFailed(format!("Failed to write {}: {}", temp_path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::SaveFailed(format!("Failed to sync {}: {}", temp_path.display(), e))
        })?;
        drop(file);

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            StorageError::SaveFailed(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Library saved"
        );

        Ok(())
    }
}
