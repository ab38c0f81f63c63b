use crate::traits::{LibraryPersistence, StorageError, StorageResult};
use async_trait::async_trait;
use dropbox_core::{MediaEntry, MediaId};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-process persistence backend.
///
/// Clones share the same document, so a test can keep a handle, hand another to a
/// store, and inspect what was saved. `fail_saves` makes every subsequent save fail.
#[derive(Clone, Default)]
pub struct MemoryPersistence {
    document: Arc<Mutex<Vec<(MediaId, MediaEntry)>>>,
    saves: Arc<AtomicUsize>,
    fail_saves: Arc<AtomicBool>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<(MediaId, MediaEntry)>) -> Self {
        let persistence = Self::default();
        if let Ok(mut doc) = persistence.document.lock() {
            *doc = entries;
        }
        persistence
    }

    /// Snapshot of the last saved document.
    pub fn document(&self) -> Vec<(MediaId, MediaEntry)> {
        self.document
            .lock()
            .map(|doc| doc.clone())
            .unwrap_or_default()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl LibraryPersistence for MemoryPersistence {
    async fn load(&self) -> StorageResult<Vec<(MediaId, MediaEntry)>> {
        Ok(self.document())
    }

    async fn save(&self, entries: &[(MediaId, MediaEntry)]) -> StorageResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::SaveFailed("save disabled".to_string()));
        }
        let mut doc = self
            .document
            .lock()
            .map_err(|_| StorageError::SaveFailed("document lock poisoned".to_string()))?;
        *doc = entries.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
