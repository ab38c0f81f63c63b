//! The media library: an ordered id → entry map mirrored to a persistence backend.

use crate::traits::{LibraryPersistence, StorageError, StorageResult};
use dropbox_core::{MediaEntry, MediaId};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Process-wide media library.
///
/// Entries keep insertion order; replacing an existing key keeps its position.
/// Every mutation is persisted before the lock is released, and a failed save
/// restores the previous in-memory state so memory never runs ahead of disk.
pub struct LibraryStore {
    entries: Mutex<Vec<(MediaId, MediaEntry)>>,
    persistence: Arc<dyn LibraryPersistence>,
}

impl LibraryStore {
    /// Build a store from whatever the backend holds.
    ///
    /// A document that cannot be read or parsed is logged and treated as empty.
    pub async fn open(persistence: Arc<dyn LibraryPersistence>) -> Self {
        let loaded = match persistence.load().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Library document unreadable, starting with an empty library");
                Vec::new()
            }
        };

        let mut entries: Vec<(MediaId, MediaEntry)> = Vec::with_capacity(loaded.len());
        for (id, entry) in loaded {
            match entries.iter_mut().find(|(k, _)| *k == id) {
                Some(slot) => slot.1 = entry,
                None => entries.push((id, entry)),
            }
        }

        LibraryStore {
            entries: Mutex::new(entries),
            persistence,
        }
    }

    pub async fn get(&self, id: &MediaId) -> Option<MediaEntry> {
        let entries = self.entries.lock().await;
        entries
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, entry)| entry.clone())
    }

    pub async fn contains(&self, id: &MediaId) -> bool {
        let entries = self.entries.lock().await;
        entries.iter().any(|(k, _)| k == id)
    }

    /// Snapshot of all entries in store order.
    pub async fn values(&self) -> Vec<MediaEntry> {
        let entries = self.entries.lock().await;
        entries.iter().map(|(_, entry)| entry.clone()).collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Insert or replace an entry and persist.
    pub async fn set(&self, id: MediaId, entry: MediaEntry) -> StorageResult<()> {
        let mut entries = self.entries.lock().await;

        match entries.iter().position(|(k, _)| *k == id) {
            Some(index) => {
                let previous = std::mem::replace(&mut entries[index].1, entry);
                if let Err(e) = self.persistence.save(&entries).await {
                    entries[index].1 = previous;
                    return Err(e);
                }
            }
            None => {
                entries.push((id, entry));
                if let Err(e) = self.persistence.save(&entries).await {
                    entries.pop();
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Insert an entry under a fresh key; refuses to overwrite.
    pub async fn insert_new(&self, id: MediaId, entry: MediaEntry) -> StorageResult<()> {
        let mut entries = self.entries.lock().await;
        if entries.iter().any(|(k, _)| *k == id) {
            return Err(StorageError::AlreadyExists(id));
        }

        entries.push((id.clone(), entry));
        if let Err(e) = self.persistence.save(&entries).await {
            entries.pop();
            return Err(e);
        }

        tracing::debug!(media_id = %id, "Library entry added");
        Ok(())
    }

    /// Modify an entry in place and persist.
    ///
    /// `f` runs on a copy; when it fails nothing changes. Returns `Ok(None)` for
    /// unknown ids and the updated entry otherwise.
    pub async fn update<F, E>(&self, id: &MediaId, f: F) -> Result<Option<MediaEntry>, E>
    where
        F: FnOnce(&mut MediaEntry) -> Result<(), E>,
        E: From<StorageError>,
    {
        let mut entries = self.entries.lock().await;
        let Some(index) = entries.iter().position(|(k, _)| k == id) else {
            return Ok(None);
        };

        let mut updated = entries[index].1.clone();
        f(&mut updated)?;

        let previous = std::mem::replace(&mut entries[index].1, updated.clone());
        if let Err(e) = self.persistence.save(&entries).await {
            entries[index].1 = previous;
            return Err(e.into());
        }

        Ok(Some(updated))
    }

    /// Remove an entry and persist. Returns the removed entry, if any.
    pub async fn delete(&self, id: &MediaId) -> StorageResult<Option<MediaEntry>> {
        let mut entries = self.entries.lock().await;
        let Some(index) = entries.iter().position(|(k, _)| k == id) else {
            return Ok(None);
        };

        let removed = entries.remove(index);
        if let Err(e) = self.persistence.save(&entries).await {
            entries.insert(index, removed);
            return Err(e);
        }

        tracing::debug!(media_id = %id, "Library entry removed");
        Ok(Some(removed.1))
    }
}
