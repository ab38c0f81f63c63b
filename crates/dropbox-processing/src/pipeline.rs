//! Media intake: from an uploaded file or URL to a persisted library entry.

use crate::error::{PipelineError, PipelineResult};
use crate::probe::{seconds_to_millis, DurationProbe};
use crate::subtitle::convert_srt_to_vtt;
use dropbox_core::validation::normalize_title;
use dropbox_core::{MediaEntry, MediaId};
use dropbox_storage::{LibraryStore, MediaRoot, StorageError};
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;

#[derive(Clone)]
pub struct IntakePipeline {
    store: Arc<LibraryStore>,
    media: MediaRoot,
    probe: Arc<dyn DurationProbe>,
}

impl IntakePipeline {
    pub fn new(store: Arc<LibraryStore>, media: MediaRoot, probe: Arc<dyn DurationProbe>) -> Self {
        IntakePipeline {
            store,
            media,
            probe,
        }
    }

    pub fn media_root(&self) -> &MediaRoot {
        &self.media
    }

    /// Move an uploaded file into the media root and create its entry.
    ///
    /// `source` is consumed: it is either relocated or removed. No entry is stored
    /// unless relocation, probing and persistence all succeed.
    #[tracing::instrument(skip(self, source), fields(media_id = tracing::field::Empty))]
    pub async fn ingest_file(
        &self,
        source: &Path,
        original_filename: &str,
        title: Option<&str>,
    ) -> PipelineResult<MediaEntry> {
        let id = MediaId::generate();
        tracing::Span::current().record("media_id", tracing::field::display(&id));

        let filename = match file_extension(original_filename) {
            Some(ext) => format!("{}.{}", id, ext),
            None => id.to_string(),
        };

        let dest = match self.media.move_into(source, &filename).await {
            Ok(dest) => dest,
            Err(e) => {
                MediaRoot::discard(source).await;
                return Err(e.into());
            }
        };

        let seconds = match self.probe.duration_seconds(&dest).await {
            Ok(seconds) => seconds,
            Err(e) => {
                tracing::warn!(error = %e, path = %dest.display(), "Probe failed, discarding upload");
                MediaRoot::discard(&dest).await;
                return Err(e);
            }
        };

        let title = normalize_title(title.unwrap_or_default(), &file_stem(original_filename, &id));
        let entry = MediaEntry::new(id.clone(), title, self.media.url_for(&filename))
            .with_duration(seconds_to_millis(seconds));

        if let Err(e) = self.store.insert_new(id.clone(), entry.clone()).await {
            MediaRoot::discard(&dest).await;
            return Err(e.into());
        }

        tracing::info!(
            media_id = %id,
            filename = %filename,
            duration = entry.duration,
            "Media file ingested"
        );

        Ok(entry)
    }

    /// Create an entry for externally hosted media.
    #[tracing::instrument(skip(self))]
    pub async fn register_url(&self, title: Option<&str>, url: &str) -> PipelineResult<MediaEntry> {
        let url = url.trim();
        if url.is_empty() {
            return Err(PipelineError::InvalidInput("url must not be empty".to_string()));
        }

        let id = MediaId::generate();
        let title = normalize_title(title.unwrap_or_default(), &title_from_url(url));
        let entry = MediaEntry::new(id.clone(), title, url);

        self.store.insert_new(id.clone(), entry.clone()).await?;

        tracing::info!(media_id = %id, url = %url, "Media URL registered");
        Ok(entry)
    }

    /// Convert (if needed) and attach a subtitle track to an existing entry.
    ///
    /// `source` is consumed. The entry must exist before any file work happens.
    #[tracing::instrument(skip(self, source))]
    pub async fn attach_subtitle(
        &self,
        id: &MediaId,
        source: &Path,
        original_filename: &str,
    ) -> PipelineResult<MediaEntry> {
        if !self.store.contains(id).await {
            MediaRoot::discard(source).await;
            return Err(PipelineError::NotFound(id.clone()));
        }

        let name = format!("{}.vtt", id);
        let replaces_existing = self
            .store
            .get(id)
            .await
            .is_some_and(|entry| entry.subtitle.as_deref() == Some(name.as_str()));
        let is_vtt = file_extension(original_filename).as_deref() == Some("vtt");

        let dest = if is_vtt {
            match self.media.move_into(source, &name).await {
                Ok(dest) => dest,
                Err(e) => {
                    MediaRoot::discard(source).await;
                    return Err(e.into());
                }
            }
        } else {
            let result = self.convert_into(source, &name).await;
            MediaRoot::discard(source).await;
            result?
        };

        let subtitle = name.clone();
        let updated = self
            .store
            .update(id, |entry| {
                entry.subtitle = Some(subtitle);
                Ok::<(), StorageError>(())
            })
            .await;

        match updated {
            Ok(Some(entry)) => {
                tracing::info!(media_id = %id, subtitle = %name, converted = !is_vtt, "Subtitle attached");
                Ok(entry)
            }
            Ok(None) => {
                MediaRoot::discard(&dest).await;
                Err(PipelineError::NotFound(id.clone()))
            }
            Err(e) => {
                // The rolled-back entry still references this file.
                if !replaces_existing {
                    MediaRoot::discard(&dest).await;
                }
                Err(e.into())
            }
        }
    }

    /// Convert into a staging file, then move it over `name`. A failed
    /// conversion leaves any existing `name` untouched.
    async fn convert_into(&self, source: &Path, name: &str) -> PipelineResult<std::path::PathBuf> {
        let input = tokio::fs::File::open(source).await.map_err(StorageError::from)?;
        let (staged, mut output) = self.media.create_staged().await?;

        let converted = match convert_srt_to_vtt(BufReader::new(input), &mut output).await {
            Ok(cues) => output
                .sync_all()
                .await
                .map(|()| cues)
                .map_err(|e| PipelineError::from(StorageError::from(e))),
            Err(e) => Err(e.into()),
        };
        drop(output);

        let cues = match converted {
            Ok(cues) => cues,
            Err(e) => {
                MediaRoot::discard(&staged).await;
                return Err(e);
            }
        };

        match self.media.move_into(&staged, name).await {
            Ok(dest) => {
                tracing::debug!(cues, path = %dest.display(), "Subtitle converted to WebVTT");
                Ok(dest)
            }
            Err(e) => {
                MediaRoot::discard(&staged).await;
                Err(e.into())
            }
        }
    }

    /// Remove an entry and, best-effort, the files it owns in the media root.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, id: &MediaId) -> PipelineResult<Option<MediaEntry>> {
        let Some(entry) = self.store.delete(id).await? else {
            return Ok(None);
        };

        let media_file = owned_media_file(&self.media, &entry);
        for name in media_file.into_iter().chain(entry.subtitle.as_deref()) {
            if let Err(e) = self.media.remove(name).await {
                tracing::warn!(error = %e, media_id = %id, file = %name, "Failed to remove media artifact");
            }
        }

        tracing::info!(media_id = %id, "Media removed");
        Ok(Some(entry))
    }
}

/// The local file behind `entry.url`, when ingest named it after this entry.
///
/// A URL entry may point at another entry's file; that file is not ours to delete.
fn owned_media_file<'a>(media: &MediaRoot, entry: &'a MediaEntry) -> Option<&'a str> {
    let name = media.name_from_url(&entry.url)?;
    let id = entry.media_id.as_str();
    let owned = name == id || name.strip_prefix(id).is_some_and(|rest| rest.starts_with('.'));
    owned.then_some(name)
}

/// Lowercased extension of a client-supplied file name, if it looks sane.
fn file_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 16 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn file_stem(filename: &str, fallback: &MediaId) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Stem of the last path segment, ignoring query and fragment.
fn title_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let path = path.split_once("://").map_or(path, |(_, rest)| {
        rest.split_once('/').map_or("", |(_, p)| p)
    });
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();

    match Path::new(segment).file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => url.to_string(),
    }
}
