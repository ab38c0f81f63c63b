//! Library, media root and intake wiring.

use crate::state::{AppState, AuthState, UploadLimits};
use anyhow::{Context, Result};
use dropbox_core::Config;
use dropbox_processing::{DurationProbe, IntakePipeline};
use dropbox_storage::{JsonFilePersistence, LibraryStore, MediaRoot};
use std::sync::Arc;

pub async fn initialize_services(
    config: &Config,
    probe: Arc<dyn DurationProbe>,
) -> Result<Arc<AppState>> {
    let media = MediaRoot::new(config.media_root(), config.media_base_url())
        .await
        .context("Failed to prepare media root")?;

    let persistence = JsonFilePersistence::new(config.library_file());
    let library_file = persistence.path().to_path_buf();
    let library = Arc::new(LibraryStore::open(Arc::new(persistence)).await);

    tracing::info!(
        media_root = %media.base_path().display(),
        library_file = %library_file.display(),
        entries = library.len().await,
        "Library ready"
    );

    let intake = IntakePipeline::new(library.clone(), media, probe);

    Ok(Arc::new(AppState {
        config: config.clone(),
        library,
        intake,
        auth: AuthState {
            password: Arc::from(config.password()),
        },
        limits: UploadLimits {
            max_upload_size_bytes: config.max_upload_size_bytes(),
        },
    }))
}
