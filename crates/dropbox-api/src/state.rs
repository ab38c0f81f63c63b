//! Application state and sub-state extractors.
//!
//! Handlers extract only the piece they need through Axum's `FromRef`.

use axum::extract::FromRef;
use dropbox_core::Config;
use dropbox_processing::IntakePipeline;
use dropbox_storage::LibraryStore;
use std::sync::Arc;

/// Shared secret checked by the password middleware.
#[derive(Clone)]
pub struct AuthState {
    pub password: Arc<str>,
}

/// Upload limits advertised to clients and enforced at the boundary.
#[derive(Clone, Copy, Debug)]
pub struct UploadLimits {
    pub max_upload_size_bytes: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub library: Arc<LibraryStore>,
    pub intake: IntakePipeline,
    pub auth: AuthState,
    pub limits: UploadLimits,
}

impl FromRef<Arc<AppState>> for AuthState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.auth.clone()
    }
}

impl FromRef<Arc<AppState>> for UploadLimits {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.limits
    }
}
