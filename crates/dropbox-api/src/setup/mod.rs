//! Startup wiring: config checks, logging, services and the router.
//!
//! `build_app` is the part tests reuse; it takes the duration probe so no
//! `ffprobe` binary is needed there.

pub mod routes;
pub mod server;
pub mod services;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use dropbox_core::Config;
use dropbox_processing::{DurationProbe, FfprobeDurationProbe};
use std::sync::Arc;

/// Production entry point: validates `config`, installs logging and probes with ffprobe.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    validation::validate_config(&config).context("Invalid dropbox configuration")?;

    crate::telemetry::init_telemetry(config.is_production());
    crate::error::hide_error_details(config.is_production());

    tracing::info!(environment = %config.environment(), "Dropbox configuration accepted");

    let probe: Arc<dyn DurationProbe> = Arc::new(FfprobeDurationProbe::new(config.ffprobe_path()));
    build_app(config, probe).await
}

/// Build state and router with an explicit duration probe.
pub async fn build_app(
    config: Config,
    probe: Arc<dyn DurationProbe>,
) -> Result<(Arc<AppState>, axum::Router)> {
    let state = services::initialize_services(&config, probe).await?;
    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}
