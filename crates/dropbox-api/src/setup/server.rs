//! Listener and shutdown handling.

use anyhow::{Context, Result};
use axum::Router;
use dropbox_core::Config;
use std::net::{Ipv4Addr, SocketAddr};

/// Serve `app` until SIGINT or SIGTERM, letting in-flight requests finish.
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.server_port()));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        max_upload_mb = config.max_upload_size_bytes() / 1024 / 1024,
        media_root = %config.media_root().display(),
        media_base_url = %config.media_base_url(),
        ffprobe_path = %config.ffprobe_path(),
        "Dropbox listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .context("Server error")?;

    tracing::info!("Dropbox stopped");
    Ok(())
}

/// Resolves on the first shutdown signal. A handler that fails to install is
/// logged and never fires.
async fn wait_for_shutdown() {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for Ctrl+C");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    let signal = tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    };
    tracing::info!(signal, "Shutdown requested, draining connections");
}
