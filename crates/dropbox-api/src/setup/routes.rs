//! Route configuration and setup.

use crate::api_doc::ApiDoc;
use crate::auth::middleware::auth_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Json, Router,
};
use dropbox_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

const CORS_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let protected_routes = protected_routes().route_layer(axum::middleware::from_fn_with_state(
        state.auth.clone(),
        auth_middleware,
    ));

    let mut app = public_routes().merge(protected_routes);

    if let Some(mount) = static_mount(config.media_base_url()) {
        tracing::info!(
            mount = %mount,
            media_root = %config.media_root().display(),
            "Serving media files"
        );
        app = app.nest_service(&mount, ServeDir::new(config.media_root()));
    }

    let http_concurrency_limit = config.http_concurrency_limit();
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        max_upload_size_bytes = config.max_upload_size_bytes(),
        "HTTP limits enabled"
    );

    let app = app
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes()))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/dropbox/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route("/dropbox", get(handlers::media_get::list_media))
        .route("/dropbox-limit", get(handlers::upload_limit::upload_limit))
        .route("/dropbox/{media}", get(handlers::media_get::get_media))
        .route(
            "/dropbox/{media}/status",
            get(handlers::media_availability::media_status),
        )
        .route(
            "/dropbox/{media}/progress",
            get(handlers::media_availability::media_progress),
        )
        .route(
            "/dropbox/{media}/request",
            post(handlers::media_availability::media_request),
        )
}

fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dropbox/auth", post(handlers::authorize::authorize))
        .route("/dropbox", post(handlers::media_create::create_media))
        .route(
            "/dropbox/{media}",
            axum::routing::patch(handlers::media_patch::patch_media)
                .delete(handlers::media_delete::delete_media),
        )
        .route(
            "/dropbox/{media}/subtitles",
            put(handlers::subtitle_upload::upload_subtitles),
        )
}

/// Path under which the media root is served, when the base URL is local.
fn static_mount(media_base_url: &str) -> Option<String> {
    let path = media_base_url.trim_end_matches('/');
    if !path.starts_with('/') || path.is_empty() || path.contains('{') {
        return None;
    }
    Some(path.to_string())
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(CORS_METHODS)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(CORS_METHODS)
            .allow_headers(Any)
    };
    Ok(cors)
}
