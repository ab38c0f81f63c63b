//! OpenAPI documentation served at `/dropbox/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use dropbox_core::models;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Media Dropbox API",
        version = "0.1.0",
        description = "Self-hosted media dropbox: upload audio and video, attach subtitles, tag and search the library. Mutating routes take the dropbox password as a bearer token or a `password` body field."
    ),
    paths(
        handlers::media_get::list_media,
        handlers::media_get::get_media,
        handlers::media_availability::media_status,
        handlers::media_availability::media_progress,
        handlers::media_availability::media_request,
        handlers::upload_limit::upload_limit,
        handlers::authorize::authorize,
        handlers::media_create::create_media,
        handlers::subtitle_upload::upload_subtitles,
        handlers::media_patch::patch_media,
        handlers::media_delete::delete_media,
        handlers::health::health_check,
    ),
    components(schemas(
        models::MediaResponse,
        models::CreateMediaRequest,
        models::PatchMediaRequest,
        models::SearchQuery,
        handlers::media_availability::StatusResponse,
        handlers::media_availability::ProgressResponse,
        handlers::upload_limit::LimitResponse,
        handlers::authorize::AuthorizedResponse,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "dropbox", description = "Media library"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
