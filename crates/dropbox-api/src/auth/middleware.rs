use crate::error::HttpAppError;
use crate::state::AuthState;
use axum::{
    body::{Body, BodyDataStream},
    extract::{FromRequest, Multipart, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
    BoxError, Form,
};
use bytes::Bytes;
use dropbox_core::AppError;
use futures::{stream, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;

pub const INVALID_PASSWORD: &str = "Invalid password.";

/// Most bytes read from a body while looking for its `password` field.
///
/// JSON and urlencoded bodies above this are rejected. Multipart bodies are
/// scanned only up to the `password` part, which must precede any file part.
pub const PASSWORD_SCAN_LIMIT: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
struct PasswordBody {
    password: Option<String>,
}

fn secure_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Bearer credential check.
///
/// The token only has to *end with* the password, so any prefix is accepted.
/// Existing clients send `Bearer <anything><password>`; keep it that way.
pub fn bearer_matches(headers: &HeaderMap, password: &str) -> bool {
    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    else {
        return false;
    };

    let token = token.as_bytes();
    let password = password.as_bytes();
    if password.is_empty() || token.len() < password.len() {
        return false;
    }
    secure_compare(&token[token.len() - password.len()..], password)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Multipart,
    Other,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        BodyKind::Json
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        BodyKind::Form
    } else if content_type.starts_with("multipart/form-data") {
        BodyKind::Multipart
    } else {
        BodyKind::Other
    }
}

/// Rebuild a request around `body` so an extractor can parse it.
fn replay(headers: &HeaderMap, body: Body) -> Request {
    let mut request = Request::new(body);
    *request.method_mut() = axum::http::Method::POST;
    *request.headers_mut() = headers.clone();
    request
}

enum BodyCheck {
    /// Password matched; the body to hand on, byte-identical to the original
    Authorized(Body),
    Rejected,
    TooLarge,
}

fn matches_password(candidate: Option<&str>, password: &str) -> bool {
    candidate.is_some_and(|p| secure_compare(p.as_bytes(), password.as_bytes()))
}

/// JSON and urlencoded bodies are small; buffer them (up to the scan limit).
async fn check_buffered(
    kind: BodyKind,
    headers: &HeaderMap,
    body: Body,
    password: &str,
) -> BodyCheck {
    let Ok(bytes) = axum::body::to_bytes(body, PASSWORD_SCAN_LIMIT).await else {
        return BodyCheck::TooLarge;
    };

    let candidate = match kind {
        BodyKind::Json => serde_json::from_slice::<PasswordBody>(&bytes)
            .ok()
            .and_then(|b| b.password),
        BodyKind::Form => {
            let request = replay(headers, Body::from(bytes.clone()));
            Form::<PasswordBody>::from_request(request, &())
                .await
                .ok()
                .and_then(|Form(b)| b.password)
        }
        BodyKind::Multipart | BodyKind::Other => None,
    };

    if matches_password(candidate.as_deref(), password) {
        BodyCheck::Authorized(Body::from(bytes))
    } else {
        BodyCheck::Rejected
    }
}

/// Read multipart fields in order until `password`. A file part first means no password.
async fn leading_multipart_password(request: Request) -> Option<String> {
    let mut multipart = Multipart::from_request(request, &()).await.ok()?;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.file_name().is_some() {
            return None;
        }
        if field.name() == Some("password") {
            return field.text().await.ok();
        }
    }
    None
}

/// Stream the multipart body through the parser, recording what it pulls.
///
/// Only the chunks read before the `password` part are held in memory. The
/// handler gets those chunks followed by the untouched rest of the stream.
async fn check_multipart(headers: &HeaderMap, body: Body, password: &str) -> BodyCheck {
    let upstream: Arc<Mutex<BodyDataStream>> = Arc::new(Mutex::new(body.into_data_stream()));
    let seen: Arc<Mutex<(Vec<Bytes>, usize)>> = Arc::default();

    let recording = stream::unfold(
        (upstream.clone(), seen.clone()),
        |(upstream, seen)| async move {
            let next = upstream.lock().await.next().await?;
            let next = match next {
                Ok(chunk) => {
                    let mut seen_guard = seen.lock().await;
                    seen_guard.1 += chunk.len();
                    if seen_guard.1 > PASSWORD_SCAN_LIMIT {
                        Err(axum::Error::new(std::io::Error::other(
                            "password part not found within scan limit",
                        )))
                    } else {
                        seen_guard.0.push(chunk.clone());
                        Ok(chunk)
                    }
                }
                Err(e) => Err(e),
            };
            Some((next, (upstream, seen)))
        },
    );

    let candidate = leading_multipart_password(replay(headers, Body::from_stream(recording))).await;
    if !matches_password(candidate.as_deref(), password) {
        return BodyCheck::Rejected;
    }

    // The recording stream was dropped with the parser, so both handles are unique again.
    let (Ok(upstream), Ok(seen)) = (Arc::try_unwrap(upstream), Arc::try_unwrap(seen)) else {
        return BodyCheck::Rejected;
    };
    let (chunks, _) = seen.into_inner();
    let rest = upstream.into_inner();

    // `Body::from_stream` wraps errors again; unwrap so a body-limit error still reads as 413.
    let rest = rest.map(|chunk| chunk.map_err(axum::Error::into_inner));
    let replayed = stream::iter(chunks.into_iter().map(Ok::<_, BoxError>)).chain(rest);
    BodyCheck::Authorized(Body::from_stream(replayed))
}

fn unauthorized() -> Response {
    HttpAppError(AppError::Unauthorized(INVALID_PASSWORD.to_string())).into_response()
}

/// Password gate for mutating routes.
///
/// Accepts a matching bearer token, or a body whose `password` field equals the
/// secret exactly. The handler sees the same body bytes either way.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    if bearer_matches(request.headers(), &auth_state.password) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let check = match body_kind(&parts.headers) {
        BodyKind::Other => BodyCheck::Rejected,
        BodyKind::Multipart => check_multipart(&parts.headers, body, &auth_state.password).await,
        kind => check_buffered(kind, &parts.headers, body, &auth_state.password).await,
    };

    match check {
        BodyCheck::Authorized(body) => next.run(Request::from_parts(parts, body)).await,
        BodyCheck::Rejected => {
            tracing::debug!(method = %parts.method, uri = %parts.uri, "Rejected request with missing or invalid password");
            unauthorized()
        }
        BodyCheck::TooLarge => HttpAppError(AppError::PayloadTooLarge(format!(
            "Body password check reads at most {} bytes; send the password as a bearer token",
            PASSWORD_SCAN_LIMIT
        )))
        .into_response(),
    }
}
