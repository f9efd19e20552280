//! HTTP dispatch adapter.
//!
//! [`redirect_handler`] is the Axum fallback that receives every request,
//! looks its path up in the [`Redirector`](crate::loader::Redirector),
//! and answers `301 Moved Permanently` on a hit. On a miss it returns
//! the fallback greeting untouched.
//!
//! Mapping files hold decoded paths (`/hello world`), so the request
//! path is percent-decoded before lookup.

use std::borrow::Cow;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;

use crate::server::{AppState, FALLBACK_BODY};

pub async fn redirect_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
) -> Response {
    let path = decode_path(uri.path()).into_owned();
    let correlation_id = req_headers
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    // The persistent engine does disk I/O, keep it off the async workers.
    let lookup_state = Arc::clone(&state);
    let lookup_path = path.clone();
    let routed =
        tokio::task::spawn_blocking(move || lookup_state.redirector.route(&lookup_path)).await;

    let destination = match routed {
        Ok(Ok(destination)) => destination,
        Ok(Err(e)) => {
            tracing::error!(
                correlation_id = %correlation_id,
                path = %path,
                error = %e,
                "redirect lookup failed, shutting down"
            );
            state.fatal.send_replace(true);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        Err(e) => {
            tracing::error!(
                correlation_id = %correlation_id,
                path = %path,
                error = %e,
                "redirect lookup task failed"
            );
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some(destination) = destination else {
        tracing::debug!(
            correlation_id = %correlation_id,
            method = %method,
            path = %path,
            "no redirect, serving fallback"
        );
        return fallback_response();
    };

    let Ok(location) = HeaderValue::from_str(&destination) else {
        tracing::error!(
            correlation_id = %correlation_id,
            path = %path,
            destination = %destination,
            "destination is not a valid Location header"
        );
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    tracing::info!(
        correlation_id = %correlation_id,
        method = %method,
        path = %path,
        destination = %destination,
        "redirecting"
    );

    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

/// Percent-decode a request path. Invalid UTF-8 after decoding keeps the
/// raw path.
#[must_use]
pub fn decode_path(raw: &str) -> Cow<'_, str> {
    percent_decode_str(raw)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(raw))
}

#[must_use]
pub fn fallback_response() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        FALLBACK_BODY,
    )
        .into_response()
}
