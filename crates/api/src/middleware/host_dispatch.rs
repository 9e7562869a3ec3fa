use std::collections::BTreeMap;

use axum::body::{to_bytes, Body};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use hookd_domain::Interaction;
use tracing::debug;

use crate::state::AppState;

/// A generous ceiling on what we'll buffer in memory for a single request,
/// well above the wire-format truncation point. Anything past this is a
/// hostile upload, not a legitimate oversized capture.
const BODY_READ_CEILING: usize = 64 * 1024 * 1024;

/// Runs before path routing. Any request whose `Host` names a registered
/// hook's wildcard subdomain is captured and answered with an empty 200,
/// never reaching the API router or its auth layer (spec.md §4.5). Requests
/// for the base domain, or any unrelated host, fall through unchanged.
pub async fn dispatch_by_host(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let host = host_header(&request);
    let label = host.as_deref().and_then(|h| state.capture_label(h)).map(str::to_owned);

    let Some(hook_id) = label else {
        return next.run(request).await;
    };

    let source_ip = request
        .extensions()
        .get::<ConnectInfo<std::net::SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    // First value per name (spec.md §3) — a plain `.collect()` into a map
    // would keep the *last* occurrence of a repeated header instead.
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in request.headers().iter() {
        headers
            .entry(name.to_string())
            .or_insert_with(|| value.to_str().unwrap_or("").to_string());
    }

    let body = match to_bytes(request.into_body(), BODY_READ_CEILING).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    debug!(%hook_id, %method, %path, body_len = body.len(), "captured interaction");

    state.store.add_interaction(
        &hook_id,
        Interaction::new_http(
            state.id_gen.generate(),
            &hook_id,
            source_ip,
            Utc::now(),
            method,
            path,
            headers,
            body.to_vec(),
        ),
    );

    StatusCode::OK.into_response()
}

fn host_header(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get(http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|h| h.split(':').next().unwrap_or(h).to_lowercase())
}
