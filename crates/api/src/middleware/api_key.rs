use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use hookd_domain::DomainError;
use subtle::ConstantTimeEq;

use crate::errors::ApiError;
use crate::state::AppState;

/// Guards the API sub-router. Every route behind this layer requires the
/// key regardless of HTTP method — `/metrics` and the capture vhost are
/// mounted outside it (spec.md §4.5), not exempted by method.
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let provided = match extract_api_key(&request) {
        Some(key) => key,
        None => return ApiError(DomainError::AuthFailure).into_response(),
    };
    if !bool::from(provided.as_bytes().ct_eq(state.api_key.as_bytes())) {
        return ApiError(DomainError::AuthFailure).into_response();
    }
    next.run(request).await
}

fn extract_api_key(request: &Request) -> Option<String> {
    request
        .headers()
        .get("X-Api-Key")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
