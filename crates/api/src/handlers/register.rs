use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use hookd_domain::HookView;
use serde_json::json;
use tracing::{debug, instrument};

use crate::dto::RegisterRequest;
use crate::errors::ApiError;
use crate::state::AppState;

#[instrument(skip(state, body), name = "api_register")]
pub async fn register(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    // Absent or unparseable body, and count < 1, all fall back to 1
    // (spec.md §4.5) — this endpoint never 400s on a malformed body.
    let req: RegisterRequest =
        serde_json::from_slice(&body).unwrap_or_default();

    let count = req.count.filter(|&c| c >= 1).unwrap_or(1);

    let hooks: Vec<HookView> = (0..count)
        .map(|_| HookView::from(&state.store.create_hook(&state.base_domain)))
        .collect();
    debug!(count, "registered hooks");

    if count == 1 {
        Ok(Json(hooks.into_iter().next().expect("count == 1")).into_response())
    } else {
        Ok(Json(json!({ "hooks": hooks })).into_response())
    }
}
