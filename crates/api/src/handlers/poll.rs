use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use bytes::Bytes;
use hookd_application::PollOutcome;
use hookd_domain::DomainError;
use tracing::instrument;

use crate::dto::{PollBatchResponse, PollResponse, PollResultEntry};
use crate::errors::ApiError;
use crate::state::AppState;

#[instrument(skip(state), name = "api_poll_one")]
pub async fn poll_one(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<PollResponse>, ApiError> {
    if state.store.get_hook(&id).is_none() {
        return Err(ApiError(DomainError::HookNotFound));
    }
    Ok(Json(PollResponse {
        interactions: state.store.poll(&id),
    }))
}

#[instrument(skip(state, body), name = "api_poll_batch")]
pub async fn poll_batch(State(state): State<AppState>, body: Bytes) -> Result<Json<PollBatchResponse>, ApiError> {
    // A bare `Json<Vec<String>>` extractor would reject a malformed or
    // non-array body with axum's own JsonRejection (422, plain text) —
    // spec.md §4.5 requires 400 with the standard `{"error": ...}` shape
    // for "empty or non-array", so the body is parsed by hand instead.
    let ids: Vec<String> = serde_json::from_slice(&body).map_err(|_| ApiError(DomainError::BadRequest))?;
    if ids.is_empty() {
        return Err(ApiError(DomainError::BadRequest));
    }

    let outcomes = state.store.poll_batch(&ids);
    let results: BTreeMap<String, PollResultEntry> = ids
        .into_iter()
        .map(|id| {
            let entry = match outcomes.get(&id) {
                Some(PollOutcome::Interactions(interactions)) => PollResultEntry::Found {
                    interactions: interactions.clone(),
                },
                Some(PollOutcome::NotFound) | None => PollResultEntry::NotFound {
                    error: DomainError::HookNotFound.to_string(),
                },
            };
            (id, entry)
        })
        .collect();

    Ok(Json(PollBatchResponse { results }))
}
