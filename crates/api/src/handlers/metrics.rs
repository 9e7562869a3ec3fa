use axum::extract::State;
use axum::Json;
use hookd_domain::Stats;
use tracing::instrument;

use crate::state::AppState;

#[instrument(skip(state), name = "api_metrics")]
pub async fn metrics(State(state): State<AppState>) -> Json<Stats> {
    let store_stats = state.store.stats();
    let mut memory = (state.memory_stats)();
    memory.gc_runs = state.eviction_metrics.gc_runs();
    Json(Stats {
        hooks: store_stats.hooks,
        interactions: store_stats.interactions,
        evictions: state.eviction_metrics.snapshot(),
        memory,
    })
}
