use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{dispatch_by_host, require_api_key};
use crate::state::AppState;

/// Builds the full Hookd HTTP surface (spec.md §4.5): the wildcard capture
/// vhost dispatches ahead of path routing, the API routes require
/// `X-Api-Key`, and `/metrics` sits outside the auth layer entirely.
/// Middleware chain, outermost first: recovery, logging, host dispatch,
/// then (for the API branch only) auth.
pub fn create_api_routes(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/poll/{id}", get(handlers::poll_one))
        .route("/poll", post(handlers::poll_batch))
        .route_layer(from_fn_with_state(state.clone(), require_api_key));

    let public_routes = Router::new().route("/metrics", get(handlers::metrics));

    api_routes
        .merge(public_routes)
        .layer(from_fn_with_state(state.clone(), dispatch_by_host))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
