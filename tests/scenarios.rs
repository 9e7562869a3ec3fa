//! End-to-end scenarios wiring the real Store, evictor, and HTTP surface
//! together the way `hookd`'s composition root does, minus the network
//! listeners themselves (those are exercised in `dns_capture.rs`).

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use hookd_api::{create_api_routes, AppState};
use hookd_application::{HexIdGenerator, HookStore, InMemoryHookStore};
use hookd_domain::config::EvictionConfig;
use hookd_domain::{Interaction, MemoryStats};
use hookd_jobs::EvictionJob;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const BASE_DOMAIN: &str = "hookd.test.local";
const API_KEY: &str = "T";

fn harness() -> (Router, Arc<dyn HookStore>) {
    let store: Arc<dyn HookStore> = Arc::new(InMemoryHookStore::new(Arc::new(HexIdGenerator)));
    let state = AppState::new(
        store.clone(),
        Arc::new(HexIdGenerator),
        Arc::new(hookd_jobs::EvictionMetrics::default()),
        Arc::new(MemoryStats::default),
        BASE_DOMAIN,
        API_KEY,
    );
    (create_api_routes(state), store)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &Router, count: Option<u32>) -> Vec<String> {
    let body = match count {
        Some(n) => Body::from(json!({ "count": n }).to_string()),
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(
            Request::post("/register")
                .header("X-Api-Key", API_KEY)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    match count {
        Some(n) if n > 1 => json["hooks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h["id"].as_str().unwrap().to_string())
            .collect(),
        _ => vec![json["id"].as_str().unwrap().to_string()],
    }
}

/// Scenario 4 (spec.md §8): 3 hooks registered in one call, 2 DNS queries
/// fired at h1, 1 HTTP request at h2, none at h3. A single batch poll must
/// report the right count per id and a "Hook not found" error for an id
/// that was never registered.
#[tokio::test]
async fn multi_register_and_batch_poll_separates_hooks() {
    let (app, store) = harness();
    let ids = register(&app, Some(3)).await;
    let (h1, h2, h3) = (&ids[0], &ids[1], &ids[2]);

    for i in 0..2 {
        store.add_interaction(
            h1,
            Interaction::new_dns(format!("dns-{i}"), h1, "198.51.100.9", Utc::now(), format!("{h1}.{BASE_DOMAIN}"), "A"),
        );
    }

    let capture = app
        .clone()
        .oneshot(
            Request::post("/webhook")
                .header("host", format!("{h2}.{BASE_DOMAIN}"))
                .body(Body::from("payload"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(capture.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::post("/poll")
                .header("X-Api-Key", API_KEY)
                .header("content-type", "application/json")
                .body(Body::from(json!([h1, h2, h3, "nope"]).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["results"][h1]["interactions"].as_array().unwrap().len(), 2);
    assert_eq!(json["results"][h2]["interactions"].as_array().unwrap().len(), 1);
    assert_eq!(json["results"][h3]["interactions"], json!([]));
    assert_eq!(json["results"]["nope"]["error"], "Hook not found");
}

/// Scenario 6 (spec.md §8): a short-lived interaction survives until the
/// evictor's expired pass runs, after which polling returns nothing and
/// `/metrics` reflects the eviction.
#[tokio::test]
async fn expired_interactions_are_evicted_and_counted() {
    let (app, store) = harness();
    let ids = register(&app, None).await;
    let id = &ids[0];

    store.add_interaction(
        id,
        Interaction::new_dns("i1", id, "203.0.113.5", Utc::now(), format!("{id}.{BASE_DOMAIN}"), "A"),
    );

    let eviction_config = EvictionConfig {
        interaction_ttl: Duration::from_millis(100),
        hook_ttl: Duration::from_secs(3600),
        max_per_hook: 1000,
        max_memory_mb: u64::MAX,
        cleanup_interval: Duration::from_millis(50),
    };
    tokio::time::sleep(Duration::from_millis(200)).await;

    let job = EvictionJob::new(store.clone(), eviction_config);
    job.run_tick();
    let metrics = job.metrics().snapshot();

    let poll_response = app
        .clone()
        .oneshot(
            Request::get(format!("/poll/{id}"))
                .header("X-Api-Key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let polled = body_json(poll_response).await;
    assert_eq!(polled["interactions"], json!([]));
    assert!(metrics.by_strategy.expired >= 1);
}

/// Batch-poll result keys must equal the requested id set, with exactly
/// one of `interactions` or `error` populated per value (spec.md §8).
#[tokio::test]
async fn batch_poll_result_keys_equal_the_requested_set() {
    let (app, _store) = harness();
    let ids = register(&app, None).await;
    let id = &ids[0];

    let response = app
        .oneshot(
            Request::post("/poll")
                .header("X-Api-Key", API_KEY)
                .header("content-type", "application/json")
                .body(Body::from(json!([id, "ghost"]).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    let results = json["results"].as_object().unwrap();
    let mut keys: Vec<&String> = results.keys().collect();
    keys.sort();
    assert_eq!(keys, vec!["ghost", id]);
    assert!(results[id.as_str()].get("interactions").is_some());
    assert!(results["ghost"].get("error").is_some());
}
