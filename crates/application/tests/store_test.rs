use std::sync::Arc;

use chrono::Utc;
use hookd_application::ports::PollOutcome;
use hookd_application::{HexIdGenerator, HookStore, InMemoryHookStore};
use hookd_domain::Interaction;

fn store() -> InMemoryHookStore {
    InMemoryHookStore::new(Arc::new(HexIdGenerator))
}

#[test]
fn poll_is_atomic_read_and_clear() {
    let store = store();
    let hook = store.create_hook("hookd.test.local");
    store.add_interaction(
        &hook.id,
        Interaction::new_dns(
            "i1",
            &hook.id,
            "10.0.0.1",
            Utc::now(),
            hook.dns(),
            "A",
        ),
    );

    let first = store.poll(&hook.id);
    assert_eq!(first.len(), 1);

    let second = store.poll(&hook.id);
    assert!(second.is_empty(), "poll must drain interactions exactly once");
}

#[test]
fn interactions_come_back_in_capture_order() {
    let store = store();
    let hook = store.create_hook("hookd.test.local");
    for i in 0..5 {
        store.add_interaction(
            &hook.id,
            Interaction::new_dns(
                format!("i{i}"),
                &hook.id,
                "10.0.0.1",
                Utc::now(),
                hook.dns(),
                "A",
            ),
        );
    }

    let drained = store.poll(&hook.id);
    let ids: Vec<&str> = drained.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["i0", "i1", "i2", "i3", "i4"]);
}

#[test]
fn unknown_hook_operations_are_silent_no_ops() {
    let store = store();

    assert!(store.get_hook("does-not-exist").is_none());
    assert!(store.poll("does-not-exist").is_empty());

    // Must not panic and must not create an entry.
    store.add_interaction(
        "does-not-exist",
        Interaction::new_dns("i1", "does-not-exist", "10.0.0.1", Utc::now(), "x", "A"),
    );
    assert!(store.get_hook("does-not-exist").is_none());
}

#[test]
fn batch_poll_distinguishes_empty_from_not_found() {
    let store = store();
    let hook = store.create_hook("hookd.test.local");

    let ids = vec![hook.id.clone(), "missing".to_string()];
    let mut results = store.poll_batch(&ids);

    match results.remove(&hook.id) {
        Some(PollOutcome::Interactions(interactions)) => assert!(interactions.is_empty()),
        other => panic!("expected an empty interaction list, got {other:?}"),
    }
    match results.remove("missing") {
        Some(PollOutcome::NotFound) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn stats_count_hooks_and_pending_interactions_by_type() {
    let store = store();
    let hook_a = store.create_hook("hookd.test.local");
    let hook_b = store.create_hook("hookd.test.local");

    store.add_interaction(
        &hook_a.id,
        Interaction::new_dns("i1", &hook_a.id, "10.0.0.1", Utc::now(), hook_a.dns(), "A"),
    );
    store.add_interaction(
        &hook_b.id,
        Interaction::new_http(
            "i2",
            &hook_b.id,
            "10.0.0.2",
            Utc::now(),
            "GET",
            "/",
            Default::default(),
            Vec::new(),
        ),
    );

    let stats = store.stats();
    assert_eq!(stats.hooks.active, 2);
    assert_eq!(stats.interactions.total, 2);
    assert_eq!(stats.interactions.by_type.dns, 1);
    assert_eq!(stats.interactions.by_type.http, 1);
}

#[test]
fn delete_hook_removes_it_and_its_interactions() {
    let store = store();
    let hook = store.create_hook("hookd.test.local");
    store.add_interaction(
        &hook.id,
        Interaction::new_dns("i1", &hook.id, "10.0.0.1", Utc::now(), hook.dns(), "A"),
    );

    store.delete_hook(&hook.id);

    assert!(store.get_hook(&hook.id).is_none());
    assert!(store.poll(&hook.id).is_empty());
}
