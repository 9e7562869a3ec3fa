use std::collections::HashMap;

use hookd_domain::{Hook, Interaction};

use crate::stats::StoreStats;

/// Outcome of a single id within a [`HookStore::poll_batch`] call.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    Interactions(Vec<Interaction>),
    NotFound,
}

/// The store port (spec.md §4.1). Every method is synchronous and
/// non-blocking: the Store performs no I/O, so there is nothing to `.await`
/// and no reason to hold an executor thread hostage under the lock
/// (spec.md §5, "Store operations are non-blocking (no I/O under the
/// lock)"). Implementations must guarantee `poll` is observable as a
/// single atomic swap.
pub trait HookStore: Send + Sync {
    fn create_hook(&self, domain: &str) -> Hook;
    fn get_hook(&self, id: &str) -> Option<Hook>;
    /// No-op (not an error) when `hook_id` does not exist (I4).
    fn add_interaction(&self, hook_id: &str, interaction: Interaction);
    /// Atomic read-and-clear. Returns `[]` for an absent hook (I2).
    fn poll(&self, hook_id: &str) -> Vec<Interaction>;
    /// Per-id atomic, but the batch as a whole is not (spec.md §9).
    fn poll_batch(&self, ids: &[String]) -> HashMap<String, PollOutcome>;
    fn delete_interactions(&self, hook_id: &str, ids: &[String]);
    fn delete_hook(&self, id: &str);
    fn all_hooks(&self) -> Vec<Hook>;
    fn all_interactions(&self) -> HashMap<String, Vec<Interaction>>;
    fn stats(&self) -> StoreStats;
}
