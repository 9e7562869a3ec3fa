use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use hookd_domain::{Hook, HookStats, Interaction, InteractionKind, InteractionStats, InteractionsByType};
use parking_lot::RwLock;

use crate::ports::{HookStore, IdGenerator, PollOutcome};
use crate::stats::StoreStats;

/// A hook plus the interactions captured against it, stored together so a
/// single map lookup reaches both (spec.md §5: "the Store is guarded by a
/// single read/write mutex").
struct Entry {
    hook: Hook,
    interactions: Vec<Interaction>,
}

/// The reference `HookStore` implementation. One `RwLock` guards the whole
/// map, deliberately not sharded: `poll` must be observable as a single
/// atomic swap (I2), and a sharded map only gives that per-shard, not
/// per-hook-across-the-whole-store.
pub struct InMemoryHookStore {
    id_gen: Arc<dyn IdGenerator>,
    inner: RwLock<HashMap<String, Entry, ahash::RandomState>>,
}

impl InMemoryHookStore {
    pub fn new(id_gen: Arc<dyn IdGenerator>) -> Self {
        Self {
            id_gen,
            inner: RwLock::new(HashMap::default()),
        }
    }
}

impl Default for InMemoryHookStore {
    fn default() -> Self {
        Self::new(Arc::new(crate::ports::HexIdGenerator))
    }
}

impl HookStore for InMemoryHookStore {
    fn create_hook(&self, domain: &str) -> Hook {
        let id = self.id_gen.generate();
        let hook = Hook::new(id.clone(), domain.to_string(), Utc::now());
        self.inner.write().insert(
            id,
            Entry {
                hook: hook.clone(),
                interactions: Vec::new(),
            },
        );
        hook
    }

    fn get_hook(&self, id: &str) -> Option<Hook> {
        self.inner.read().get(id).map(|entry| entry.hook.clone())
    }

    fn add_interaction(&self, hook_id: &str, interaction: Interaction) {
        if let Some(entry) = self.inner.write().get_mut(hook_id) {
            entry.interactions.push(interaction);
        }
        // Unknown hook_id: silent no-op (I4). There is nowhere to record
        // this capture once its hook is gone.
    }

    fn poll(&self, hook_id: &str) -> Vec<Interaction> {
        match self.inner.write().get_mut(hook_id) {
            Some(entry) => std::mem::take(&mut entry.interactions),
            None => Vec::new(),
        }
    }

    fn poll_batch(&self, ids: &[String]) -> HashMap<String, PollOutcome> {
        let mut out = HashMap::with_capacity(ids.len());
        for id in ids {
            let mut guard = self.inner.write();
            let outcome = match guard.get_mut(id) {
                Some(entry) => PollOutcome::Interactions(std::mem::take(&mut entry.interactions)),
                None => PollOutcome::NotFound,
            };
            drop(guard);
            out.insert(id.clone(), outcome);
        }
        out
    }

    fn delete_interactions(&self, hook_id: &str, ids: &[String]) {
        if let Some(entry) = self.inner.write().get_mut(hook_id) {
            entry.interactions.retain(|i| !ids.contains(&i.id));
        }
    }

    fn delete_hook(&self, id: &str) {
        self.inner.write().remove(id);
    }

    fn all_hooks(&self) -> Vec<Hook> {
        self.inner.read().values().map(|e| e.hook.clone()).collect()
    }

    fn all_interactions(&self) -> HashMap<String, Vec<Interaction>> {
        self.inner
            .read()
            .iter()
            .map(|(id, entry)| (id.clone(), entry.interactions.clone()))
            .collect()
    }

    fn stats(&self) -> StoreStats {
        let guard = self.inner.read();
        let mut by_type = InteractionsByType::default();
        let mut total = 0u64;
        for entry in guard.values() {
            for interaction in &entry.interactions {
                total += 1;
                match interaction.kind() {
                    InteractionKind::Dns => by_type.dns += 1,
                    InteractionKind::Http => by_type.http += 1,
                }
            }
        }
        StoreStats {
            hooks: HookStats {
                active: guard.len() as u64,
            },
            interactions: InteractionStats { total, by_type },
        }
    }
}
