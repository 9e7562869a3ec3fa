use std::sync::Arc;

use hookd_application::{HookStore, IdGenerator};
use hookd_domain::MemoryStats;
use hookd_jobs::EvictionMetrics;

/// Shared state threaded through every handler and the auth middleware.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HookStore>,
    pub id_gen: Arc<dyn IdGenerator>,
    pub eviction_metrics: Arc<EvictionMetrics>,
    pub memory_stats: Arc<dyn Fn() -> MemoryStats + Send + Sync>,
    pub base_domain: Arc<str>,
    pub api_key: Arc<str>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn HookStore>,
        id_gen: Arc<dyn IdGenerator>,
        eviction_metrics: Arc<EvictionMetrics>,
        memory_stats: Arc<dyn Fn() -> MemoryStats + Send + Sync>,
        base_domain: impl Into<Arc<str>>,
        api_key: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            store,
            id_gen,
            eviction_metrics,
            memory_stats,
            base_domain: base_domain.into(),
            api_key: api_key.into(),
        }
    }

    /// `true` when `host` (already stripped of a port) names the capture
    /// wildcard for some registered hook rather than the API's own domain.
    pub fn capture_label<'a>(&self, host: &'a str) -> Option<&'a str> {
        host.strip_suffix(&*self.base_domain)
            .and_then(|rest| rest.strip_suffix('.'))
            .filter(|label| !label.is_empty())
    }
}
