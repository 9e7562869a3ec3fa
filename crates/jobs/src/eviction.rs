use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hookd_application::HookStore;
use hookd_domain::config::EvictionConfig;
use hookd_domain::EvictionStats;
use hookd_infrastructure::memory_stats::read_memory_stats;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Running counters for each eviction strategy, reported under
/// `evictions.by_strategy` in `/metrics` (spec.md §4.6).
#[derive(Default)]
pub struct EvictionMetrics {
    expired: AtomicU64,
    hook_expired: AtomicU64,
    overflow: AtomicU64,
    memory_pressure: AtomicU64,
    gc_runs: AtomicU64,
}

impl EvictionMetrics {
    pub fn snapshot(&self) -> EvictionStats {
        let by_strategy = hookd_domain::EvictionsByStrategy {
            expired: self.expired.load(Ordering::Relaxed),
            hook_expired: self.hook_expired.load(Ordering::Relaxed),
            overflow: self.overflow.load(Ordering::Relaxed),
            memory_pressure: self.memory_pressure.load(Ordering::Relaxed),
        };
        EvictionStats {
            total: by_strategy.total(),
            by_strategy,
        }
    }

    /// Number of jemalloc epoch advances ("GC cycles") forced by the
    /// memory-pressure pass, surfaced as `/metrics.memory.gc_runs`.
    pub fn gc_runs(&self) -> u64 {
        self.gc_runs.load(Ordering::Relaxed)
    }
}

/// Runs the four eviction passes of spec.md §4.6 on a single periodic
/// timer. Every pass is best-effort: the evictor never fails, it logs and
/// moves to the next pass (spec.md §4.6 "Failure semantics").
pub struct EvictionJob {
    store: Arc<dyn HookStore>,
    config: EvictionConfig,
    metrics: Arc<EvictionMetrics>,
    shutdown: CancellationToken,
}

impl EvictionJob {
    pub fn new(store: Arc<dyn HookStore>, config: EvictionConfig) -> Self {
        Self {
            store,
            config,
            metrics: Arc::new(EvictionMetrics::default()),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn metrics(&self) -> Arc<EvictionMetrics> {
        self.metrics.clone()
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.config.cleanup_interval.as_secs(),
            "starting eviction job"
        );
        let mut interval = tokio::time::interval(self.config.cleanup_interval);
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("eviction job: shutting down");
                    break;
                }
                _ = interval.tick() => {
                    self.run_tick();
                }
            }
        }
    }

    /// Runs one eviction tick immediately, outside the timer loop. Used by
    /// tests and available for an operator-triggered manual sweep.
    pub fn run_tick(&self) {
        self.evict_expired_interactions();
        self.evict_expired_hooks();
        self.evict_overflowing_hooks();
        self.evict_under_memory_pressure();
    }

    /// Pass 1: interaction TTL.
    fn evict_expired_interactions(&self) {
        let now = Utc::now();
        let ttl = self.config.interaction_ttl;
        let mut evicted = 0u64;

        for (hook_id, interactions) in self.store.all_interactions() {
            let stale: Vec<String> = interactions
                .iter()
                .filter(|i| now.signed_duration_since(i.timestamp).to_std().unwrap_or_default() >= ttl)
                .map(|i| i.id.clone())
                .collect();
            if stale.is_empty() {
                continue;
            }
            evicted += stale.len() as u64;
            self.store.delete_interactions(&hook_id, &stale);
        }

        if evicted > 0 {
            self.metrics.expired.fetch_add(evicted, Ordering::Relaxed);
            debug!(evicted, "interaction TTL pass evicted interactions");
        }
    }

    /// Pass 2: hook TTL, cascading.
    fn evict_expired_hooks(&self) {
        let now = Utc::now();
        let ttl = self.config.hook_ttl;
        let mut evicted = 0u64;

        for hook in self.store.all_hooks() {
            if now.signed_duration_since(hook.created_at).to_std().unwrap_or_default() >= ttl {
                self.store.delete_hook(&hook.id);
                evicted += 1;
            }
        }

        if evicted > 0 {
            self.metrics.hook_expired.fetch_add(evicted, Ordering::Relaxed);
            debug!(evicted, "hook TTL pass evicted hooks");
        }
    }

    /// Pass 3: per-hook FIFO cap.
    fn evict_overflowing_hooks(&self) {
        let cap = self.config.max_per_hook;
        let mut evicted = 0u64;

        for (hook_id, mut interactions) in self.store.all_interactions() {
            if interactions.len() <= cap {
                continue;
            }
            interactions.sort_by_key(|i| i.timestamp);
            let overflow = interactions.len() - cap;
            let victims: Vec<String> = interactions[..overflow].iter().map(|i| i.id.clone()).collect();
            evicted += victims.len() as u64;
            self.store.delete_interactions(&hook_id, &victims);
        }

        if evicted > 0 {
            self.metrics.overflow.fetch_add(evicted, Ordering::Relaxed);
            debug!(evicted, "per-hook cap pass evicted interactions");
        }
    }

    /// Pass 4: memory-pressure reclaim, oldest hooks first. Uses a single
    /// sort-by-age rather than the repeated full rescans a naive
    /// oldest-first search would need.
    fn evict_under_memory_pressure(&self) {
        let high_watermark = 0.9 * self.config.max_memory_mb as f64;
        let low_watermark = 0.8 * self.config.max_memory_mb as f64;

        let mut stats = read_memory_stats();
        self.metrics.gc_runs.fetch_add(1, Ordering::Relaxed);
        if stats.heap_inuse_mb < high_watermark {
            return;
        }

        let mut hooks = self.store.all_hooks();
        hooks.sort_by_key(|h| h.created_at);
        let interaction_counts = self.store.all_interactions();

        let mut evicted = 0u64;
        let mut since_last_measure = 0u32;

        for hook in hooks {
            if stats.heap_inuse_mb < low_watermark {
                break;
            }
            evicted += interaction_counts.get(&hook.id).map(Vec::len).unwrap_or(0) as u64;
            self.store.delete_hook(&hook.id);
            since_last_measure += 1;

            if since_last_measure >= 10 {
                stats = read_memory_stats();
                self.metrics.gc_runs.fetch_add(1, Ordering::Relaxed);
                since_last_measure = 0;
            }
        }

        if evicted > 0 {
            self.metrics.memory_pressure.fetch_add(evicted, Ordering::Relaxed);
            info!(evicted, heap_inuse_mb = stats.heap_inuse_mb, "memory pressure pass evicted hooks");
        }
    }
}
