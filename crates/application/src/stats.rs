use hookd_domain::{HookStats, InteractionStats};

/// The portion of `/metrics` the Store can answer on its own, without
/// reaching into the evictor's counters or the allocator's stats.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    pub hooks: HookStats,
    pub interactions: InteractionStats,
}
