use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookStats {
    pub active: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionsByType {
    pub dns: u64,
    pub http: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionStats {
    pub total: u64,
    pub by_type: InteractionsByType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvictionsByStrategy {
    pub expired: u64,
    pub overflow: u64,
    pub memory_pressure: u64,
    pub hook_expired: u64,
}

impl EvictionsByStrategy {
    pub fn total(&self) -> u64 {
        self.expired + self.overflow + self.memory_pressure + self.hook_expired
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvictionStats {
    pub total: u64,
    pub by_strategy: EvictionsByStrategy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStats {
    pub alloc_mb: f64,
    pub heap_inuse_mb: f64,
    pub sys_mb: f64,
    pub gc_runs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    pub hooks: HookStats,
    pub interactions: InteractionStats,
    pub evictions: EvictionStats,
    pub memory: MemoryStats,
}
