use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvictionConfig {
    #[serde(with = "duration", default = "default_interaction_ttl")]
    pub interaction_ttl: Duration,

    #[serde(with = "duration", default = "default_hook_ttl")]
    pub hook_ttl: Duration,

    #[serde(default = "default_max_per_hook")]
    pub max_per_hook: usize,

    #[serde(default = "default_max_memory_mb")]
    pub max_memory_mb: u64,

    #[serde(with = "duration", default = "default_cleanup_interval")]
    pub cleanup_interval: Duration,
}

impl Default for EvictionConfig {
    fn default() -> Self {
        Self {
            interaction_ttl: default_interaction_ttl(),
            hook_ttl: default_hook_ttl(),
            max_per_hook: default_max_per_hook(),
            max_memory_mb: default_max_memory_mb(),
            cleanup_interval: default_cleanup_interval(),
        }
    }
}

fn default_interaction_ttl() -> Duration {
    Duration::from_secs(24 * 3600)
}

fn default_hook_ttl() -> Duration {
    Duration::from_secs(7 * 24 * 3600)
}

fn default_max_per_hook() -> usize {
    1000
}

fn default_max_memory_mb() -> u64 {
    512
}

fn default_cleanup_interval() -> Duration {
    Duration::from_secs(10)
}
