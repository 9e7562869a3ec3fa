pub mod eviction;
pub mod runner;

pub use eviction::{EvictionJob, EvictionMetrics};
pub use runner::JobRunner;
