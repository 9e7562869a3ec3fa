//! Hookd Domain Layer
pub mod acme_record;
pub mod config;
pub mod errors;
pub mod hook;
pub mod interaction;
pub mod stats;

pub use acme_record::AcmeRecord;
pub use config::{CliOverrides, Config};
pub use errors::DomainError;
pub use hook::{Hook, HookView};
pub use interaction::{HttpData, Interaction, InteractionData, InteractionKind};
pub use stats::{
    EvictionStats, EvictionsByStrategy, HookStats, InteractionStats, InteractionsByType,
    MemoryStats, Stats,
};
