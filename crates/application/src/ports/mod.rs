mod hook_store;
mod id_generator;

pub use hook_store::{HookStore, PollOutcome};
pub use id_generator::{HexIdGenerator, IdGenerator};
