mod duration;
mod errors;
mod eviction;
mod observability;
mod root;
mod server;

pub use errors::ConfigError;
pub use eviction::EvictionConfig;
pub use observability::{LogFormat, LogLevel, ObservabilityConfig};
pub use root::{CliOverrides, Config};
pub use server::{ApiConfig, DnsServerConfig, HttpServerConfig, HttpsServerConfig, ServerConfig};
