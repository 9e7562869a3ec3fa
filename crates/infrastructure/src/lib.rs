//! Hookd Infrastructure Layer
pub mod acme_store;
pub mod dns;
pub mod memory_stats;
pub mod outbound_ip;
pub mod resolver_override;
pub mod tls;

pub use acme_store::AcmeRecordStore;
pub use dns::HookdDnsHandler;
pub use resolver_override::RecursiveResolver;
pub use tls::TlsLifecycle;
