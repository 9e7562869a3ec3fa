pub mod acme_client;
pub mod cert_cache;
pub mod error_filter;
pub mod listener;

pub use listener::TlsLifecycle;
