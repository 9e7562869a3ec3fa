pub mod api_key;
pub mod host_dispatch;

pub use api_key::require_api_key;
pub use host_dispatch::dispatch_by_host;
