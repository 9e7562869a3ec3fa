mod metrics;
mod poll;
mod register;

pub use metrics::metrics;
pub use poll::{poll_batch, poll_one};
pub use register::register;
