mod poll;
mod register;

pub use poll::{PollBatchResponse, PollResponse, PollResultEntry};
pub use register::RegisterRequest;
