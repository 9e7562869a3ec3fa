use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Hook not found")]
    HookNotFound,

    #[error("Invalid or missing API key")]
    AuthFailure,

    #[error("invalid request body")]
    BadRequest,
}
