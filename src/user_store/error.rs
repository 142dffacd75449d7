use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
#[allow(dead_code)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("User store error: {0}")]
    StoreError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
