use thiserror::Error;

/// Errors that can occur during book catalog operations.
#[derive(Debug, Clone, Error, PartialEq)]
#[allow(dead_code)]
pub enum BookError {
    #[error("Book not found: {0}")]
    NotFound(String),
    #[error("Book store error: {0}")]
    StoreError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
