use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("No books found: {0}")]
    NotFound(String),
    #[error("Payment session failed: {0}")]
    PaymentFailed(String),
    #[error("Order store error: {0}")]
    StoreError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
