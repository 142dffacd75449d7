use thiserror::Error;

/// Errors that can occur while opening a checkout session.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("Checkout session rejected: {0}")]
    SessionRejected(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
