use std::error::Error;

use thiserror::Error;

use crate::container::{ConstructionError, ContainerError};
use crate::context::ContextError;

/// Error returned by a handler.
///
/// Dispatchers never hand these back to the producer: the event bus logs them
/// and moves on to the next consumer, the pipeline logs them and stops.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler refused the payload.
    #[error("rejected: {0}")]
    Rejected(String),

    /// Unwrapping or replacing the payload failed.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// Wrapping a value for a nested dispatch failed.
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// A control signal was raised outside its stage.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The handler panicked; the dispatcher caught the unwind.
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// Any other failure.
    #[error("handler error: {0}")]
    Other(Box<dyn Error + Send + Sync>),
}

impl HandlerError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        HandlerError::Rejected(reason.into())
    }

    pub fn other(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        HandlerError::Other(err.into())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::Other(Box::new(err))
    }
}
