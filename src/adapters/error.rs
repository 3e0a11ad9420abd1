use thiserror::Error;

use crate::error::HandlerError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("adapter already registered: {0}")]
    AlreadyRegistered(String),

    #[error("adapter not registered: {0}")]
    NotRegistered(String),

    #[error("adapter version mismatch: expected {expected}, got {got}")]
    VersionMismatch { expected: String, got: String },
}

impl From<AdapterError> for HandlerError {
    fn from(err: AdapterError) -> Self {
        HandlerError::Other(Box::new(err))
    }
}
