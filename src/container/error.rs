use thiserror::Error;

use super::Discipline;

/// A value was rejected when wrapping it into a container.
///
/// Always a producer bug: the value must be changed, retrying cannot help.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// The resource keeps a handle to a container, which would keep its own
    /// live count above zero forever.
    #[error("{0} holds a back-reference to a container; its finalizer could never run")]
    BackReference(&'static str),

    /// A container was passed where a payload was expected.
    #[error("containers cannot be nested; wrap the inner value instead")]
    NestedContainer,
}

/// Failure reading or writing the payload of an existing container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// The requested type differs from the declared payload type.
    #[error("type mismatch: container holds {declared}, requested {requested}")]
    TypeMismatch {
        declared: &'static str,
        requested: &'static str,
    },

    /// The operation needs a different transport discipline.
    #[error("discipline mismatch: operation requires {expected}, container is {actual}")]
    DisciplineMismatch {
        expected: Discipline,
        actual: Discipline,
    },

    /// Serialized bytes could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),

    /// A replacement value could not be encoded.
    #[error("encode failed: {0}")]
    Encode(String),

    /// The container is a read-only view handed to a notify consumer.
    #[error("container is sealed; payload may only be replaced in a chain dispatch")]
    Sealed,
}

impl From<bitcode::Error> for ContainerError {
    fn from(err: bitcode::Error) -> Self {
        ContainerError::Decode(err.to_string())
    }
}
