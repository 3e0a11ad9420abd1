use thiserror::Error;

/// A handler could not be registered. Surfaces at load time.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Pattern routes deliver the matched identifier as the first argument,
    /// so they only accept [`Handler::routed`](super::Handler::routed).
    #[error("pattern route '{route}' requires a handler taking the routing key as its first argument")]
    MissingRoutingKey { route: String },

    #[error("route identifier must not be empty")]
    EmptyRoute,

    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
