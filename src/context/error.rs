use thiserror::Error;

/// A control signal was raised outside the dispatch stage that understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("continue_pipeline() called outside of a pipeline handler")]
    NoPipeline,

    #[error("block_event() called outside of an interceptor")]
    NoInterceptor,
}
