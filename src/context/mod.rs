//! Dispatch-scoped control signals.
//!
//! Handlers steer the dispatcher out-of-band instead of through their return
//! value, so every handler keeps the same signature across the event bus and
//! the pipeline:
//!
//! - a pipeline handler calls [`signal_continue`] to let the next handler run;
//! - an interceptor calls [`signal_block`] to keep an event from its consumers.
//!
//! The flags live in thread-local frames that the dispatcher pushes for the
//! duration of one dispatch and pops on return (or unwind). Concurrent
//! dispatches on other threads never see each other's frames, and a nested
//! dispatch started from inside a handler gets its own frame.

mod error;
mod scope;

pub use error::ContextError;
pub use scope::{
    current_handler_index, in_interceptor, in_pipeline, signal_block, signal_continue,
};

pub(crate) use scope::{InterceptScope, PipelineScope};
