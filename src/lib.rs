//! In-process messaging for plugin hosts.
//!
//! Payloads travel in a [`Container`] that either copies them (serializable
//! values) or shares them (live handles). A [`Hub`] routes containers to
//! event consumers, behind optional interceptors, or through breakable
//! pipelines.

extern crate self as switchyard;

mod bus;
mod container;
mod context;
mod error;
mod hub;
mod panic;
mod pipeline;
mod route;

#[cfg(feature = "adapters")]
pub mod adapters;

pub use bus::{Delivery, EventBus};
pub use container::{
    ConstructionError, Container, ContainerError, Discipline, Finalizable, FinalizeResult, Shared,
    TypeTag, Unwrapped,
};
pub use context::{
    current_handler_index, in_interceptor, in_pipeline, signal_block, signal_continue,
    ContextError,
};
pub use error::HandlerError;
pub use hub::{Hub, Registration, RouteKind};
pub use pipeline::{Pipeline, PipelineOutcome};
pub use route::{Handler, HandlerResult, RegistrationError, RoutePattern, DEFAULT_PRIORITY};

// Names plugin code calls from inside handlers.
pub use context::{signal_block as block_event, signal_continue as continue_pipeline};

pub use switchyard_macros::{consumer, consumer_re, interceptor, interceptor_re, pipe, pipe_re};
