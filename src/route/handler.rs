use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::container::Container;
use crate::error::HandlerError;
use crate::panic::panic_message;

/// What every handler returns.
pub type HandlerResult = Result<(), HandlerError>;

type PayloadFn = dyn Fn(&Container) -> HandlerResult + Send + Sync;
type RoutedFn = dyn Fn(&str, &Container) -> HandlerResult + Send + Sync;

/// A registered callback.
///
/// Two shapes exist. Exact routes accept either; pattern routes require
/// [`Handler::routed`] so the handler learns which identifier matched.
///
/// ```
/// use switchyard::Handler;
///
/// let refresh = Handler::payload(|content| {
///     let _key: String = content.unwrap::<String>()?.into_owned();
///     Ok(())
/// });
/// assert!(!refresh.takes_routing_key());
///
/// let send = Handler::routed(|src, _content| {
///     let _group = src.rsplit('-').next();
///     Ok(())
/// });
/// assert!(send.takes_routing_key());
/// ```
#[derive(Clone)]
pub enum Handler {
    Payload(Arc<PayloadFn>),
    Routed(Arc<RoutedFn>),
}

impl Handler {
    /// A handler that only receives the payload.
    pub fn payload<F>(f: F) -> Self
    where
        F: Fn(&Container) -> HandlerResult + Send + Sync + 'static,
    {
        Handler::Payload(Arc::new(f))
    }

    /// A handler that receives the routing key, then the payload.
    pub fn routed<F>(f: F) -> Self
    where
        F: Fn(&str, &Container) -> HandlerResult + Send + Sync + 'static,
    {
        Handler::Routed(Arc::new(f))
    }

    pub fn takes_routing_key(&self) -> bool {
        matches!(self, Handler::Routed(_))
    }

    /// Invoke the callback. A panic is caught and reported as
    /// [`HandlerError::Panicked`].
    pub(crate) fn call(&self, id: &str, content: &Container) -> HandlerResult {
        let outcome = catch_unwind(AssertUnwindSafe(|| match self {
            Handler::Payload(f) => f(content),
            Handler::Routed(f) => f(id, content),
        }));
        match outcome {
            Ok(result) => result,
            Err(panic) => Err(HandlerError::Panicked(panic_message(panic.as_ref()))),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Payload(_) => f.write_str("Handler::Payload"),
            Handler::Routed(_) => f.write_str("Handler::Routed"),
        }
    }
}

/// One subscription inside a registry. Immutable once created.
#[derive(Debug)]
pub(crate) struct Entry {
    pub(crate) handler: Handler,
    pub(crate) priority: i32,
    pub(crate) sequence: u64,
}
