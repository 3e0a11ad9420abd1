use tracing::{debug, trace, warn};

use super::delivery::Delivery;
use crate::container::Container;
use crate::context::InterceptScope;
use crate::route::{Handler, Registry, RegistrationError};

#[derive(Debug, Clone, Copy)]
enum Mode {
    Notify,
    Chain,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Mode::Notify => "notify",
            Mode::Chain => "chain",
        }
    }
}

/// Consumers and interceptors keyed by event identifier.
///
/// Notify and chain share one consumer registry; they differ only in what the
/// consumers receive. Notify hands out a sealed view, so
/// [`Container::replace`] fails. Chain hands out the caller's container, so
/// a replacement is visible to later consumers and to the caller.
pub struct EventBus {
    consumers: Registry,
    interceptors: Registry,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            consumers: Registry::new("consumer"),
            interceptors: Registry::new("interceptor"),
        }
    }

    pub fn register_consumer(
        &self,
        id: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.consumers.register(id, priority, handler)
    }

    /// Register a consumer for every identifier matching `pattern`. The
    /// handler must be [`Handler::routed`].
    pub fn register_consumer_pattern(
        &self,
        pattern: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.consumers.register_pattern(pattern, priority, handler)
    }

    pub fn register_interceptor(
        &self,
        id: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.interceptors.register(id, priority, handler)
    }

    pub fn register_interceptor_pattern(
        &self,
        pattern: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.interceptors.register_pattern(pattern, priority, handler)
    }

    /// Broadcast to every matching consumer. Consumers read a sealed view.
    pub fn dispatch_notify(&self, id: &str, content: &Container) -> Delivery {
        self.dispatch(Mode::Notify, id, content)
    }

    /// Broadcast to every matching consumer, each of which may replace the
    /// payload for the ones after it.
    pub fn dispatch_chain(&self, id: &str, content: &Container) -> Delivery {
        self.dispatch(Mode::Chain, id, content)
    }

    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }

    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    /// Exact identifiers and patterns that have at least one consumer.
    pub fn consumer_routes(&self) -> Vec<String> {
        self.consumers.routes()
    }

    fn dispatch(&self, mode: Mode, id: &str, content: &Container) -> Delivery {
        if self.intercepted(id, content) {
            debug!(route = id, mode = mode.as_str(), "event blocked by interceptor");
            return Delivery::blocked();
        }

        let consumers = self.consumers.resolve(id);
        if consumers.is_empty() {
            trace!(route = id, mode = mode.as_str(), "no consumers");
            return Delivery::default();
        }

        let view;
        let target = match mode {
            Mode::Notify => {
                view = content.sealed();
                &view
            }
            Mode::Chain => content,
        };

        let mut delivery = Delivery::default();
        for (index, entry) in consumers.iter().enumerate() {
            trace!(route = id, mode = mode.as_str(), index, priority = entry.priority, "consumer");
            match entry.handler.call(id, target) {
                Ok(()) => delivery.delivered += 1,
                Err(err) => {
                    warn!(
                        route = id,
                        mode = mode.as_str(),
                        index,
                        priority = entry.priority,
                        error = %err,
                        "consumer failed"
                    );
                    delivery.failed += 1;
                }
            }
        }
        debug!(
            route = id,
            mode = mode.as_str(),
            delivered = delivery.delivered,
            failed = delivery.failed,
            "dispatched"
        );
        delivery
    }

    /// Run the interceptor stage. A failing interceptor does not block unless
    /// it set the flag before failing.
    fn intercepted(&self, id: &str, content: &Container) -> bool {
        let interceptors = self.interceptors.resolve(id);
        if interceptors.is_empty() {
            return false;
        }

        let view = content.sealed();
        let scope = InterceptScope::enter();
        for (index, entry) in interceptors.iter().enumerate() {
            trace!(route = id, index, priority = entry.priority, "interceptor");
            if let Err(err) = entry.handler.call(id, &view) {
                warn!(route = id, index, error = %err, "interceptor failed");
            }
            if scope.blocked() {
                return true;
            }
        }
        false
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
