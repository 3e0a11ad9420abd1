use tracing::debug;

use super::registration::{Registration, RouteKind};
use crate::bus::{Delivery, EventBus};
use crate::container::Container;
use crate::pipeline::{Pipeline, PipelineOutcome};
use crate::route::{Handler, RegistrationError};

/// The messaging hub a host hands to its plugins.
///
/// Owns one [`EventBus`] and one [`Pipeline`]. Share it behind an `Arc`;
/// every method takes `&self`.
///
/// ```
/// use switchyard::{continue_pipeline, Container, Handler, Hub, PipelineOutcome};
///
/// let hub = Hub::new();
/// hub.on_pipeline("msg.incoming", 10, Handler::payload(|_| {
///     continue_pipeline()?;
///     Ok(())
/// }))
/// .unwrap();
///
/// let outcome = hub.run_pipeline("msg.incoming", &Container::wrap("hi".to_string()).unwrap());
/// assert_eq!(outcome, PipelineOutcome::Completed { ran: 1 });
/// ```
pub struct Hub {
    events: EventBus,
    pipeline: Pipeline,
}

impl Hub {
    pub fn new() -> Self {
        Self {
            events: EventBus::new(),
            pipeline: Pipeline::new(),
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    // ========================================================================
    // Registration
    // ========================================================================

    pub fn on_event(
        &self,
        id: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.events.register_consumer(id, priority, handler)
    }

    pub fn on_event_pattern(
        &self,
        pattern: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.events.register_consumer_pattern(pattern, priority, handler)
    }

    pub fn on_interceptor(
        &self,
        id: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.events.register_interceptor(id, priority, handler)
    }

    pub fn on_interceptor_pattern(
        &self,
        pattern: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.events.register_interceptor_pattern(pattern, priority, handler)
    }

    pub fn on_pipeline(
        &self,
        id: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.pipeline.register(id, priority, handler)
    }

    pub fn on_pipeline_pattern(
        &self,
        pattern: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.pipeline.register_pattern(pattern, priority, handler)
    }

    /// Install one attribute-generated registration.
    pub fn install(&self, registration: Registration) -> Result<(), RegistrationError> {
        let (kind, route, pattern, priority, handler) = registration.into_parts();
        match (kind, pattern) {
            (RouteKind::Consumer, false) => self.on_event(&route, priority, handler),
            (RouteKind::Consumer, true) => self.on_event_pattern(&route, priority, handler),
            (RouteKind::Interceptor, false) => self.on_interceptor(&route, priority, handler),
            (RouteKind::Interceptor, true) => {
                self.on_interceptor_pattern(&route, priority, handler)
            }
            (RouteKind::Pipeline, false) => self.on_pipeline(&route, priority, handler),
            (RouteKind::Pipeline, true) => self.on_pipeline_pattern(&route, priority, handler),
        }
    }

    /// Install registrations in order. Stops at the first failure; the ones
    /// before it stay installed.
    pub fn install_all<I>(&self, registrations: I) -> Result<usize, RegistrationError>
    where
        I: IntoIterator<Item = Registration>,
    {
        let mut installed = 0;
        for registration in registrations {
            self.install(registration)?;
            installed += 1;
        }
        debug!(installed, "registrations installed");
        Ok(installed)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    pub fn emit_event(&self, id: &str, content: &Container) -> Delivery {
        self.events.dispatch_notify(id, content)
    }

    pub fn emit_chain(&self, id: &str, content: &Container) -> Delivery {
        self.events.dispatch_chain(id, content)
    }

    pub fn run_pipeline(&self, id: &str, content: &Container) -> PipelineOutcome {
        self.pipeline.dispatch(id, content)
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}
