use tracing::{debug, trace, warn};

use super::outcome::PipelineOutcome;
use crate::container::Container;
use crate::context::PipelineScope;
use crate::route::{Handler, Registry, RegistrationError};

/// Ordered, breakable handler chains keyed by identifier.
///
/// Each handler has to call [`continue_pipeline`](crate::continue_pipeline)
/// for the next one to run. Handlers receive the caller's container and may
/// replace its payload.
pub struct Pipeline {
    handlers: Registry,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            handlers: Registry::new("pipeline"),
        }
    }

    pub fn register(
        &self,
        id: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.handlers.register(id, priority, handler)
    }

    pub fn register_pattern(
        &self,
        pattern: &str,
        priority: i32,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.handlers.register_pattern(pattern, priority, handler)
    }

    pub fn dispatch(&self, id: &str, content: &Container) -> PipelineOutcome {
        let handlers = self.handlers.resolve(id);
        if handlers.is_empty() {
            trace!(route = id, "no pipeline handlers");
            return PipelineOutcome::Empty;
        }

        let scope = PipelineScope::enter();
        for (index, entry) in handlers.iter().enumerate() {
            scope.begin(index);
            trace!(route = id, index, priority = entry.priority, "pipeline handler");

            if let Err(err) = entry.handler.call(id, content) {
                warn!(route = id, index, error = %err, "pipeline handler failed");
                return PipelineOutcome::Failed { index };
            }
            if !scope.should_continue() {
                debug!(route = id, index, "pipeline stopped");
                return PipelineOutcome::Stopped { index };
            }
        }

        debug!(route = id, ran = handlers.len(), "pipeline completed");
        PipelineOutcome::Completed {
            ran: handlers.len(),
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn routes(&self) -> Vec<String> {
        self.handlers.routes()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
