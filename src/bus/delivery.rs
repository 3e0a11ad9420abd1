/// What happened to one notify or chain dispatch.
///
/// Purely informational: handler failures have already been logged by the
/// time the caller sees this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// An interceptor blocked the event; no consumer ran.
    pub intercepted: bool,
    /// Consumers that returned `Ok`.
    pub delivered: usize,
    /// Consumers that returned an error or panicked.
    pub failed: usize,
}

impl Delivery {
    pub(crate) fn blocked() -> Self {
        Self {
            intercepted: true,
            ..Self::default()
        }
    }

    /// Number of consumers that were invoked.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }

    /// No consumer matched and nothing intercepted the event.
    pub fn is_unrouted(&self) -> bool {
        !self.intercepted && self.attempted() == 0
    }
}
