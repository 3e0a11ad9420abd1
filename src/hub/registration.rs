use crate::route::Handler;

/// Which registry a [`Registration`] lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Consumer,
    Interceptor,
    Pipeline,
}

/// A deferred registration, installed into a [`Hub`](super::Hub) later.
///
/// The `#[consumer]`, `#[interceptor]` and `#[pipe]` attributes (and their
/// `_re` pattern forms) generate a `<fn>_registration()` function returning
/// one of these.
#[derive(Debug, Clone)]
pub struct Registration {
    kind: RouteKind,
    route: String,
    pattern: bool,
    priority: i32,
    handler: Handler,
}

impl Registration {
    fn new(kind: RouteKind, route: &str, pattern: bool, priority: i32, handler: Handler) -> Self {
        Self {
            kind,
            route: route.to_string(),
            pattern,
            priority,
            handler,
        }
    }

    pub fn consumer(route: &str, priority: i32, handler: Handler) -> Self {
        Self::new(RouteKind::Consumer, route, false, priority, handler)
    }

    pub fn consumer_pattern(pattern: &str, priority: i32, handler: Handler) -> Self {
        Self::new(RouteKind::Consumer, pattern, true, priority, handler)
    }

    pub fn interceptor(route: &str, priority: i32, handler: Handler) -> Self {
        Self::new(RouteKind::Interceptor, route, false, priority, handler)
    }

    pub fn interceptor_pattern(pattern: &str, priority: i32, handler: Handler) -> Self {
        Self::new(RouteKind::Interceptor, pattern, true, priority, handler)
    }

    pub fn pipe(route: &str, priority: i32, handler: Handler) -> Self {
        Self::new(RouteKind::Pipeline, route, false, priority, handler)
    }

    pub fn pipe_pattern(pattern: &str, priority: i32, handler: Handler) -> Self {
        Self::new(RouteKind::Pipeline, pattern, true, priority, handler)
    }

    /// Replace the priority, keeping everything else.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn is_pattern(&self) -> bool {
        self.pattern
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub(crate) fn into_parts(self) -> (RouteKind, String, bool, i32, Handler) {
        (self.kind, self.route, self.pattern, self.priority, self.handler)
    }
}
