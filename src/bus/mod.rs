//! Event bus: interceptors, then consumers.
//!
//! ```text
//!   dispatch_notify / dispatch_chain(id, &container)
//!        │
//!        ▼
//!   interceptors (priority desc) ──block_event()──► stop, Delivery { intercepted }
//!        │ none blocked
//!        ▼
//!   consumers (priority desc) ── errors logged, every consumer runs
//!        │
//!        ▼
//!   Delivery { delivered, failed }
//! ```
//!
//! Notify consumers see a sealed view of the payload. Chain consumers see the
//! caller's container and may [`replace`](crate::Container::replace) it.

mod delivery;
mod event_bus;

pub use delivery::Delivery;
pub use event_bus::EventBus;
