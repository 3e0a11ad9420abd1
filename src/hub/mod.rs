//! The host-facing surface: one [`Hub`] owning the event bus and the
//! pipeline, plus [`Registration`] values produced by the attribute macros.

#[allow(clippy::module_inception)]
mod hub;
mod registration;

pub use hub::Hub;
pub use registration::{Registration, RouteKind};
