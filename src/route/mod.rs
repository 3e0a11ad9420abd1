//! Routing shared by the event bus and the pipeline.
//!
//! ```text
//!   register("user.login", h, 5) ──┐
//!   register_pattern("user.*", h) ─┼──► Registry ──resolve("user.login")──► [h5, h0, ...]
//!   register("user.login", h, 0) ──┘    exact map + glob list, sorted by
//!                                       (priority desc, sequence asc)
//! ```

mod error;
mod handler;
mod pattern;
mod table;

pub use error::RegistrationError;
pub use handler::{Handler, HandlerResult};
pub use pattern::RoutePattern;

pub(crate) use table::Registry;

/// Priority used when a registration does not name one.
pub const DEFAULT_PRIORITY: i32 = 0;
