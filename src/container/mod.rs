//! Dual-discipline payload container.
//!
//! Every value crossing a plugin boundary travels inside a [`Container`].
//! The container decides how the value is transported:
//!
//! ```text
//!            Container::wrap(value)
//!                     │
//!       round-trips through bitcode?
//!            ┌────────┴────────┐
//!           yes                no
//!            ▼                 ▼
//!   ┌─────────────────┐  ┌───────────────────────┐
//!   │    by-value     │  │        shared         │
//!   │ Arc<[u8]> bytes │  │ atomic live count     │
//!   │ unwrap → copy   │  │ unwrap → same object  │
//!   └─────────────────┘  │ finalizer on zero     │
//!                        └───────────────────────┘
//!                                  ▲
//!   Container::wrap_resource(r) ───┤  (Finalizable: always shared)
//!   Container::wrap_handle(h) ─────┘  (not serializable)
//! ```

#[allow(clippy::module_inception)]
mod container;
mod error;
mod finalize;
mod shared;
mod type_tag;

pub use container::{Container, Discipline, Unwrapped};
pub use error::{ConstructionError, ContainerError};
pub use finalize::{FinalizeResult, Finalizable};
pub use shared::Shared;
pub use type_tag::TypeTag;
