//! Adapter bookkeeping: registration, versioned heartbeats and liveness.
//!
//! Adapters are plugins that bridge an outside messaging platform into the
//! hub. They register once, then heartbeat periodically; the host asks
//! [`AdapterRegistry::active`] which ones are still alive.

mod error;
mod registry;

pub use error::AdapterError;
pub use registry::{AdapterInfo, AdapterRegistry, DEFAULT_LIVENESS_TIMEOUT};
