//! Opt-in cleanup capability for shared payloads.

use std::error::Error;

/// Result of a finalizer. Errors are logged by the container and never
/// reach the code that dropped the last reference.
pub type FinalizeResult = Result<(), Box<dyn Error + Send + Sync>>;

/// A resource that needs explicit cleanup once nobody references it anymore.
///
/// Wrapping a `Finalizable` value always selects the shared discipline, even
/// when the type could be serialized, so the cleanup runs exactly once when
/// the last container (and the last [`Shared`](super::Shared) reference)
/// drops.
///
/// ```ignore
/// struct Connection { /* ... */ }
///
/// impl Finalizable for Connection {
///     fn finalize(&self) -> FinalizeResult {
///         self.close()?;
///         Ok(())
///     }
/// }
///
/// let container = Container::wrap_resource(Connection::open()?)?;
/// ```
pub trait Finalizable: Send + Sync + 'static {
    /// Release the resource. Called at most once.
    fn finalize(&self) -> FinalizeResult;

    /// Whether the resource stores a container handle of its own.
    ///
    /// Such a resource would keep the live count of the container wrapping it
    /// above zero, so wrapping it is rejected. The container cannot inspect the
    /// resource itself: a resource that stores a container must override this,
    /// otherwise the cycle goes undetected and the finalizer never runs.
    fn holds_container(&self) -> bool {
        false
    }
}

impl Finalizable for std::net::TcpStream {
    fn finalize(&self) -> FinalizeResult {
        match self.shutdown(std::net::Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(Box::new(e)),
        }
    }
}
