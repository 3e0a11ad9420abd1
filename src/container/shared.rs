//! Reference-counted body of a shared-discipline container.
//!
//! The live count covers container clones and the [`Shared`] references
//! handed out by `unwrap`. Its transition to zero runs the finalizer exactly
//! once, even when clones are dropped concurrently.

use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{fence, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use super::finalize::FinalizeResult;
use crate::panic::panic_message;

pub(crate) type Finalizer = Box<dyn FnOnce() -> FinalizeResult + Send>;

struct SharedCell {
    value: Arc<dyn Any + Send + Sync>,
    live: AtomicUsize,
    finalizer: Mutex<Option<Finalizer>>,
    type_name: &'static str,
}

impl SharedCell {
    fn finalize(&self) {
        let finalizer = self
            .finalizer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(finalizer) = finalizer else {
            return;
        };

        match catch_unwind(AssertUnwindSafe(finalizer)) {
            Ok(Ok(())) => debug!(payload = self.type_name, "shared payload finalized"),
            Ok(Err(e)) => warn!(
                payload = self.type_name,
                error = %e,
                "finalizer failed; error swallowed"
            ),
            Err(panic) => warn!(
                payload = self.type_name,
                panic = %panic_message(panic.as_ref()),
                "finalizer panicked; panic swallowed"
            ),
        }
    }
}

/// One counted reference to a shared cell.
///
/// Cloning increments the live count; dropping decrements it, and the drop
/// that reaches zero runs the finalizer.
pub(crate) struct Lease {
    cell: Arc<SharedCell>,
}

impl Lease {
    pub(crate) fn new(
        value: Arc<dyn Any + Send + Sync>,
        finalizer: Option<Finalizer>,
        type_name: &'static str,
    ) -> Self {
        Self {
            cell: Arc::new(SharedCell {
                value,
                live: AtomicUsize::new(1),
                finalizer: Mutex::new(finalizer),
                type_name,
            }),
        }
    }

    pub(crate) fn value(&self) -> &Arc<dyn Any + Send + Sync> {
        &self.cell.value
    }

    pub(crate) fn live_count(&self) -> usize {
        self.cell.live.load(Ordering::Acquire)
    }

    pub(crate) fn has_finalizer(&self) -> bool {
        self.cell
            .finalizer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub(crate) fn same_cell(&self, other: &Lease) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl Clone for Lease {
    fn clone(&self) -> Self {
        self.cell.live.fetch_add(1, Ordering::Relaxed);
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        if self.cell.live.fetch_sub(1, Ordering::Release) != 1 {
            return;
        }
        fence(Ordering::Acquire);
        self.cell.finalize();
    }
}

/// A live reference to the payload of a shared-discipline container.
///
/// Every `Shared<T>` for the same container dereferences to the same object,
/// and keeps the container's live count raised until it is dropped.
pub struct Shared<T> {
    value: Arc<T>,
    lease: Lease,
}

impl<T: Send + Sync + 'static> Shared<T> {
    pub(crate) fn from_lease(lease: &Lease) -> Option<Self> {
        let value = Arc::downcast::<T>(Arc::clone(lease.value())).ok()?;
        Some(Self {
            value,
            lease: lease.clone(),
        })
    }
}

impl<T> Shared<T> {
    /// Whether both references point at the same object.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.value, &other.value)
    }

    /// Current live count of the underlying payload.
    pub fn live_count(&self) -> usize {
        self.lease.live_count()
    }
}

impl<T> Deref for Shared<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            lease: self.lease.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("value", &self.value)
            .field("live", &self.live_count())
            .finish()
    }
}
