use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::error::{ConstructionError, ContainerError};
use super::finalize::Finalizable;
use super::shared::{Finalizer, Lease, Shared};
use super::type_tag::TypeTag;

/// Transport discipline of a container, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Discipline {
    /// Serialized bytes; every unwrap decodes an independent copy.
    ByValue,
    /// Reference-counted handle; every unwrap yields the same object.
    Shared,
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discipline::ByValue => f.write_str("by-value"),
            Discipline::Shared => f.write_str("shared"),
        }
    }
}

enum Body {
    ByValue(RwLock<Arc<[u8]>>),
    Shared(Lease),
}

/// A payload in transit between plugins.
///
/// Every handler argument is a `Container`. The producer picks a constructor
/// according to what the value is:
///
/// - [`Container::wrap`] for plain data. The value is bitcode-encoded and each
///   [`unwrap`](Container::unwrap) decodes a fresh copy, so consumers can
///   never observe each other's mutations. If the value does not survive an
///   encode/decode round trip it is transported shared instead.
/// - [`Container::wrap_resource`] for values with cleanup obligations. Always
///   shared; the [`Finalizable`] hook runs once after the last reference drops.
/// - [`Container::wrap_handle`] for non-serializable values such as open files
///   or sockets. Shared, without a finalizer.
///
/// ## Example
///
/// ```
/// use switchyard::{Container, Discipline};
///
/// let container = Container::wrap(vec![1, 2, 3]).unwrap();
/// assert_eq!(container.discipline(), Discipline::ByValue);
///
/// let mut first = container.unwrap::<Vec<i32>>().unwrap().into_owned();
/// first.push(4);
///
/// let second = container.unwrap::<Vec<i32>>().unwrap();
/// assert_eq!(*second, vec![1, 2, 3]);
/// ```
pub struct Container {
    tag: TypeTag,
    body: Body,
    sealed: bool,
}

impl Container {
    /// Wrap a serializable value.
    ///
    /// Selects the by-value discipline when the value round-trips through
    /// bitcode, and falls back to the shared discipline otherwise.
    ///
    /// `wrap` never looks for a [`Finalizable`] impl: a serializable resource
    /// passed here travels by value and its finalizer never runs. Resources
    /// with cleanup obligations go through [`wrap_resource`](Self::wrap_resource).
    pub fn wrap<T>(value: T) -> Result<Self, ConstructionError>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        match encode_checked(&value) {
            Ok(bytes) => Ok(Self {
                tag: TypeTag::of::<T>(),
                body: Body::ByValue(RwLock::new(bytes.into())),
                sealed: false,
            }),
            Err(e) => {
                debug!(
                    payload = std::any::type_name::<T>(),
                    error = %e,
                    "payload does not round-trip; using shared discipline"
                );
                Ok(Self::shared(Arc::new(value), None))
            }
        }
    }

    /// Wrap a resource that must be finalized exactly once.
    ///
    /// Fails with [`ConstructionError::BackReference`] when the resource
    /// reports that it holds a container handle.
    pub fn wrap_resource<T: Finalizable>(value: T) -> Result<Self, ConstructionError> {
        if value.holds_container() {
            return Err(ConstructionError::BackReference(
                std::any::type_name::<T>(),
            ));
        }

        let value = Arc::new(value);
        let resource = Arc::clone(&value);
        let finalizer: Finalizer = Box::new(move || resource.finalize());
        Ok(Self::shared(value, Some(finalizer)))
    }

    /// Wrap a value by shared handle, without a finalizer.
    ///
    /// Only a bare `Container` payload is rejected. A container buried inside
    /// the value (`Arc<Container>`, `Option<Container>`, a struct field) is
    /// not detected; such a handle keeps that container alive for as long as
    /// this one lives.
    pub fn wrap_handle<T: Send + Sync + 'static>(value: T) -> Result<Self, ConstructionError> {
        if TypeTag::of::<T>().is::<Container>() {
            return Err(ConstructionError::NestedContainer);
        }
        Ok(Self::shared(Arc::new(value), None))
    }

    fn shared<T: Send + Sync + 'static>(value: Arc<T>, finalizer: Option<Finalizer>) -> Self {
        Self {
            tag: TypeTag::of::<T>(),
            body: Body::Shared(Lease::new(value, finalizer, std::any::type_name::<T>())),
            sealed: false,
        }
    }

    /// Read the payload.
    ///
    /// By-value containers decode a fresh copy on every call. Shared
    /// containers return a live reference to the one wrapped object.
    pub fn unwrap<T>(&self) -> Result<Unwrapped<T>, ContainerError>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.check_type::<T>()?;
        match &self.body {
            Body::ByValue(bytes) => {
                let bytes = Arc::clone(&*bytes.read().unwrap_or_else(PoisonError::into_inner));
                Ok(Unwrapped::Copy(bitcode::deserialize(&bytes)?))
            }
            Body::Shared(lease) => self.share(lease).map(Unwrapped::Shared),
        }
    }

    /// Read the payload of a shared container.
    ///
    /// Works for any payload type, including ones that cannot be serialized.
    pub fn unwrap_shared<T: Send + Sync + 'static>(&self) -> Result<Shared<T>, ContainerError> {
        self.check_type::<T>()?;
        match &self.body {
            Body::ByValue(_) => Err(ContainerError::DisciplineMismatch {
                expected: Discipline::Shared,
                actual: Discipline::ByValue,
            }),
            Body::Shared(lease) => self.share(lease),
        }
    }

    /// Replace the payload of a by-value container.
    ///
    /// Intended for chain consumers: later handlers in the same dispatch, and
    /// the producer, observe the new value. Clones taken earlier keep the old
    /// bytes.
    pub fn replace<T>(&self, value: T) -> Result<(), ContainerError>
    where
        T: Serialize + 'static,
    {
        let slot = self.writable::<T>()?;
        let bytes = bitcode::serialize(&value).map_err(|e| ContainerError::Encode(e.to_string()))?;
        *slot.write().unwrap_or_else(PoisonError::into_inner) = bytes.into();
        Ok(())
    }

    /// Decode, modify and re-encode the payload of a by-value container.
    ///
    /// No lock is held while `f` runs, so the closure may read the container.
    /// A `replace` that lands between the decode and the store is overwritten.
    pub fn update<T, F>(&self, f: F) -> Result<(), ContainerError>
    where
        T: Serialize + DeserializeOwned + 'static,
        F: FnOnce(&mut T),
    {
        let slot = self.writable::<T>()?;
        let current = Arc::clone(&*slot.read().unwrap_or_else(PoisonError::into_inner));
        let mut value: T = bitcode::deserialize(&current)?;
        f(&mut value);
        let bytes = bitcode::serialize(&value).map_err(|e| ContainerError::Encode(e.to_string()))?;
        *slot.write().unwrap_or_else(PoisonError::into_inner) = bytes.into();
        Ok(())
    }

    /// Declared payload type.
    pub fn payload_type(&self) -> TypeTag {
        self.tag
    }

    /// Transport discipline chosen at construction.
    pub fn discipline(&self) -> Discipline {
        match self.body {
            Body::ByValue(_) => Discipline::ByValue,
            Body::Shared(_) => Discipline::Shared,
        }
    }

    /// Live reference count of a shared container; `None` for by-value.
    pub fn live_count(&self) -> Option<usize> {
        match &self.body {
            Body::ByValue(_) => None,
            Body::Shared(lease) => Some(lease.live_count()),
        }
    }

    /// Whether a finalizer is still pending for this payload.
    pub fn has_finalizer(&self) -> bool {
        match &self.body {
            Body::ByValue(_) => false,
            Body::Shared(lease) => lease.has_finalizer(),
        }
    }

    /// Whether both containers transport the same shared object.
    pub fn shares_payload_with(&self, other: &Container) -> bool {
        match (&self.body, &other.body) {
            (Body::Shared(a), Body::Shared(b)) => a.same_cell(b),
            _ => false,
        }
    }

    /// Whether this is a read-only view.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// A read-only clone: [`replace`](Self::replace) and
    /// [`update`](Self::update) fail on it.
    pub fn sealed(&self) -> Container {
        let mut view = self.clone();
        view.sealed = true;
        view
    }

    fn check_type<T: 'static>(&self) -> Result<(), ContainerError> {
        if self.tag.is::<T>() {
            Ok(())
        } else {
            Err(ContainerError::TypeMismatch {
                declared: self.tag.name(),
                requested: std::any::type_name::<T>(),
            })
        }
    }

    fn writable<T: 'static>(&self) -> Result<&RwLock<Arc<[u8]>>, ContainerError> {
        if self.sealed {
            return Err(ContainerError::Sealed);
        }
        self.check_type::<T>()?;
        match &self.body {
            Body::ByValue(slot) => Ok(slot),
            Body::Shared(_) => Err(ContainerError::DisciplineMismatch {
                expected: Discipline::ByValue,
                actual: Discipline::Shared,
            }),
        }
    }

    fn share<T: Send + Sync + 'static>(&self, lease: &Lease) -> Result<Shared<T>, ContainerError> {
        Shared::from_lease(lease).ok_or(ContainerError::TypeMismatch {
            declared: self.tag.name(),
            requested: std::any::type_name::<T>(),
        })
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        let body = match &self.body {
            Body::ByValue(bytes) => Body::ByValue(RwLock::new(Arc::clone(
                &bytes.read().unwrap_or_else(PoisonError::into_inner),
            ))),
            Body::Shared(lease) => Body::Shared(lease.clone()),
        };
        Self {
            tag: self.tag,
            body,
            sealed: self.sealed,
        }
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Container<{}, {}", self.tag, self.discipline())?;
        if let Some(live) = self.live_count() {
            write!(f, ", live={}", live)?;
        }
        if self.sealed {
            f.write_str(", sealed")?;
        }
        f.write_str(">")
    }
}

/// The result of [`Container::unwrap`].
///
/// Dereferences to the payload either way; by-value containers produce an
/// owned copy, shared containers a live reference.
pub enum Unwrapped<T> {
    Copy(T),
    Shared(Shared<T>),
}

impl<T> Unwrapped<T> {
    /// Whether this is a reference to a shared payload.
    pub fn is_shared(&self) -> bool {
        matches!(self, Unwrapped::Shared(_))
    }

    /// The owned copy, if the container was by-value.
    pub fn into_copy(self) -> Option<T> {
        match self {
            Unwrapped::Copy(value) => Some(value),
            Unwrapped::Shared(_) => None,
        }
    }
}

impl<T: Clone> Unwrapped<T> {
    /// An owned value: the copy itself, or a clone of the shared payload.
    pub fn into_owned(self) -> T {
        match self {
            Unwrapped::Copy(value) => value,
            Unwrapped::Shared(shared) => (*shared).clone(),
        }
    }
}

impl<T> Deref for Unwrapped<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            Unwrapped::Copy(value) => value,
            Unwrapped::Shared(shared) => shared,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Unwrapped<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unwrapped::Copy(value) => f.debug_tuple("Copy").field(value).finish(),
            Unwrapped::Shared(shared) => f.debug_tuple("Shared").field(shared).finish(),
        }
    }
}

fn encode_checked<T>(value: &T) -> Result<Vec<u8>, bitcode::Error>
where
    T: Serialize + DeserializeOwned,
{
    let bytes = bitcode::serialize(value)?;
    bitcode::deserialize::<T>(&bytes)?;
    Ok(bytes)
}
