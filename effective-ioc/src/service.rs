//! Resolved objects and their runtime types

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use downcast_rs::{impl_downcast, DowncastSync};

use crate::error::{DiError, DiResult};
use crate::types::TypeRef;

/// Trait that all objects held by the container implement
pub trait Service: DowncastSync {}

impl_downcast!(sync Service);

/// Blanket implementation for all suitable types
impl<T: std::any::Any + Send + Sync> Service for T {}

/// An object produced by the container together with its runtime type.
///
/// Cloning an `Instance` shares the underlying object; named instances are
/// handed out this way so every caller sees the same reference.
#[derive(Clone)]
pub struct Instance {
    type_ref: TypeRef,
    value: Arc<dyn Service>,
}

impl Instance {
    /// Wrap a freshly built value
    pub fn new<T: Service>(type_ref: TypeRef, value: T) -> Self {
        Self::from_arc(type_ref, Arc::new(value))
    }

    /// Wrap an already shared value
    pub fn from_arc<T: Service>(type_ref: TypeRef, value: Arc<T>) -> Self {
        let value: Arc<dyn Service> = value;
        Self { type_ref, value }
    }

    /// Wrap a type-erased value
    pub fn from_service(type_ref: TypeRef, value: Arc<dyn Service>) -> Self {
        Self { type_ref, value }
    }

    /// Runtime type of the object
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// The type-erased object
    pub fn value(&self) -> &Arc<dyn Service> {
        &self.value
    }

    /// Whether the object is a `T`
    pub fn is<T: Service>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Borrow the object as a `T`
    pub fn downcast_ref<T: Service>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Share the object as an `Arc<T>`
    pub fn downcast<T: Service>(&self) -> DiResult<Arc<T>> {
        Arc::clone(&self.value)
            .downcast_arc::<T>()
            .map_err(|_| DiError::TypeMismatch {
                expected: type_name::<T>().to_string(),
                actual: self.type_ref.to_string(),
            })
    }

    /// Whether both instances share the same object
    pub fn ptr_eq(a: &Instance, b: &Instance) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&a.value), Arc::as_ptr(&b.value))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_ref", &self.type_ref.to_string())
            .finish()
    }
}
