//! Simple but effective inversion of control container
//!
//! Given a requested type, the container produces an object by consulting
//! its mapping tables, picking a constructor and recursively resolving the
//! constructor's parameters.
//!
//! Rust has no runtime reflection, so the types a container can build are
//! described up front in a [`TypeCatalog`]: kind, generic arity, supertypes
//! and constructors. Open generic mappings (`IList<>` to `List<>`) are
//! specialized on request, so resolving `IList<i32>` builds a `List<i32>`.
//!
//! # Example
//!
//! ```
//! use effective_ioc::prelude::*;
//!
//! struct ConsoleLogger;
//!
//! let mut builder = ContainerBuilder::new();
//! builder
//!     .define(TypeDescriptor::interface("ILogger"))
//!     .define(
//!         TypeDescriptor::concrete("ConsoleLogger")
//!             .implements(TypeRef::named("ILogger"))
//!             .with_default(|| ConsoleLogger),
//!     );
//! let container = builder.build();
//!
//! container
//!     .register_type(&TypeRef::named("ILogger"), &TypeRef::named("ConsoleLogger"))
//!     .unwrap();
//! let logger = container.resolve_as::<ConsoleLogger>(&TypeRef::named("ILogger")).unwrap();
//! assert!(logger.is_some());
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod catalog;
pub mod container;
pub mod descriptor;
pub mod error;
pub mod frame;
mod instantiator;
pub mod registry;
mod resolver;
pub mod service;
pub mod source;
pub mod types;

pub use builder::{ContainerBuilder, Module};
pub use catalog::TypeCatalog;
pub use container::Container;
pub use descriptor::{Activation, Activator, ConstructorDescriptor, TypeDescriptor, TypeKind};
pub use error::{DiError, DiResult};
pub use frame::{FrameGuard, ResolutionFrame};
pub use registry::{Factory, TypeRegistry};
pub use service::{Instance, Service};
pub use source::{MappingSource, MappingTables};
pub use types::TypeRef;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::{
        Activation, ConstructorDescriptor, Container, ContainerBuilder, DiError, DiResult,
        Instance, MappingSource, MappingTables, Service, TypeDescriptor, TypeRef,
    };
}
