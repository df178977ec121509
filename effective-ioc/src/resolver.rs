//! Resolution algorithm
//!
//! Order of precedence for a request:
//!
//! 1. a factory registered for the type (or its open definition)
//! 2. when a name is given, the named instance, then the named mapping;
//!    named requests never fall through to the unnamed table
//! 3. the unnamed mapping (with generic specialization), guarded against
//!    cycles, then construction by the instantiator

use parking_lot::RwLock;
use tracing::trace;

use crate::catalog::TypeCatalog;
use crate::error::DiResult;
use crate::frame::ResolutionFrame;
use crate::registry::TypeRegistry;
use crate::service::Instance;
use crate::types::TypeRef;

/// Borrowed view of a container's state for the duration of one resolve
pub(crate) struct Resolver<'c> {
    pub(crate) catalog: &'c TypeCatalog,
    pub(crate) registry: &'c RwLock<TypeRegistry>,
}

impl<'c> Resolver<'c> {
    pub(crate) fn new(catalog: &'c TypeCatalog, registry: &'c RwLock<TypeRegistry>) -> Self {
        Self { catalog, registry }
    }

    /// Resolve `requested`, optionally by name.
    ///
    /// Registry locks are only held for individual lookups, so factories and
    /// activators are free to call back into the container.
    pub(crate) fn resolve(
        &self,
        frame: &mut ResolutionFrame,
        requested: &TypeRef,
        name: Option<&str>,
    ) -> DiResult<Option<Instance>> {
        let factory = self.registry.read().factory_for(requested);
        if let Some(factory) = factory {
            trace!("Resolving {} through its factory", requested);
            return Ok(Some(factory(requested)));
        }

        match name {
            Some(name) => self.resolve_named(frame, requested, name),
            None => self.resolve_unnamed(frame, requested),
        }
    }

    fn resolve_named(
        &self,
        frame: &mut ResolutionFrame,
        requested: &TypeRef,
        name: &str,
    ) -> DiResult<Option<Instance>> {
        let (instance, target) = {
            let registry = self.registry.read();
            (
                registry.named_instance(name),
                registry.named_type(name, requested),
            )
        };

        if let Some(instance) = instance {
            trace!("Resolved {} from named instance `{}`", requested, name);
            return Ok(Some(instance));
        }

        match target {
            Some(target) => {
                trace!("Resolving {} as {} via name `{}`", requested, target, name);
                self.construct(frame, requested, &target)
            }
            None => {
                trace!("Nothing registered for {} under `{}`", requested, name);
                Ok(None)
            }
        }
    }

    fn resolve_unnamed(
        &self,
        frame: &mut ResolutionFrame,
        requested: &TypeRef,
    ) -> DiResult<Option<Instance>> {
        let mut guard = frame.enter(requested)?;

        let concrete = self.registry.read().lookup(requested);
        if self.catalog.is_abstract(&concrete) {
            trace!("{} resolves to abstraction {}", requested, concrete);
            return Ok(None);
        }

        self.construct(&mut guard, requested, &concrete)
    }
}
