//! Core container implementation

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};
use tracing::{debug, warn};

use crate::catalog::TypeCatalog;
use crate::error::{DiError, DiResult};
use crate::frame::ResolutionFrame;
use crate::registry::{ensure_well_formed, Factory, TypeRegistry};
use crate::resolver::Resolver;
use crate::service::{Instance, Service};
use crate::source::{MappingSource, MappingTables};
use crate::types::TypeRef;

struct ContainerInner {
    catalog: TypeCatalog,
    registry: RwLock<TypeRegistry>,
    source: Option<Box<dyn MappingSource>>,
    loaded: AtomicBool,
    /// Held while configuration is applied; the flag marks a load in progress
    load_gate: ReentrantMutex<Cell<bool>>,
}

/// Thread-safe IoC container.
///
/// Clones share the same registry. Registration takes a write lock;
/// resolution only reads.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Container {
    /// Create a new container builder
    pub fn builder() -> crate::builder::ContainerBuilder {
        crate::builder::ContainerBuilder::new()
    }

    pub(crate) fn from_parts(
        catalog: TypeCatalog,
        source: Option<Box<dyn MappingSource>>,
    ) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                catalog,
                registry: RwLock::new(TypeRegistry::new()),
                source,
                loaded: AtomicBool::new(false),
                load_gate: ReentrantMutex::new(Cell::new(false)),
            }),
        }
    }

    /// Types this container knows how to describe
    pub fn catalog(&self) -> &TypeCatalog {
        &self.inner.catalog
    }

    /// Map `from` to `to` (first registration wins)
    pub fn register_type(&self, from: &TypeRef, to: &TypeRef) -> DiResult<()> {
        self.inner
            .registry
            .write()
            .register_type(&self.inner.catalog, from, to)
    }

    /// Map `from` to `to` under `name`
    pub fn register_named_type(&self, name: &str, from: &TypeRef, to: &TypeRef) -> DiResult<()> {
        self.inner
            .registry
            .write()
            .register_named_type(name, from, to)
    }

    /// Store a pre-built object under a unique name
    pub fn register_instance(&self, name: &str, instance: Instance) -> DiResult<()> {
        self.inner.registry.write().register_instance(name, instance)
    }

    /// Resolve `from` (and its specializations, when open) through `factory`
    pub fn register_factory<F>(&self, from: &TypeRef, factory: F) -> DiResult<()>
    where
        F: Fn(&TypeRef) -> Instance + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(factory);
        self.inner.registry.write().register_factory(from, factory)
    }

    /// Type that would be instantiated for `ty`
    pub fn lookup(&self, ty: &TypeRef) -> DiResult<TypeRef> {
        ensure_well_formed("type", ty)?;
        self.ensure_loaded()?;
        Ok(self.inner.registry.read().lookup(ty))
    }

    /// Resolve an object for `ty`.
    ///
    /// Returns `Ok(None)` when the type is an unmapped abstraction or has no
    /// viable constructor.
    pub fn resolve(&self, ty: &TypeRef) -> DiResult<Option<Instance>> {
        self.resolve_with(ty, None)
    }

    /// Resolve `ty` registered under `name`; never falls back to unnamed
    /// mappings
    pub fn resolve_named(&self, ty: &TypeRef, name: &str) -> DiResult<Option<Instance>> {
        if name.trim().is_empty() {
            return Err(DiError::invalid_argument("name", "must not be empty"));
        }
        self.resolve_with(ty, Some(name))
    }

    /// Resolve `ty` and downcast the object to `T`.
    ///
    /// Fails with [`DiError::TypeMismatch`] when the object's runtime type is
    /// not assignable to `ty` (a closed target registered against an open
    /// definition with other arguments) or is not a `T`.
    pub fn resolve_as<T: Service>(&self, ty: &TypeRef) -> DiResult<Option<Arc<T>>> {
        self.resolve(ty)?
            .map(|i| self.cast::<T>(ty, &i))
            .transpose()
    }

    /// Resolve `ty` under `name` and downcast the object to `T`
    pub fn resolve_named_as<T: Service>(
        &self,
        ty: &TypeRef,
        name: &str,
    ) -> DiResult<Option<Arc<T>>> {
        self.resolve_named(ty, name)?
            .map(|i| self.cast::<T>(ty, &i))
            .transpose()
    }

    fn cast<T: Service>(&self, requested: &TypeRef, instance: &Instance) -> DiResult<Arc<T>> {
        if !self.inner.catalog.is_assignable(requested, instance.type_ref()) {
            return Err(DiError::TypeMismatch {
                expected: requested.to_string(),
                actual: instance.type_ref().to_string(),
            });
        }
        instance.downcast::<T>()
    }

    fn resolve_with(&self, ty: &TypeRef, name: Option<&str>) -> DiResult<Option<Instance>> {
        ensure_well_formed("type", ty)?;
        self.ensure_loaded()?;

        let mut frame = ResolutionFrame::new();
        self.resolver().resolve(&mut frame, ty, name)
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.inner.catalog, &self.inner.registry)
    }

    /// Pull mappings from the configuration source, once.
    ///
    /// Factories and activators run while configured instances are built.
    /// When they call back into the container on the loading thread, the
    /// nested call sees the load in progress and proceeds with the mappings
    /// registered so far; other threads wait for the load to finish.
    fn ensure_loaded(&self) -> DiResult<()> {
        if self.inner.loaded.load(Ordering::Acquire) {
            return Ok(());
        }

        let loading = self.inner.load_gate.lock();
        if self.inner.loaded.load(Ordering::Acquire) || loading.get() {
            return Ok(());
        }

        loading.set(true);
        let result = match &self.inner.source {
            Some(source) => source.load().and_then(|tables| self.apply(tables)),
            None => Ok(()),
        };
        loading.set(false);
        // A failed load is not retried
        self.inner.loaded.store(true, Ordering::Release);
        result
    }

    fn apply(&self, tables: MappingTables) -> DiResult<()> {
        debug!(
            "Loading {} type mapping(s) and {} instance(s) from configuration",
            tables.types.len(),
            tables.instances.len()
        );

        for (from_text, to_text) in &tables.types {
            let Some(from) = self.known_type(from_text) else {
                continue;
            };
            let Some(to) = self.known_type(to_text) else {
                continue;
            };
            self.register_type(&from, &to)?;
        }

        for (name, type_text) in &tables.instances {
            let Some(ty) = self.known_type(type_text) else {
                continue;
            };
            let mut frame = ResolutionFrame::new();
            match self.resolver().resolve(&mut frame, &ty, None)? {
                Some(instance) => self.register_instance(name, instance)?,
                None => warn!("Configured instance `{}` of {} could not be built", name, ty),
            }
        }

        Ok(())
    }

    fn known_type(&self, identifier: &str) -> Option<TypeRef> {
        if identifier.trim().is_empty() {
            return None;
        }
        let ty = self.inner.catalog.parse(identifier);
        if ty.is_none() {
            warn!("Skipping unknown type `{}` in configuration", identifier);
        }
        ty
    }
}

impl Default for Container {
    fn default() -> Self {
        Container::builder().build()
    }
}
