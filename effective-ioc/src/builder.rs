//! Container builder for fluent configuration

use tracing::debug;

use crate::catalog::TypeCatalog;
use crate::container::Container;
use crate::descriptor::TypeDescriptor;
use crate::source::MappingSource;

/// Builder for constructing a container
pub struct ContainerBuilder {
    catalog: TypeCatalog,
    source: Option<Box<dyn MappingSource>>,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self {
            catalog: TypeCatalog::new(),
            source: None,
        }
    }

    /// Describe a type the container may construct or map
    pub fn define(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.catalog.define(descriptor);
        self
    }

    /// Describe every type of a [`Module`]
    pub fn add_module<M: Module>(&mut self, module: M) -> &mut Self {
        let before = self.catalog.len();
        module.describe(self);
        debug!(
            "Module {} defined {} type(s)",
            module.name(),
            self.catalog.len().saturating_sub(before)
        );
        self
    }

    /// Supply the configuration consulted on first resolution
    pub fn with_mapping_source<S>(&mut self, source: S) -> &mut Self
    where
        S: MappingSource + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Build the container
    pub fn build(self) -> Container {
        Container::from_parts(self.catalog, self.source)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A family of related type descriptors shipped together, e.g. by a library
/// that wants its types to be resolvable
pub trait Module {
    /// Name used in diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Define this module's types on `builder`
    fn describe(&self, builder: &mut ContainerBuilder);
}
