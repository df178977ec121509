//! Contract with external mapping configuration

use crate::error::DiResult;

/// String pairs supplied by a configuration source, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTables {
    /// `(source type identifier, target type identifier)` unnamed mappings
    pub types: Vec<(String, String)>,
    /// `(instance name, type identifier)` singletons to build on load
    pub instances: Vec<(String, String)>,
}

impl MappingTables {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unnamed mapping
    pub fn with_type(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.types.push((from.into(), to.into()));
        self
    }

    /// Add a named singleton
    pub fn with_instance(mut self, name: impl Into<String>, type_id: impl Into<String>) -> Self {
        self.instances.push((name.into(), type_id.into()));
        self
    }

    /// Whether there is nothing to load
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.instances.is_empty()
    }
}

/// A source of mapping configuration.
///
/// The container asks its source exactly once, on the first resolution
/// attempt.
pub trait MappingSource: Send + Sync {
    /// Read the mapping tables
    fn load(&self) -> DiResult<MappingTables>;
}

impl MappingSource for MappingTables {
    fn load(&self) -> DiResult<MappingTables> {
        Ok(self.clone())
    }
}

impl<F> MappingSource for F
where
    F: Fn() -> DiResult<MappingTables> + Send + Sync,
{
    fn load(&self) -> DiResult<MappingTables> {
        self()
    }
}
