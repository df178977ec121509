//! Mapping configuration files for effective-ioc
//!
//! Reads `types` and `instances` tables from TOML or JSON and hands them to
//! a container through [`MappingSource`]:
//!
//! ```toml
//! [[types]]
//! service_type = "ILogger"
//! implementation_type = "ConsoleLogger"
//!
//! [[types]]
//! service_type = "IList<>"
//! implementation_type = "List<>"
//!
//! [[instances]]
//! name = "primary"
//! implementation_type = "ConsoleLogger"
//! ```
//!
//! Type identifiers use the container's textual form: `Name`, `Name<a, b>`
//! for closed generics and `Name<>` / `Name<,>` for open definitions.

#![warn(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use effective_ioc::{DiError, DiResult, MappingSource, MappingTables};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An unnamed mapping from a service type to the type to instantiate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    /// Requested type identifier
    pub service_type: String,
    /// Implementation type identifier
    pub implementation_type: String,
}

/// A named singleton built when the configuration is loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceEntry {
    /// Name the instance is registered under
    pub name: String,
    /// Type identifier to resolve
    pub implementation_type: String,
}

/// Mapping configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Unnamed type mappings, in declaration order
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    /// Named instances, in declaration order
    #[serde(default)]
    pub instances: Vec<InstanceEntry>,
}

impl MappingConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unnamed mapping
    pub fn add_type(
        &mut self,
        service_type: impl Into<String>,
        implementation_type: impl Into<String>,
    ) -> &mut Self {
        self.types.push(TypeEntry {
            service_type: service_type.into(),
            implementation_type: implementation_type.into(),
        });
        self
    }

    /// Add a named instance
    pub fn add_instance(
        &mut self,
        name: impl Into<String>,
        implementation_type: impl Into<String>,
    ) -> &mut Self {
        self.instances.push(InstanceEntry {
            name: name.into(),
            implementation_type: implementation_type.into(),
        });
        self
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> DiResult<Self> {
        toml::from_str(toml_str)
            .map_err(|e| DiError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from JSON string
    pub fn from_json(json_str: &str) -> DiResult<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| DiError::Config(format!("Failed to parse JSON: {}", e)))
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> DiResult<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            DiError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        debug!("Parsing {:?} mapping configuration {}", format, path.display());
        match format {
            Format::Toml => Self::from_toml(&content),
            Format::Json => Self::from_json(&content),
        }
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> DiResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| DiError::Config(format!("Failed to serialize TOML: {}", e)))
    }

    /// The string pairs a container consumes
    pub fn to_tables(&self) -> MappingTables {
        MappingTables {
            types: self
                .types
                .iter()
                .map(|t| (t.service_type.clone(), t.implementation_type.clone()))
                .collect(),
            instances: self
                .instances
                .iter()
                .map(|i| (i.name.clone(), i.implementation_type.clone()))
                .collect(),
        }
    }
}

impl From<MappingConfig> for MappingTables {
    fn from(config: MappingConfig) -> Self {
        config.to_tables()
    }
}

impl MappingSource for MappingConfig {
    fn load(&self) -> DiResult<MappingTables> {
        Ok(self.to_tables())
    }
}

/// Reads a configuration file when the container first needs it
#[derive(Debug, Clone)]
pub struct FileMappingSource {
    path: PathBuf,
}

impl FileMappingSource {
    /// Source backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MappingSource for FileMappingSource {
    fn load(&self) -> DiResult<MappingTables> {
        debug!("Loading mapping configuration from {}", self.path.display());
        MappingConfig::from_file(&self.path).map(MappingTables::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> DiResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
            _ => Err(DiError::Config(format!(
                "Unsupported configuration format: {}",
                path.display()
            ))),
        }
    }
}
