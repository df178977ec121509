//! Error types for the IoC container

use thiserror::Error;

/// Result type alias for container operations
pub type DiResult<T> = Result<T, DiError>;

/// Errors raised by registration and resolution.
///
/// "No mapping", "abstract type with no mapping" and "no viable constructor"
/// are not errors: resolution reports them as `Ok(None)`.
#[derive(Error, Debug)]
pub enum DiError {
    /// A required argument was empty or malformed
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument
        argument: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// The target type of a mapping cannot stand in for its source type
    #[error("Type {target_type} is not assignable to {source_type}")]
    IncompatibleType {
        /// Requested (source) type of the mapping
        source_type: String,
        /// Type that would have been instantiated
        target_type: String,
    },

    /// A type is reachable from itself through the active constructor chain
    #[error("Circular dependency during resolve: {path}")]
    CircularDependency {
        /// In-flight chain, e.g. `A -> B -> A`
        path: String,
    },

    /// A named instance is already registered under this name
    #[error("An instance named `{name}` is already registered")]
    DuplicateName {
        /// The duplicated name
        name: String,
    },

    /// A constructor activator rejected its arguments
    #[error("Failed to activate {type_name}: {reason}")]
    ActivationFailed {
        /// Type being constructed
        type_name: String,
        /// Reason reported by the activator
        reason: String,
    },

    /// A resolved object cannot be used as the requested type
    #[error("Resolved {actual} cannot be used as {expected}")]
    TypeMismatch {
        /// Type the caller asked for
        expected: String,
        /// Runtime type of the resolved object
        actual: String,
    },

    /// Mapping configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DiError {
    pub(crate) fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        DiError::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }
}
