//! Type descriptors: the construction metadata the container relies on
//!
//! Each describable type declares its kind, generic arity, direct supertypes
//! and public constructors. Supertypes and constructor parameters may mention
//! the descriptor's own parameter slots (`TypeRef::Param`), which are bound
//! when a closed type is requested.

use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::service::{Instance, Service};
use crate::types::TypeRef;

/// What kind of type a descriptor describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A contract with no constructors of its own
    Interface,
    /// A base type that cannot be instantiated directly
    Abstract,
    /// An instantiable type
    Concrete,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Interface => write!(f, "Interface"),
            TypeKind::Abstract => write!(f, "Abstract"),
            TypeKind::Concrete => write!(f, "Concrete"),
        }
    }
}

/// Builds an object from resolved constructor arguments
pub type Activator = Arc<dyn Fn(&Activation<'_>) -> DiResult<Arc<dyn Service>> + Send + Sync>;

/// Everything an activator gets to see
pub struct Activation<'a> {
    type_ref: &'a TypeRef,
    arguments: &'a [Instance],
}

impl<'a> Activation<'a> {
    pub(crate) fn new(type_ref: &'a TypeRef, arguments: &'a [Instance]) -> Self {
        Self {
            type_ref,
            arguments,
        }
    }

    /// The closed type being constructed
    pub fn type_ref(&self) -> &TypeRef {
        self.type_ref
    }

    /// Type arguments of the type being constructed
    pub fn type_arguments(&self) -> &[TypeRef] {
        self.type_ref.type_arguments()
    }

    /// Resolved arguments in parameter order
    pub fn arguments(&self) -> &[Instance] {
        self.arguments
    }

    /// Argument at `index`
    pub fn argument(&self, index: usize) -> DiResult<&Instance> {
        self.arguments
            .get(index)
            .ok_or_else(|| DiError::ActivationFailed {
                type_name: self.type_ref.to_string(),
                reason: format!(
                    "argument {} requested but only {} supplied",
                    index,
                    self.arguments.len()
                ),
            })
    }

    /// Argument at `index`, downcast to `T`
    pub fn get<T: Service>(&self, index: usize) -> DiResult<Arc<T>> {
        self.argument(index)?.downcast::<T>()
    }
}

/// A public constructor: parameter types plus the activator that runs it
#[derive(Clone)]
pub struct ConstructorDescriptor {
    parameters: Vec<TypeRef>,
    activator: Activator,
}

impl ConstructorDescriptor {
    /// Create a constructor taking `parameters`
    pub fn new<F>(parameters: Vec<TypeRef>, activator: F) -> Self
    where
        F: Fn(&Activation<'_>) -> DiResult<Arc<dyn Service>> + Send + Sync + 'static,
    {
        Self {
            parameters,
            activator: Arc::new(activator),
        }
    }

    /// Create a parameterless constructor
    pub fn nullary<T, F>(factory: F) -> Self
    where
        T: Service,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new(Vec::new(), move |_| Ok(Arc::new(factory()) as Arc<dyn Service>))
    }

    /// Declared parameter types
    pub fn parameters(&self) -> &[TypeRef] {
        &self.parameters
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Bind parameter slots in the parameter list
    pub(crate) fn specialize(&self, args: &[TypeRef]) -> Self {
        Self {
            parameters: self.parameters.iter().map(|p| p.specialize(args)).collect(),
            activator: Arc::clone(&self.activator),
        }
    }

    pub(crate) fn activate(&self, activation: &Activation<'_>) -> DiResult<Arc<dyn Service>> {
        (self.activator)(activation)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Describes one (possibly generic) type definition
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: Arc<str>,
    kind: TypeKind,
    arity: usize,
    supertypes: Vec<TypeRef>,
    constructors: Vec<ConstructorDescriptor>,
}

impl TypeDescriptor {
    fn with_kind(name: impl Into<Arc<str>>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            arity: 0,
            supertypes: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Describe an interface
    pub fn interface(name: impl Into<Arc<str>>) -> Self {
        Self::with_kind(name, TypeKind::Interface)
    }

    /// Describe an abstract base type
    pub fn abstract_type(name: impl Into<Arc<str>>) -> Self {
        Self::with_kind(name, TypeKind::Abstract)
    }

    /// Describe an instantiable type
    pub fn concrete(name: impl Into<Arc<str>>) -> Self {
        Self::with_kind(name, TypeKind::Concrete)
    }

    /// Declare `arity` generic parameters
    pub fn generic(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// Declare a direct supertype
    pub fn implements(mut self, supertype: TypeRef) -> Self {
        self.supertypes.push(supertype);
        self
    }

    /// Declare a public constructor
    pub fn constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Declare a parameterless constructor
    pub fn with_default<T, F>(self, factory: F) -> Self
    where
        T: Service,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.constructor(ConstructorDescriptor::nullary(factory))
    }

    /// Name of the definition
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of the type
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Number of generic parameters
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Direct supertypes, unspecialized
    pub fn supertypes(&self) -> &[TypeRef] {
        &self.supertypes
    }

    /// Declared constructors, unspecialized
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// Reference to the definition itself (`List<>` for a generic `List`)
    pub fn type_ref(&self) -> TypeRef {
        if self.arity == 0 {
            TypeRef::named(Arc::clone(&self.name))
        } else {
            TypeRef::open(Arc::clone(&self.name), self.arity)
        }
    }
}
