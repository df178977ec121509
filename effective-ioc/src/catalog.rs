//! Type catalog: what the container knows about types
//!
//! The catalog answers the questions a reflective runtime would: is a type
//! abstract, what does it implement, which constructors does it expose.

use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::descriptor::{ConstructorDescriptor, TypeDescriptor, TypeKind};
use crate::types::TypeRef;

/// Descriptors indexed by definition name
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    descriptors: FxHashMap<Arc<str>, TypeDescriptor>,
}

impl TypeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor, replacing any previous one with the same name
    pub fn define(&mut self, descriptor: TypeDescriptor) -> Option<TypeDescriptor> {
        debug!(
            "Defining {} type {}",
            descriptor.kind(),
            descriptor.type_ref()
        );
        self.descriptors
            .insert(Arc::from(descriptor.name()), descriptor)
    }

    /// Number of known definitions
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptor for a type, if its definition is known with matching arity
    pub fn describe(&self, ty: &TypeRef) -> Option<&TypeDescriptor> {
        let descriptor = self.descriptors.get(ty.definition_name()?)?;
        (descriptor.arity() == ty.arity()).then_some(descriptor)
    }

    /// Whether the type and every type argument it mentions are known
    pub fn contains(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Param(_) => true,
            _ => {
                self.describe(ty).is_some() && ty.type_arguments().iter().all(|a| self.contains(a))
            }
        }
    }

    /// Whether the type is a known interface or abstract type
    pub fn is_abstract(&self, ty: &TypeRef) -> bool {
        self.describe(ty)
            .map_or(false, |d| d.kind() != TypeKind::Concrete)
    }

    /// Whether the type can be constructed: known, concrete and closed
    pub fn is_instantiable(&self, ty: &TypeRef) -> bool {
        ty.is_closed()
            && self
                .describe(ty)
                .map_or(false, |d| d.kind() == TypeKind::Concrete)
    }

    /// Direct supertypes with the type's arguments substituted
    pub fn supertypes_of(&self, ty: &TypeRef) -> Vec<TypeRef> {
        self.describe(ty)
            .map(|d| {
                d.supertypes()
                    .iter()
                    .map(|s| s.specialize(ty.type_arguments()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The type followed by all of its transitive supertypes, breadth first
    pub fn ancestors_of(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([ty.clone()]);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            queue.extend(self.supertypes_of(&current));
            order.push(current);
        }

        order
    }

    /// Whether a `target` value can be used where a `source` is expected
    pub fn is_assignable(&self, source: &TypeRef, target: &TypeRef) -> bool {
        source == target || self.ancestors_of(target).iter().any(|t| t == source)
    }

    /// Whether `target` is, or derives from, some specialization of the
    /// generic definition of `source`
    pub fn implements_generic_definition(&self, target: &TypeRef, source: &TypeRef) -> bool {
        let Some(definition) = source.generic_definition() else {
            return false;
        };
        self.ancestors_of(target)
            .iter()
            .any(|t| t.generic_definition().as_ref() == Some(&definition))
    }

    /// Public constructors of a type, parameters bound to the type's
    /// arguments, fewest parameters first
    pub fn constructors_of(&self, ty: &TypeRef) -> Vec<ConstructorDescriptor> {
        let Some(descriptor) = self.describe(ty) else {
            return Vec::new();
        };
        let mut constructors: Vec<_> = descriptor
            .constructors()
            .iter()
            .map(|c| c.specialize(ty.type_arguments()))
            .collect();
        // Stable: declaration order breaks ties between equal arities
        constructors.sort_by_key(ConstructorDescriptor::arity);
        constructors
    }

    /// Parse an identifier and keep it only if every definition it names is
    /// known
    pub fn parse(&self, identifier: &str) -> Option<TypeRef> {
        let ty = identifier.parse::<TypeRef>().ok()?;
        self.contains(&ty).then_some(ty)
    }
}
