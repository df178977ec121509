//! Type registry: the four mapping tables consulted during resolution

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::catalog::TypeCatalog;
use crate::error::{DiError, DiResult};
use crate::service::Instance;
use crate::types::TypeRef;

/// Caller-supplied constructor that bypasses descriptor-based construction.
///
/// Receives the type that was actually requested, which for a factory
/// registered against an open definition is the closed specialization.
pub type Factory = Arc<dyn Fn(&TypeRef) -> Instance + Send + Sync>;

/// Mapping tables owned by one container
#[derive(Default)]
pub struct TypeRegistry {
    /// source type -> type to instantiate
    types: FxHashMap<TypeRef, TypeRef>,
    /// (name, source type) -> type to instantiate
    named_types: FxHashMap<(String, TypeRef), TypeRef>,
    /// name -> pre-built object
    instances: FxHashMap<String, Instance>,
    /// source type -> factory override
    factories: FxHashMap<TypeRef, Factory>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `source` to `target`.
    ///
    /// `target` must be assignable to `source`, or derive from a
    /// specialization of `source`'s generic definition. The first mapping
    /// registered for a source type wins; later ones are ignored.
    pub fn register_type(
        &mut self,
        catalog: &TypeCatalog,
        source: &TypeRef,
        target: &TypeRef,
    ) -> DiResult<()> {
        ensure_well_formed("from", source)?;
        ensure_well_formed("to", target)?;

        if !catalog.is_assignable(source, target)
            && !catalog.implements_generic_definition(target, source)
        {
            return Err(DiError::IncompatibleType {
                source_type: source.to_string(),
                target_type: target.to_string(),
            });
        }

        if self.types.contains_key(source) {
            trace!("Mapping for {} already registered, ignoring {}", source, target);
            return Ok(());
        }

        debug!("Registered type mapping {} -> {}", source, target);
        self.types.insert(source.clone(), target.clone());
        Ok(())
    }

    /// Map `(name, source)` to `target`. No compatibility check is made:
    /// named mappings are trusted overrides.
    pub fn register_named_type(
        &mut self,
        name: &str,
        source: &TypeRef,
        target: &TypeRef,
    ) -> DiResult<()> {
        ensure_name(name)?;
        ensure_well_formed("from", source)?;
        ensure_well_formed("to", target)?;

        debug!("Registered named mapping {}:{} -> {}", name, source, target);
        self.named_types
            .insert((name.to_string(), source.clone()), target.clone());
        Ok(())
    }

    /// Store a pre-built object under a unique name
    pub fn register_instance(&mut self, name: &str, instance: Instance) -> DiResult<()> {
        ensure_name(name)?;
        if self.instances.contains_key(name) {
            return Err(DiError::DuplicateName {
                name: name.to_string(),
            });
        }

        debug!("Registered instance `{}` of {}", name, instance.type_ref());
        self.instances.insert(name.to_string(), instance);
        Ok(())
    }

    /// Route every resolution of `source` (and, when open, of its closed
    /// specializations) through `factory`
    pub fn register_factory(&mut self, source: &TypeRef, factory: Factory) -> DiResult<()> {
        ensure_well_formed("from", source)?;
        debug!("Registered factory for {}", source);
        self.factories.insert(source.clone(), factory);
        Ok(())
    }

    /// Type to instantiate for `source`.
    ///
    /// A closed generic with no direct mapping falls back to the mapping of
    /// its generic definition, specialized with its arguments when the
    /// mapped type is open. Unmapped types map to themselves.
    pub fn lookup(&self, source: &TypeRef) -> TypeRef {
        if let Some(target) = self.types.get(source) {
            return target.clone();
        }

        if source.is_closed_generic() {
            let mapped = source
                .generic_definition()
                .and_then(|definition| self.types.get(&definition));
            if let Some(target) = mapped {
                if target.contains_generic_parameters() {
                    return target.specialize(source.type_arguments());
                }
                return target.clone();
            }
        }

        source.clone()
    }

    /// Whether an unnamed mapping exists for exactly `source`
    pub fn has_mapping(&self, source: &TypeRef) -> bool {
        self.types.contains_key(source)
    }

    /// Factory for `ty` or, for a closed generic, for its definition
    pub fn factory_for(&self, ty: &TypeRef) -> Option<Factory> {
        if let Some(factory) = self.factories.get(ty) {
            return Some(Arc::clone(factory));
        }
        if ty.is_closed_generic() {
            return ty
                .generic_definition()
                .and_then(|definition| self.factories.get(&definition))
                .cloned();
        }
        None
    }

    /// Named instance registered under `name`
    pub fn named_instance(&self, name: &str) -> Option<Instance> {
        self.instances.get(name).cloned()
    }

    /// Target of the named mapping `(name, source)`
    pub fn named_type(&self, name: &str, source: &TypeRef) -> Option<TypeRef> {
        self.named_types
            .get(&(name.to_string(), source.clone()))
            .cloned()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.len())
            .field("named_types", &self.named_types.len())
            .field("instances", &self.instances.len())
            .field("factories", &self.factories.len())
            .finish()
    }
}

fn ensure_name(name: &str) -> DiResult<()> {
    if name.trim().is_empty() {
        return Err(DiError::invalid_argument("name", "must not be empty"));
    }
    Ok(())
}

pub(crate) fn ensure_well_formed(argument: &'static str, ty: &TypeRef) -> DiResult<()> {
    if !ty.is_well_formed() {
        return Err(DiError::invalid_argument(
            argument,
            format!("`{}` is not a well-formed type", ty),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeDescriptor;

    fn t0() -> TypeRef {
        TypeRef::param(0)
    }

    fn i32_ty() -> TypeRef {
        TypeRef::named("i32")
    }

    fn catalog() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog.define(TypeDescriptor::interface("IGeneric").generic(1));
        catalog.define(
            TypeDescriptor::concrete("GenericImplementation")
                .generic(1)
                .implements(TypeRef::generic("IGeneric", vec![t0()])),
        );
        catalog.define(TypeDescriptor::interface("IList").generic(1));
        catalog.define(
            TypeDescriptor::concrete("List")
                .generic(1)
                .implements(TypeRef::generic("IList", vec![t0()])),
        );
        catalog.define(TypeDescriptor::concrete("HashSet").generic(1));
        catalog.define(TypeDescriptor::interface("IInterface"));
        catalog.define(TypeDescriptor::concrete("Implementation").implements(TypeRef::named("IInterface")));
        catalog.define(TypeDescriptor::concrete("Other").implements(TypeRef::named("IInterface")));
        catalog.define(TypeDescriptor::concrete("i32"));
        catalog.define(TypeDescriptor::concrete("String"));
        catalog
    }

    #[test]
    fn test_register_and_lookup() {
        let catalog = catalog();
        let mut registry = TypeRegistry::new();
        let iface = TypeRef::named("IInterface");
        let imp = TypeRef::named("Implementation");

        registry.register_type(&catalog, &iface, &imp).unwrap();
        assert_eq!(registry.lookup(&iface), imp);
        assert!(registry.has_mapping(&iface));
    }

    #[test]
    fn test_first_registration_wins() {
        let catalog = catalog();
        let mut registry = TypeRegistry::new();
        let iface = TypeRef::named("IInterface");

        registry
            .register_type(&catalog, &iface, &TypeRef::named("Implementation"))
            .unwrap();
        registry
            .register_type(&catalog, &iface, &TypeRef::named("Other"))
            .unwrap();

        assert_eq!(registry.lookup(&iface), TypeRef::named("Implementation"));
    }

    #[test]
    fn test_unmapped_type_maps_to_itself() {
        let registry = TypeRegistry::new();
        let ty = TypeRef::generic("List", vec![i32_ty()]);
        assert_eq!(registry.lookup(&ty), ty);
    }

    #[test]
    fn test_open_mapping_is_specialized() {
        let catalog = catalog();
        let mut registry = TypeRegistry::new();
        registry
            .register_type(&catalog, &TypeRef::open("IList", 1), &TypeRef::open("List", 1))
            .unwrap();

        let requested = TypeRef::generic("IList", vec![i32_ty()]);
        assert_eq!(
            registry.lookup(&requested),
            TypeRef::generic("List", vec![i32_ty()])
        );
    }

    #[test]
    fn test_closed_target_of_open_mapping_is_not_specialized() {
        let catalog = catalog();
        let mut registry = TypeRegistry::new();
        let target = TypeRef::generic("GenericImplementation", vec![TypeRef::named("String")]);
        registry
            .register_type(&catalog, &TypeRef::open("IGeneric", 1), &target)
            .unwrap();

        assert_eq!(
            registry.lookup(&TypeRef::generic("IGeneric", vec![i32_ty()])),
            target
        );
    }

    #[test]
    fn test_incompatible_registration_fails() {
        let catalog = catalog();
        let mut registry = TypeRegistry::new();

        let result = registry.register_type(
            &catalog,
            &TypeRef::open("IList", 1),
            &TypeRef::open("HashSet", 1),
        );
        assert!(matches!(result, Err(DiError::IncompatibleType { .. })));
        assert!(!registry.has_mapping(&TypeRef::open("IList", 1)));
    }

    #[test]
    fn test_named_types_skip_compatibility_check() {
        let mut registry = TypeRegistry::new();
        let iface = TypeRef::named("IInterface");
        let unrelated = TypeRef::named("String");

        registry.register_named_type("odd", &iface, &unrelated).unwrap();
        assert_eq!(registry.named_type("odd", &iface), Some(unrelated));
        assert_eq!(registry.named_type("other", &iface), None);
        // Named mappings never leak into the unnamed table
        assert_eq!(registry.lookup(&iface), iface);
    }

    #[test]
    fn test_instances() {
        let mut registry = TypeRegistry::new();
        let array = Instance::new(TypeRef::named("i32[]"), vec![1, 2, 3, 4]);

        registry.register_instance("myArray", array.clone()).unwrap();
        let found = registry.named_instance("myArray").unwrap();
        assert!(Instance::ptr_eq(&found, &array));

        assert!(matches!(
            registry.register_instance("myArray", array.clone()),
            Err(DiError::DuplicateName { .. })
        ));
        assert!(matches!(
            registry.register_instance("  ", array),
            Err(DiError::InvalidArgument { argument: "name", .. })
        ));
    }

    #[test]
    fn test_factory_for_open_definition_covers_specializations() {
        let mut registry = TypeRegistry::new();
        let factory: Factory = Arc::new(|ty: &TypeRef| Instance::new(ty.clone(), ()));
        registry
            .register_factory(&TypeRef::open("IList", 1), factory)
            .unwrap();

        assert!(registry
            .factory_for(&TypeRef::generic("IList", vec![i32_ty()]))
            .is_some());
        assert!(registry.factory_for(&TypeRef::open("IList", 1)).is_some());
        assert!(registry
            .factory_for(&TypeRef::generic("List", vec![i32_ty()]))
            .is_none());
    }

    #[test]
    fn test_malformed_types_rejected() {
        let catalog = catalog();
        let mut registry = TypeRegistry::new();
        let result = registry.register_type(
            &catalog,
            &TypeRef::named(""),
            &TypeRef::named("Implementation"),
        );
        assert!(matches!(
            result,
            Err(DiError::InvalidArgument { argument: "from", .. })
        ));
    }
}
