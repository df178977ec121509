//! Test doubles shared by the integration tests

#![allow(dead_code)]

use effective_ioc::prelude::*;
use effective_ioc::Module;
use std::sync::Arc;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

pub fn ty(name: &str) -> TypeRef {
    TypeRef::named(name)
}

pub fn generic(definition: &str, args: Vec<TypeRef>) -> TypeRef {
    TypeRef::generic(definition, args)
}

pub fn t0() -> TypeRef {
    TypeRef::param(0)
}

pub fn i32_ty() -> TypeRef {
    ty("i32")
}

#[derive(Debug)]
pub struct InterfaceImplementation;

#[derive(Debug)]
pub struct Class1;

#[derive(Debug)]
pub struct ArgumentError {
    pub message: String,
}

#[derive(Debug)]
pub struct Leaf;

#[derive(Debug)]
pub struct DependantTwo {
    pub leaf: Arc<Leaf>,
}

#[derive(Debug)]
pub struct DependantOne {
    pub two: Arc<DependantTwo>,
    pub implementation: Arc<InterfaceImplementation>,
}

#[derive(Debug)]
pub struct CircularDependant1;

#[derive(Debug)]
pub struct CircularDependant2;

#[derive(Debug)]
pub struct SelfDependant;

/// Holds one `CircularDependant1` reached through `ICircular` and one built
/// directly
#[derive(Debug)]
pub struct Tangle;

/// Backing object for every `List<T>`
#[derive(Debug)]
pub struct GenericList {
    pub element: TypeRef,
}

#[derive(Debug)]
pub struct GenericSet {
    pub element: TypeRef,
}

#[derive(Debug)]
pub struct GenericImplementation {
    pub element: TypeRef,
}

#[derive(Debug)]
pub struct Comparer {
    pub element: TypeRef,
}

#[derive(Debug)]
pub struct Sorter {
    pub element: TypeRef,
    pub comparer: Arc<Comparer>,
}

#[derive(Debug)]
pub struct DelegateSuper;

#[derive(Debug)]
pub struct DelegateOther;

/// Built by whichever constructor won
#[derive(Debug, PartialEq)]
pub enum Notifier {
    ViaMissing,
    ViaLeaves,
}

#[derive(Debug)]
pub struct Root;

#[derive(Debug)]
pub struct Diamond {
    pub left: Arc<Leaf>,
    pub right: Arc<Leaf>,
}

fn element_of(activation: &Activation<'_>) -> TypeRef {
    activation.type_arguments()[0].clone()
}

fn service<T: Service>(value: T) -> DiResult<Arc<dyn Service>> {
    Ok(Arc::new(value))
}

/// The mappings an application would ship in its configuration file
pub fn app_config() -> MappingTables {
    MappingTables::new()
        .with_type("IInterface", "InterfaceImplementation")
        .with_type("ICollection<i32>", "List<i32>")
        .with_type("IEnumerable<>", "List<i32>")
        .with_type("IFormattable", "Class1")
}

pub fn define_test_types(builder: &mut ContainerBuilder) {
    builder
        .define(TypeDescriptor::concrete("i32"))
        .define(TypeDescriptor::concrete("String"))
        // Plain interface family
        .define(TypeDescriptor::interface("IInterface"))
        .define(
            TypeDescriptor::concrete("InterfaceImplementation")
                .implements(ty("IInterface"))
                .with_default(|| InterfaceImplementation),
        )
        .define(TypeDescriptor::interface("IFormattable"))
        .define(
            TypeDescriptor::concrete("Class1")
                .implements(ty("IFormattable"))
                .with_default(|| Class1),
        )
        .define(
            TypeDescriptor::concrete("ArgumentError")
                .constructor(ConstructorDescriptor::new(vec![ty("String")], |_| {
                    service(ArgumentError {
                        message: "from string".to_string(),
                    })
                }))
                .with_default(|| ArgumentError {
                    message: String::new(),
                }),
        )
        // Concrete dependency chains
        .define(TypeDescriptor::concrete("Leaf").with_default(|| Leaf))
        .define(
            TypeDescriptor::concrete("DependantTwo").constructor(ConstructorDescriptor::new(
                vec![ty("Leaf")],
                |a| service(DependantTwo { leaf: a.get(0)? }),
            )),
        )
        .define(
            TypeDescriptor::concrete("DependantOne").constructor(ConstructorDescriptor::new(
                vec![ty("DependantTwo"), ty("IInterface")],
                |a| {
                    service(DependantOne {
                        two: a.get(0)?,
                        implementation: a.get(1)?,
                    })
                },
            )),
        )
        .define(TypeDescriptor::interface("ICircular"))
        .define(
            TypeDescriptor::concrete("CircularDependant1")
                .implements(ty("ICircular"))
                .constructor(ConstructorDescriptor::new(
                    vec![ty("CircularDependant2")],
                    |_| service(CircularDependant1),
                )),
        )
        .define(
            TypeDescriptor::concrete("CircularDependant2").constructor(
                ConstructorDescriptor::new(vec![ty("CircularDependant1")], |_| {
                    service(CircularDependant2)
                }),
            ),
        )
        .define(
            TypeDescriptor::concrete("SelfDependant").constructor(ConstructorDescriptor::new(
                vec![ty("SelfDependant")],
                |_| service(SelfDependant),
            )),
        )
        .define(
            TypeDescriptor::concrete("Tangle").constructor(ConstructorDescriptor::new(
                vec![ty("ICircular"), ty("CircularDependant1")],
                |_| service(Tangle),
            )),
        )
        .define(
            TypeDescriptor::concrete("Root").constructor(ConstructorDescriptor::new(
                vec![ty("Leaf"), ty("CircularDependant1")],
                |_| service(Root),
            )),
        )
        .define(
            TypeDescriptor::concrete("Diamond").constructor(ConstructorDescriptor::new(
                vec![ty("Leaf"), ty("Leaf")],
                |a| {
                    service(Diamond {
                        left: a.get(0)?,
                        right: a.get(1)?,
                    })
                },
            )),
        )
        // Overload selection: the unary constructor needs an unmapped interface
        .define(TypeDescriptor::interface("IMissing"))
        .define(
            TypeDescriptor::concrete("Notifier")
                .constructor(ConstructorDescriptor::new(vec![ty("Leaf"), ty("Leaf")], |_| {
                    service(Notifier::ViaLeaves)
                }))
                .constructor(ConstructorDescriptor::new(vec![ty("IMissing")], |_| {
                    service(Notifier::ViaMissing)
                })),
        )
        // Generic collection family
        .define(TypeDescriptor::interface("IEnumerable").generic(1))
        .define(
            TypeDescriptor::interface("ICollection")
                .generic(1)
                .implements(generic("IEnumerable", vec![t0()])),
        )
        .define(
            TypeDescriptor::interface("IList")
                .generic(1)
                .implements(generic("ICollection", vec![t0()])),
        )
        .define(
            TypeDescriptor::interface("ISet")
                .generic(1)
                .implements(generic("ICollection", vec![t0()])),
        )
        .define(
            TypeDescriptor::concrete("List")
                .generic(1)
                .implements(generic("IList", vec![t0()]))
                .constructor(ConstructorDescriptor::new(Vec::new(), |a| {
                    service(GenericList {
                        element: element_of(a),
                    })
                })),
        )
        .define(
            TypeDescriptor::concrete("HashSet")
                .generic(1)
                .implements(generic("ISet", vec![t0()]))
                .constructor(ConstructorDescriptor::new(Vec::new(), |a| {
                    service(GenericSet {
                        element: element_of(a),
                    })
                })),
        )
        .define(TypeDescriptor::interface("IGeneric").generic(1))
        .define(
            TypeDescriptor::concrete("GenericImplementation")
                .generic(1)
                .implements(generic("IGeneric", vec![t0()]))
                .constructor(ConstructorDescriptor::new(Vec::new(), |a| {
                    service(GenericImplementation {
                        element: element_of(a),
                    })
                })),
        )
        .define(TypeDescriptor::interface("IComparer").generic(1))
        .define(
            TypeDescriptor::concrete("Comparer")
                .generic(1)
                .implements(generic("IComparer", vec![t0()]))
                .constructor(ConstructorDescriptor::new(Vec::new(), |a| {
                    service(Comparer {
                        element: element_of(a),
                    })
                })),
        )
        .define(
            TypeDescriptor::concrete("Sorter")
                .generic(1)
                .constructor(ConstructorDescriptor::new(
                    vec![generic("IComparer", vec![t0()])],
                    |a| {
                        service(Sorter {
                            element: element_of(a),
                            comparer: a.get(0)?,
                        })
                    },
                )),
        )
        // Factory overrides
        .define(TypeDescriptor::abstract_type("DelegateBase"))
        .define(
            TypeDescriptor::concrete("DelegateSuper")
                .implements(ty("DelegateBase"))
                .with_default(|| DelegateSuper),
        )
        .define(
            TypeDescriptor::concrete("DelegateOther")
                .implements(ty("DelegateBase"))
                .with_default(|| DelegateOther),
        );
}

/// Every test type, as one module
pub struct TestTypes;

impl Module for TestTypes {
    fn name(&self) -> &str {
        "test-types"
    }

    fn describe(&self, builder: &mut ContainerBuilder) {
        define_test_types(builder);
    }
}

/// Builder holding the test types and, optionally, a configuration
pub fn builder_with(config: Option<MappingTables>) -> ContainerBuilder {
    init_tracing();
    let mut builder = ContainerBuilder::new();
    builder.add_module(TestTypes);
    if let Some(config) = config {
        builder.with_mapping_source(config);
    }
    builder
}

/// Container with the test types and the application configuration
pub fn container() -> Container {
    builder_with(Some(app_config())).build()
}

/// Container with the test types and no configuration
pub fn bare_container() -> Container {
    builder_with(None).build()
}
