//! Constructor selection and object construction

use tracing::{debug, trace};

use crate::descriptor::{Activation, ConstructorDescriptor};
use crate::error::DiResult;
use crate::frame::ResolutionFrame;
use crate::resolver::Resolver;
use crate::service::Instance;
use crate::types::TypeRef;

impl Resolver<'_> {
    /// Build `concrete` on behalf of `requested`.
    ///
    /// Constructors are tried fewest parameters first. A candidate is skipped
    /// when one of its parameter types has no plausible mapping, or when a
    /// parameter resolves to nothing; the first candidate whose parameters
    /// all resolve is used. Returns `None` when no candidate is viable.
    ///
    /// Skipping on a parameter that resolves to nothing goes beyond the
    /// plausibility filter: an activator cannot be handed a missing argument.
    pub(crate) fn construct(
        &self,
        frame: &mut ResolutionFrame,
        requested: &TypeRef,
        concrete: &TypeRef,
    ) -> DiResult<Option<Instance>> {
        let concrete = bind_open_target(requested, concrete);
        if !self.catalog.is_instantiable(&concrete) {
            trace!("{} is not instantiable", concrete);
            return Ok(None);
        }

        'candidates: for constructor in self.catalog.constructors_of(&concrete) {
            if constructor.arity() == 0 {
                return self.activate(&concrete, &constructor, &[]).map(Some);
            }

            if let Some(missing) = constructor
                .parameters()
                .iter()
                .find(|p| !self.is_plausible(p))
            {
                trace!(
                    "Skipping {} constructor of arity {}: no mapping for {}",
                    concrete,
                    constructor.arity(),
                    missing
                );
                continue;
            }

            let mut arguments = Vec::with_capacity(constructor.arity());
            for parameter in constructor.parameters() {
                match self.resolve(frame, parameter, None)? {
                    Some(argument) => arguments.push(argument),
                    None => {
                        trace!(
                            "Skipping {} constructor of arity {}: {} did not resolve",
                            concrete,
                            constructor.arity(),
                            parameter
                        );
                        continue 'candidates;
                    }
                }
            }

            return self.activate(&concrete, &constructor, &arguments).map(Some);
        }

        debug!("No viable constructor for {}", concrete);
        Ok(None)
    }

    /// Whether resolving `parameter` has a chance of producing an object
    fn is_plausible(&self, parameter: &TypeRef) -> bool {
        let mapped = {
            let registry = self.registry.read();
            if registry.factory_for(parameter).is_some() {
                return true;
            }
            registry.lookup(parameter)
        };
        self.catalog
            .is_instantiable(&bind_open_target(parameter, &mapped))
    }

    fn activate(
        &self,
        concrete: &TypeRef,
        constructor: &ConstructorDescriptor,
        arguments: &[Instance],
    ) -> DiResult<Instance> {
        trace!(
            "Activating {} with {} argument(s)",
            concrete,
            arguments.len()
        );
        let activation = Activation::new(concrete, arguments);
        let value = constructor.activate(&activation)?;
        Ok(Instance::from_service(concrete.clone(), value))
    }
}

/// Bind a target that still has parameter slots to the requested type's
/// arguments
fn bind_open_target(requested: &TypeRef, concrete: &TypeRef) -> TypeRef {
    if concrete.contains_generic_parameters() && requested.is_closed_generic() {
        concrete.specialize(requested.type_arguments())
    } else {
        concrete.clone()
    }
}
