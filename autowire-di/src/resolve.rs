//! Resolution engine
//!
//! Turns a requested name into a finished object graph. For every public
//! field of the object being built it decides between a definition, a
//! cached object, a delegate or factory, and a freshly built sub-object:
//!
//! - scalar fields are only ever filled from definitions;
//! - struct fields try a definition, the object cache, a delegate or
//!   factory, then the registry prototype, which is built recursively;
//! - interface fields are first narrowed to a concrete struct through a
//!   binding or the single registered implementor.
//!
//! Anything a delegate or factory returns is trusted to be complete, so it
//! is neither walked nor cached.

use tracing::{debug, trace};

use crate::container::Injector;
use crate::error::{DiError, DiResult};
use crate::name::TypeName;
use crate::provider::Callable;
use crate::schema::{FieldDescriptor, InterfaceDescriptor, StructPrototype, TypeRef};
use crate::value::{Instance, Value};

/// Per-call state of one `make`: the requested name, the chain of types
/// whose fields are being built and the chain of delegates whose arguments
/// are being resolved
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    root: String,
    chain: Vec<TypeName>,
    calls: Vec<Callable>,
}

impl ResolutionContext {
    pub fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
            chain: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// Push a type onto the construction chain, failing if it is already on it
    pub fn enter(&mut self, name: &TypeName) -> DiResult<()> {
        if self.chain.contains(name) {
            let mut path: Vec<&str> = self.chain.iter().map(TypeName::as_str).collect();
            path.push(name.as_str());
            return Err(DiError::CircularDependency {
                path: path.join(" -> "),
            });
        }

        self.chain.push(name.clone());
        Ok(())
    }

    pub fn leave(&mut self) {
        self.chain.pop();
    }

    /// Push a delegate whose arguments are about to be resolved, failing if
    /// the same delegate is already waiting on its arguments
    pub fn enter_call(&mut self, callable: &Callable) -> DiResult<()> {
        if self.calls.iter().any(|pending| pending.same_body(callable)) {
            let mut path: Vec<&str> = self.calls.iter().map(|c| c.returns().as_str()).collect();
            path.push(callable.returns().as_str());
            return Err(DiError::CircularDependency {
                path: path.join(" -> "),
            });
        }

        self.calls.push(callable.clone());
        Ok(())
    }

    pub fn leave_call(&mut self) {
        self.calls.pop();
    }
}

/// What an interface request narrowed down to
enum Target {
    /// Concrete struct still to be provisioned
    Struct(TypeName),
    /// Finished instance from a delegate or factory
    Produced(Instance),
}

impl Injector {
    pub(crate) fn make_in(&mut self, ctx: &mut ResolutionContext, name: &str) -> DiResult<Instance> {
        if self.registry.is_shared_short_name(name) {
            debug!("Short name '{}' names both a struct and an interface", name);
            return Err(DiError::unregistered(name));
        }

        let seed = match self.registry.find_struct(name).map(StructPrototype::seed) {
            Some(seed) => seed,
            None => {
                let interface = self
                    .registry
                    .find_interface(name)
                    .cloned()
                    .ok_or_else(|| DiError::unregistered(name))?;

                match self.resolve_interface(ctx, &interface, name)? {
                    Target::Produced(instance) => return Ok(instance),
                    Target::Struct(concrete) => self.prototype(concrete.as_str())?.seed(),
                }
            }
        };

        if let Some(cached) = self.objects.find(seed.type_name().as_str()) {
            debug!(
                "Object of type: '{}' was already provisioned - returning",
                cached.type_name()
            );
            return Ok(cached);
        }

        let type_name = seed.type_name().clone();
        if let Some(produced) = self.resolve_delegate(ctx, &type_name)? {
            return Ok(produced);
        }

        let mut built = seed;
        self.build_fields(ctx, &mut built)?;
        self.objects.store(built.clone());
        Ok(built)
    }

    /// Narrow an interface to a concrete struct: explicit binding, then a
    /// delegate or factory for the interface itself, then the single
    /// registered implementor
    fn resolve_interface(
        &mut self,
        ctx: &mut ResolutionContext,
        interface: &InterfaceDescriptor,
        requested: &str,
    ) -> DiResult<Target> {
        if let Some(bound) = self.bindings.resolve(interface, requested) {
            debug!("Interface '{}' is bound to: '{}'", interface.name(), bound);
            return Ok(Target::Struct(bound.clone()));
        }

        if let Some(produced) = self.resolve_delegate(ctx, interface.name())? {
            return Ok(Target::Produced(produced));
        }

        self.single_implementor(interface).map(Target::Struct)
    }

    fn single_implementor(&self, interface: &InterfaceDescriptor) -> DiResult<TypeName> {
        let candidates = self
            .registry
            .find_structs_implementing(interface.name().as_str());

        match candidates.as_slice() {
            [] => Err(DiError::NoImplementation {
                interface: interface.name().to_string(),
            }),
            [only] => {
                debug!(
                    "Single type: '{}' implementing: '{}' was found and provisioned",
                    only.name(),
                    interface.name()
                );
                Ok(only.name().clone())
            }
            many => Err(DiError::AmbiguousImplementation {
                interface: interface.name().to_string(),
                candidates: many.iter().map(|p| p.name().to_string()).collect(),
            }),
        }
    }

    /// Produce an instance through a delegate or an auto-discovered factory.
    ///
    /// Delegates are looked up under the qualified name, then the short
    /// name. Auto-discovered factories are only used when exactly one is
    /// registered for the type.
    pub(crate) fn resolve_delegate(
        &mut self,
        ctx: &mut ResolutionContext,
        name: &TypeName,
    ) -> DiResult<Option<Instance>> {
        let qualified = self.qualify(name.as_str());

        let delegate = self
            .delegates
            .find(qualified.as_str())
            .or_else(|| self.delegates.find(name.as_str()))
            .or_else(|| self.delegates.find(qualified.short()));

        let callable = match delegate {
            Some(delegate) => delegate,
            None => match self.auto_factory(&qualified)? {
                Some(factory) => {
                    debug!("Found single factory automatically in registry: {:?}", factory);
                    factory
                }
                None => return Ok(None),
            },
        };

        let produced = self.call(ctx, &callable)?;
        debug!(
            "Delegate {:?} called for type: '{}' and returned: '{}'",
            callable,
            qualified,
            produced.type_name()
        );
        Ok(Some(produced))
    }

    fn auto_factory(&self, name: &TypeName) -> DiResult<Option<Callable>> {
        match self.registry.find_factories(name.as_str()) {
            [] => Ok(None),
            [only] => Ok(Some(only.clone())),
            many => Err(DiError::AmbiguousFactory {
                type_name: name.to_string(),
                count: many.len(),
            }),
        }
    }

    fn call(&mut self, ctx: &mut ResolutionContext, callable: &Callable) -> DiResult<Instance> {
        if callable.arity() == 0 {
            trace!("No invocation args required for delegate: {:?}", callable);
            return Ok(callable.call(Vec::new()));
        }

        ctx.enter_call(callable)?;
        let args = self.resolve_args(ctx, callable)?;
        ctx.leave_call();

        Ok(callable.call(args))
    }

    /// Walk the fields of `current` in declaration order, assigning each
    /// public one in place
    pub(crate) fn build_fields(
        &mut self,
        ctx: &mut ResolutionContext,
        current: &mut Instance,
    ) -> DiResult<()> {
        let Some(descriptor) = self
            .registry
            .find_struct(current.type_name().as_str())
            .map(|prototype| prototype.descriptor().clone())
        else {
            return Ok(());
        };

        ctx.enter(descriptor.name())?;
        trace!(
            "Object: '{}' has {} field(s), depth {}",
            descriptor.name(),
            descriptor.fields().len(),
            ctx.depth()
        );

        for field in descriptor.fields() {
            if !field.is_public() {
                debug!(
                    "Found private field: {} of type: {} on object: '{}', ignoring",
                    field.name,
                    field.ty,
                    descriptor.name()
                );
                current.set(&field.name, field.zero_value());
                continue;
            }

            debug!(
                "Found field: {} of type: {} on object: '{}'",
                field.name,
                field.ty,
                descriptor.name()
            );

            let value = match &field.ty {
                TypeRef::Scalar(_) => self.definitions.lookup(descriptor.name(), &field.name).cloned(),
                TypeRef::Struct(name) => Some(self.provision_struct(ctx, descriptor.name(), field, name)?),
                TypeRef::Interface(name) => Some(self.provision_interface(ctx, name)?),
            };

            if let Some(value) = value {
                current.set(&field.name, value.adapt(field.ownership));
            }
        }

        ctx.leave();
        Ok(())
    }

    fn provision_struct(
        &mut self,
        ctx: &mut ResolutionContext,
        owner: &TypeName,
        field: &FieldDescriptor,
        name: &TypeName,
    ) -> DiResult<Value> {
        if let Some(definition) = self.definitions.lookup(owner, &field.name) {
            debug!(
                "Definition of kind: '{}' was found for field: {} on object: '{}' - injecting",
                definition.kind_name(),
                field.name,
                owner
            );
            return Ok(definition.clone());
        }

        let qualified = self.qualify(name.as_str());
        if let Some(cached) = self.cached(&qualified) {
            return Ok(cached.into());
        }

        if let Some(produced) = self.resolve_delegate(ctx, name)? {
            return Ok(produced.into());
        }

        let mut seed = self.prototype(name.as_str())?.seed();
        self.build_fields(ctx, &mut seed)?;
        Ok(seed.into())
    }

    fn provision_interface(&mut self, ctx: &mut ResolutionContext, name: &TypeName) -> DiResult<Value> {
        let interface = self
            .registry
            .find_interface(name.as_str())
            .cloned()
            .ok_or_else(|| DiError::unregistered(name.as_str()))?;

        let bound = self.bindings.resolve(&interface, name.as_str()).cloned();
        let (concrete, interface_checked) = match bound {
            Some(concrete) => (concrete, false),
            None => match self.resolve_delegate(ctx, interface.name())? {
                Some(produced) => return Ok(produced.into()),
                None => (self.single_implementor(&interface)?, true),
            },
        };

        if let Some(cached) = self.cached(&concrete) {
            return Ok(cached.into());
        }

        if let Some(produced) = self.resolve_delegate(ctx, &concrete)? {
            return Ok(produced.into());
        }

        if !interface_checked {
            if let Some(produced) = self.resolve_delegate(ctx, interface.name())? {
                return Ok(produced.into());
            }
        }

        let mut seed = self.prototype(concrete.as_str())?.seed();
        self.build_fields(ctx, &mut seed)?;
        Ok(seed.into())
    }

    /// One argument per declared parameter of `callable`
    fn resolve_args(&mut self, ctx: &mut ResolutionContext, callable: &Callable) -> DiResult<Vec<Value>> {
        trace!("Resolving invocation args for delegate: {:?}", callable);

        let mut args = Vec::with_capacity(callable.arity());
        for param in callable.params() {
            let value = match &param.ty {
                TypeRef::Scalar(kind) => {
                    debug!(
                        "Encountered scalar argument: {} for delegate: {:?}, injecting zero value",
                        param.ty, callable
                    );
                    kind.zero()
                }
                TypeRef::Interface(name) => self.interface_arg(ctx, callable, name)?,
                TypeRef::Struct(name) => self.struct_arg(ctx, name)?,
            };
            args.push(value.adapt(param.ownership));
        }

        Ok(args)
    }

    fn interface_arg(
        &mut self,
        ctx: &mut ResolutionContext,
        callable: &Callable,
        name: &TypeName,
    ) -> DiResult<Value> {
        let interface = self
            .registry
            .find_interface(name.as_str())
            .cloned()
            .ok_or_else(|| DiError::unregistered(name.as_str()))?;

        if let Some(produced) = self.resolve_delegate(ctx, interface.name())? {
            return Ok(produced.into());
        }

        let concrete = match self.bindings.resolve(&interface, name.as_str()) {
            Some(bound) => bound.clone(),
            None => self.single_implementor(&interface)?,
        };

        // A factory depending on the very type it returns gets the plain
        // seed instead of calling itself again
        if concrete == self.qualify(callable.returns().as_str()) {
            debug!(
                "Argument '{}' resolves to the return type of {:?}, passing its seed",
                interface.name(),
                callable
            );
            return Ok(self.prototype(concrete.as_str())?.seed().into());
        }

        self.struct_arg(ctx, &concrete)
    }

    fn struct_arg(&mut self, ctx: &mut ResolutionContext, name: &TypeName) -> DiResult<Value> {
        let qualified = self.qualify(name.as_str());
        if let Some(cached) = self.objects.find(qualified.as_str()) {
            debug!("Encountered cached argument of type: '{}'", qualified);
            return Ok(cached.into());
        }

        if let Some(produced) = self.resolve_delegate(ctx, name)? {
            return Ok(produced.into());
        }

        let mut fresh = self.prototype(name.as_str())?.descriptor().zero_instance();
        debug!("Provisioning new argument of type: '{}' (none cached)", qualified);
        self.build_fields(ctx, &mut fresh)?;
        Ok(fresh.into())
    }

    /// Cached copy of a type, refreshing its cache entry on a hit
    fn cached(&mut self, name: &TypeName) -> Option<Instance> {
        let cached = self.objects.find(name.as_str())?;
        debug!(
            "Dependency of type: '{}' was already provisioned - injecting",
            name
        );
        self.objects.store(cached.clone());
        Some(cached)
    }

    fn prototype(&self, name: &str) -> DiResult<&StructPrototype> {
        self.registry
            .find_struct(name)
            .ok_or_else(|| DiError::unregistered(name))
    }

    /// Registered qualified name for `name`, or `name` itself if unknown
    fn qualify(&self, name: &str) -> TypeName {
        self.registry
            .find_struct(name)
            .map(StructPrototype::name)
            .or_else(|| {
                self.registry
                    .find_interface(name)
                    .map(InterfaceDescriptor::name)
            })
            .cloned()
            .unwrap_or_else(|| TypeName::new(name))
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
