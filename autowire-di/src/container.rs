//! The injector and its public operations

use tracing::{debug, error};

use crate::builder::InjectorBuilder;
use crate::cache::{DelegateCache, ObjectCache};
use crate::error::{DiError, DiResult};
use crate::registry::TypeRegistry;
use crate::resolve::ResolutionContext;
use crate::tables::{BindingTable, DefinitionTable};
use crate::value::{Instance, Value};

/// Automatic object-graph builder.
///
/// Owns the type registry, the object and delegate caches, and the binding
/// and definition tables. Every operation runs synchronously on the
/// caller's thread; configuration and `make` take `&mut self`, so sharing an
/// injector across threads needs external locking.
#[derive(Debug, Clone, Default)]
pub struct Injector {
    pub(crate) registry: TypeRegistry,
    pub(crate) objects: ObjectCache,
    pub(crate) delegates: DelegateCache,
    pub(crate) bindings: BindingTable,
    pub(crate) definitions: DefinitionTable,
}

impl Injector {
    /// Create an injector over a populated registry
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Create a new injector builder
    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::new()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn objects(&self) -> &ObjectCache {
        &self.objects
    }

    /// Build an instance of a registered struct or interface, wiring every
    /// public field recursively.
    ///
    /// Results built by the injector are cached, so later calls return
    /// copies of the first result. Results produced by a delegate or
    /// factory are returned as is and never cached.
    pub fn make(&mut self, name: &str) -> DiResult<Instance> {
        debug!("Injector asked to provision: '{}'", name);

        let mut ctx = ResolutionContext::new(name);
        self.make_in(&mut ctx, name).map_err(fail)
    }

    /// Share a pre-built instance: any later request for its type, at any
    /// depth, receives a copy of it.
    ///
    /// A short type name is qualified through the registry first; an
    /// unregistered name is kept as written.
    pub fn share(&mut self, mut instance: Instance) {
        if let Some(prototype) = self.registry.find_struct(instance.type_name().as_str()) {
            let qualified = prototype.name().clone();
            instance.set_type_name(qualified);
        }

        debug!("Sharing object of type: '{}'", instance.type_name());
        self.objects.store(instance);
    }

    /// Bind an interface to one implementing struct.
    ///
    /// Needed whenever more than one registered struct implements the
    /// interface.
    pub fn bind(&mut self, interface_name: &str, struct_name: &str) -> DiResult<()> {
        if !self.registry.has_interface(interface_name) {
            return Err(fail(DiError::InvalidConfiguration(format!(
                "Interface type: '{}' not found in registry, did you register it?",
                interface_name
            ))));
        }

        let implementation = match self.registry.find_struct(struct_name) {
            Some(prototype) => prototype.name().clone(),
            None => {
                return Err(fail(DiError::InvalidConfiguration(format!(
                    "Struct type: '{}' not found in registry, did you register it?",
                    struct_name
                ))))
            }
        };

        debug!("Bound interface '{}' to: '{}'", interface_name, implementation);
        self.bindings.bind(interface_name, implementation);
        Ok(())
    }

    /// Hand construction of a type over to a factory function.
    ///
    /// `name` may be qualified or short. The delegate wins over any
    /// auto-discovered factory, and its results are never cached.
    pub fn delegate(&mut self, name: &str, delegate: impl Into<Value>) -> DiResult<()> {
        self.delegates.store(name, delegate.into()).map_err(fail)
    }

    /// Define a field value for one object type
    pub fn define(&mut self, object_name: &str, field_name: &str, value: impl Into<Value>) {
        self.definitions.define(object_name, field_name, value.into());
    }

    /// Define a field value for every object that has a field with this name
    pub fn define_global(&mut self, field_name: &str, value: impl Into<Value>) {
        self.definitions.define_global(field_name, value.into());
    }

    /// Call a method from the instance type's method table and return
    /// everything it returns
    pub fn invoke(
        &self,
        instance: &mut Instance,
        method_name: &str,
        args: Vec<Value>,
    ) -> DiResult<Vec<Value>> {
        let method = self
            .registry
            .find_struct(instance.type_name().as_str())
            .and_then(|prototype| prototype.descriptor().method(method_name))
            .cloned()
            .ok_or_else(|| {
                fail(DiError::MethodNotFound {
                    type_name: instance.type_name().to_string(),
                    method: method_name.to_string(),
                })
            })?;

        debug!(
            "Invoking {:?} on object of type: '{}' with {} arg(s)",
            method,
            instance.type_name(),
            args.len()
        );
        Ok(method.call(instance, args))
    }
}

/// Report a fault before handing it back to the caller
fn fail(err: DiError) -> DiError {
    error!("{}", err);
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Callable;
    use crate::registry::RegistryTable;
    use crate::schema::{InterfaceDescriptor, StructPrototype, TypeRef};

    fn injector() -> Injector {
        Injector::new(TypeRegistry::from_tables([RegistryTable::new()
            .with_struct(
                StructPrototype::builder("app.Counter")
                    .field("Count", TypeRef::int())
                    .method("Increment", |counter, args| {
                        let by = args.first().and_then(Value::as_int).unwrap_or(1);
                        let count = counter.get("Count").and_then(Value::as_int).unwrap_or(0);
                        counter.set("Count", count + by);
                        vec![Value::Int(count + by)]
                    })
                    .build(),
            )
            .with_interface(InterfaceDescriptor::new("app.Incrementer").method("Increment"))]))
    }

    #[test]
    fn test_bind_requires_registered_types() {
        let mut injector = injector();

        let err = injector.bind("app.Missing", "app.Counter").unwrap_err();
        assert!(err.is_configuration());

        let err = injector.bind("app.Incrementer", "app.Missing").unwrap_err();
        assert!(err.is_configuration());

        assert!(injector.bind("Incrementer", "Counter").is_ok());
    }

    #[test]
    fn test_delegate_requires_callable() {
        let mut injector = injector();
        assert!(injector.delegate("app.Counter", 42).is_err());

        let factory = Callable::nullary("app.Counter", || Instance::new("app.Counter"));
        assert!(injector.delegate("app.Counter", factory).is_ok());
    }

    #[test]
    fn test_invoke_calls_method_with_args() {
        let injector = injector();
        let mut counter = injector.registry().find_struct("app.Counter").unwrap().seed();

        let results = injector
            .invoke(&mut counter, "Increment", vec![Value::Int(5)])
            .unwrap();

        assert_eq!(results, vec![Value::Int(5)]);
        assert_eq!(counter.get("Count"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_invoke_unknown_method() {
        let injector = injector();
        let mut counter = Instance::new("app.Counter");

        let err = injector.invoke(&mut counter, "Reset", vec![]).unwrap_err();
        assert_eq!(
            err,
            DiError::MethodNotFound {
                type_name: "app.Counter".to_string(),
                method: "Reset".to_string(),
            }
        );
    }
}
