//! Injector builder for fluent configuration

use crate::container::Injector;
use crate::error::DiResult;
use crate::name::TypeName;
use crate::provider::Callable;
use crate::registry::{RegistryTable, TypeRegistry};
use crate::schema::{InterfaceDescriptor, StructPrototype};
use crate::value::{Instance, Value};

#[cfg(feature = "config")]
use crate::config::InjectorConfig;

/// Builder for constructing an injector.
///
/// Registrations go straight into the registry. Configuration calls that
/// can fail (`bind`, `delegate`, config files) are recorded and only
/// validated by [`InjectorBuilder::build`], once every table and module has
/// been added.
#[derive(Default)]
pub struct InjectorBuilder {
    registry: TypeRegistry,
    shared: Vec<Instance>,
    delegates: Vec<(String, Value)>,
    bindings: Vec<(String, String)>,
    definitions: Vec<(String, String, Value)>,
    globals: Vec<(String, Value)>,
    #[cfg(feature = "config")]
    configs: Vec<InjectorConfig>,
}

impl InjectorBuilder {
    /// Create a new injector builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_struct(&mut self, prototype: StructPrototype) -> &mut Self {
        self.registry.register_struct(prototype);
        self
    }

    pub fn register_interface(&mut self, interface: InterfaceDescriptor) -> &mut Self {
        self.registry.register_interface(interface);
        self
    }

    /// Register an auto-discovered factory for a type
    pub fn register_factory(&mut self, name: impl Into<TypeName>, factory: Callable) -> &mut Self {
        self.registry.register_factory(name, factory);
        self
    }

    /// Merge a generated registration table
    pub fn add_table(&mut self, table: RegistryTable) -> &mut Self {
        self.registry.add(table);
        self
    }

    pub fn share(&mut self, instance: Instance) -> &mut Self {
        self.shared.push(instance);
        self
    }

    pub fn delegate(&mut self, name: &str, delegate: impl Into<Value>) -> &mut Self {
        self.delegates.push((name.to_string(), delegate.into()));
        self
    }

    pub fn bind(&mut self, interface_name: &str, struct_name: &str) -> &mut Self {
        self.bindings
            .push((interface_name.to_string(), struct_name.to_string()));
        self
    }

    pub fn define(&mut self, object_name: &str, field_name: &str, value: impl Into<Value>) -> &mut Self {
        self.definitions
            .push((object_name.to_string(), field_name.to_string(), value.into()));
        self
    }

    pub fn define_global(&mut self, field_name: &str, value: impl Into<Value>) -> &mut Self {
        self.globals.push((field_name.to_string(), value.into()));
        self
    }

    /// Apply a bindings/definitions file at build time
    #[cfg(feature = "config")]
    pub fn with_config(&mut self, config: InjectorConfig) -> &mut Self {
        self.configs.push(config);
        self
    }

    /// Build the injector, validating deferred configuration
    pub fn build(self) -> DiResult<Injector> {
        let mut injector = Injector::new(self.registry);

        for instance in self.shared {
            injector.share(instance);
        }
        for (name, delegate) in self.delegates {
            injector.delegate(&name, delegate)?;
        }
        for (interface_name, struct_name) in &self.bindings {
            injector.bind(interface_name, struct_name)?;
        }
        for (object_name, field_name, value) in self.definitions {
            injector.define(&object_name, &field_name, value);
        }
        for (field_name, value) in self.globals {
            injector.define_global(&field_name, value);
        }

        #[cfg(feature = "config")]
        for config in &self.configs {
            config.apply(&mut injector)?;
        }

        Ok(injector)
    }
}

/// Extension methods for fluent builder pattern
impl InjectorBuilder {
    /// Add registrations using a configuration function
    pub fn add_registrations<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        configure(&mut self);
        self
    }

    /// Add registrations from a module
    pub fn add_module<M: Module>(mut self, module: M) -> Self {
        module.configure(&mut self);
        self
    }
}

/// A reusable group of registrations
pub trait Module {
    /// Register this module's types and configuration
    fn configure(&self, builder: &mut InjectorBuilder);
}

impl Module for RegistryTable {
    fn configure(&self, builder: &mut InjectorBuilder) {
        builder.add_table(self.clone());
    }
}
