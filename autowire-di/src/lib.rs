//! Automatic dependency injection over registered type schemas
//!
//! Types are described once at startup (struct fields, interface method
//! sets, factory functions) and collected in a [`TypeRegistry`]. An
//! [`Injector`] then builds complete object graphs from a type name alone:
//! every public field is filled from a definition, a shared object, a
//! delegate or factory, or a recursively built sub-object.
//!
//! ```
//! use autowire_di::prelude::*;
//!
//! let mut builder = InjectorBuilder::new();
//! builder
//!     .register_struct(
//!         StructPrototype::builder("app.Server")
//!             .field("Port", TypeRef::int())
//!             .pointer_field("Logger", TypeRef::structure("app.Logger"))
//!             .build(),
//!     )
//!     .register_struct(StructPrototype::builder("app.Logger").build())
//!     .define("Server", "Port", 8080);
//!
//! let mut injector = builder.build().unwrap();
//! let server = injector.make("app.Server").unwrap();
//! assert_eq!(server.get("Port"), Some(&Value::Int(8080)));
//! assert!(server.child("Logger").is_some());
//! ```

pub mod builder;
pub mod cache;
pub mod container;
pub mod error;
pub mod name;
pub mod provider;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod tables;
pub mod value;

#[cfg(feature = "config")]
pub mod config;

pub use builder::{InjectorBuilder, Module};
pub use cache::{DelegateCache, ObjectCache};
pub use container::Injector;
pub use error::{DiError, DiResult};
pub use name::TypeName;
pub use provider::{Callable, CallableBody, Param};
pub use registry::{FactoryEntry, RegistryTable, TypeRegistry};
pub use resolve::ResolutionContext;
pub use schema::{
    FieldDescriptor, InterfaceDescriptor, MethodDescriptor, Ownership, ScalarKind,
    StructDescriptor, StructPrototype, TypeRef, Visibility,
};
pub use value::{Instance, Value};

#[cfg(feature = "config")]
pub use config::{ConfigBuilder, InjectorConfig};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::{
        Callable, DiError, DiResult, Injector, InjectorBuilder, Instance, InterfaceDescriptor,
        Module, Param, RegistryTable, StructPrototype, TypeRef, TypeRegistry, Value,
    };

    #[cfg(feature = "config")]
    pub use crate::config::InjectorConfig;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_basic_injector() {
        let mut builder = InjectorBuilder::new();
        builder.register_struct(
            StructPrototype::builder("app.Greeter")
                .field("Greeting", TypeRef::string())
                .build(),
        );
        builder.define_global("Greeting", "Hello, DI!");

        let mut injector = builder.build().unwrap();
        let greeter = injector.make("Greeter").unwrap();
        assert_eq!(greeter.get("Greeting").and_then(Value::as_str), Some("Hello, DI!"));
    }
}
