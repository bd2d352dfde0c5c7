//! Integration tests for the injector

use autowire_di::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

// Test application: a user service talking to a store through an
// interface, with a logger shared across the graph.
fn app_table() -> RegistryTable {
    RegistryTable::new()
        .with_struct(
            StructPrototype::builder("app/log.Logger")
                .field("Name", TypeRef::string())
                .field("Level", TypeRef::string())
                .value("Level", "info")
                .build(),
        )
        .with_interface(
            InterfaceDescriptor::new("app/storage.UserStore")
                .method("Get")
                .method("Put"),
        )
        .with_struct(
            StructPrototype::builder("app/storage.SqlStore")
                .field("Dsn", TypeRef::string())
                .pointer_field("Logger", TypeRef::structure("app/log.Logger"))
                .private_field("conn", TypeRef::int())
                .method("Get", |store, args| {
                    let id = args.first().and_then(Value::as_int).unwrap_or(0);
                    let dsn = store.get("Dsn").and_then(Value::as_str).unwrap_or("");
                    vec![Value::Str(format!("{}/users/{}", dsn, id))]
                })
                .method("Put", |_, _| vec![])
                .build(),
        )
        .with_struct(
            StructPrototype::builder("app/storage.MemStore")
                .field("Capacity", TypeRef::int())
                .method("Get", |_, _| vec![Value::Str("memory".into())])
                .method("Put", |_, _| vec![])
                .build(),
        )
        .with_struct(
            StructPrototype::builder("app/users.UserService")
                .pointer_field("Store", TypeRef::interface("app/storage.UserStore"))
                .pointer_field("Logger", TypeRef::structure("app/log.Logger"))
                .field("Retries", TypeRef::int())
                .build(),
        )
}

#[test]
fn test_full_graph_with_binding_and_definitions() {
    let mut builder = Injector::builder();
    builder
        .add_table(app_table())
        .bind("UserStore", "SqlStore")
        .define("SqlStore", "Dsn", "postgres://localhost/app")
        .define("app/users.UserService", "Retries", 5)
        .define_global("Retries", 1)
        .define_global("Name", "app");

    let mut injector = builder.build().unwrap();
    let service = injector.make("app/users.UserService").unwrap();

    let store = service.child("Store").unwrap();
    assert_eq!(store.type_name().as_str(), "app/storage.SqlStore");
    assert_eq!(
        store.get("Dsn").and_then(Value::as_str),
        Some("postgres://localhost/app")
    );
    assert_eq!(store.get("conn"), Some(&Value::Int(0)));

    let logger = store.child("Logger").unwrap();
    assert_eq!(logger.get("Name").and_then(Value::as_str), Some("app"));
    assert_eq!(logger.get("Level").and_then(Value::as_str), Some("info"));

    assert_eq!(service.get("Retries"), Some(&Value::Int(5)));
}

#[test]
fn test_ambiguous_store_requires_binding() {
    let mut injector = Injector::new(TypeRegistry::from_tables([app_table()]));

    match injector.make("app/users.UserService") {
        Err(DiError::AmbiguousImplementation { interface, candidates }) => {
            assert_eq!(interface, "app/storage.UserStore");
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("expected ambiguity, got {:?}", other),
    }

    injector.bind("app/storage.UserStore", "app/storage.MemStore").unwrap();
    let service = injector.make("app/users.UserService").unwrap();
    assert_eq!(
        service.child("Store").unwrap().type_name().as_str(),
        "app/storage.MemStore"
    );
}

#[test]
fn test_shared_logger_is_used_everywhere() {
    let mut injector = Injector::new(TypeRegistry::from_tables([app_table()]));
    injector.bind("UserStore", "SqlStore").unwrap();

    let shared = Instance::new("app/log.Logger")
        .with("Name", "shared")
        .with("Level", "debug");
    injector.share(shared.clone());

    let service = injector.make("app/users.UserService").unwrap();
    assert_eq!(service.child("Logger"), Some(&shared));
    assert_eq!(service.child("Store").unwrap().child("Logger"), Some(&shared));
}

#[test]
fn test_built_objects_are_cached_as_singletons() {
    let mut injector = Injector::new(TypeRegistry::from_tables([app_table()]));
    injector.bind("UserStore", "MemStore").unwrap();
    injector.define("MemStore", "Capacity", 10);

    let mut first = injector.make("app/users.UserService").unwrap();
    first
        .child_mut("Store")
        .unwrap()
        .set("Capacity", 99);

    let second = injector.make("app/users.UserService").unwrap();
    assert_eq!(
        second.child("Store").unwrap().get("Capacity"),
        Some(&Value::Int(10))
    );
    assert!(injector.objects().contains("app/users.UserService"));
}

#[test]
fn test_delegated_store_is_rebuilt_every_time() {
    let mut injector = Injector::new(TypeRegistry::from_tables([app_table()]));
    let connections = Arc::new(AtomicI64::new(0));
    let counter = Arc::clone(&connections);

    injector
        .delegate(
            "app/storage.UserStore",
            Callable::typed(
                "app/storage.UserStore",
                vec![Param::pointer(TypeRef::structure("app/log.Logger"))],
                move |args| {
                    let id = counter.fetch_add(1, Ordering::SeqCst);
                    Instance::new("app/storage.SqlStore")
                        .with("Dsn", format!("conn-{}", id))
                        .with("Logger", args[0].clone())
                },
            ),
        )
        .unwrap();

    let first = injector.make("UserStore").unwrap();
    let second = injector.make("UserStore").unwrap();
    assert_ne!(first.get("Dsn"), second.get("Dsn"));
    assert_eq!(connections.load(Ordering::SeqCst), 2);
    assert!(first.get("Logger").unwrap().is_pointer());
}

#[test]
fn test_invoke_method_on_built_object() {
    let mut injector = Injector::new(TypeRegistry::from_tables([app_table()]));
    injector.define("SqlStore", "Dsn", "postgres://db");

    let mut store = injector.make("app/storage.SqlStore").unwrap();
    let results = injector.invoke(&mut store, "Get", vec![Value::Int(7)]).unwrap();
    assert_eq!(results, vec![Value::Str("postgres://db/users/7".into())]);

    assert!(matches!(
        injector.invoke(&mut store, "Delete", vec![]),
        Err(DiError::MethodNotFound { .. })
    ));
}

#[test]
fn test_failed_make_caches_nothing() {
    let mut injector = Injector::new(TypeRegistry::from_tables([app_table()]));

    assert!(injector.make("app/users.UserService").is_err());
    assert_eq!(injector.objects().size(), 0);
}
