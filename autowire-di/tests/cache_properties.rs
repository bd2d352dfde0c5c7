//! Property tests for cached object isolation

use autowire_di::prelude::*;
use proptest::prelude::*;

fn injector(seed: i64, label: &str) -> Injector {
    let mut builder = Injector::builder();
    builder
        .register_struct(
            StructPrototype::builder("app.Outer")
                .field("Int", TypeRef::int())
                .pointer_field("Inner", TypeRef::structure("app.Inner"))
                .value("Int", seed)
                .build(),
        )
        .register_struct(
            StructPrototype::builder("app.Inner")
                .field("Label", TypeRef::string())
                .build(),
        )
        .define("Inner", "Label", label);
    builder.build().unwrap()
}

proptest! {
    #[test]
    fn make_is_idempotent(seed in any::<i64>(), label in "[a-z]{0,12}") {
        let mut injector = injector(seed, &label);

        let first = injector.make("app.Outer").unwrap();
        let second = injector.make("app.Outer").unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.get("Int"), Some(&Value::Int(seed)));
    }

    #[test]
    fn mutations_never_reach_the_cache(
        seed in any::<i64>(),
        replacement in any::<i64>(),
        label in "[a-z]{1,12}",
    ) {
        let mut injector = injector(seed, &label);

        let mut first = injector.make("app.Outer").unwrap();
        first.set("Int", replacement);
        first.child_mut("Inner").unwrap().set("Label", "mutated");

        let second = injector.make("app.Outer").unwrap();
        prop_assert_eq!(second.get("Int"), Some(&Value::Int(seed)));
        prop_assert_eq!(
            second.child("Inner").unwrap().get("Label").and_then(Value::as_str),
            Some(label.as_str())
        );
    }
}
