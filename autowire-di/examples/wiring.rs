//! Wiring a small application from a registry table and a TOML file

use anyhow::Result;
use autowire_di::prelude::*;

const CONFIG: &str = r#"
[[bindings]]
interface = "Notifier"
implementation = "EmailNotifier"

[[definitions]]
object = "EmailNotifier"

[definitions.parameters]
Sender = "noreply@example.com"

[globals]
Retries = 3
"#;

fn registry() -> RegistryTable {
    RegistryTable::new()
        .with_interface(InterfaceDescriptor::new("shop/notify.Notifier").method("Notify"))
        .with_struct(
            StructPrototype::builder("shop/notify.EmailNotifier")
                .field("Sender", TypeRef::string())
                .field("Retries", TypeRef::int())
                .method("Notify", |notifier, args| {
                    let sender = notifier.get("Sender").and_then(Value::as_str).unwrap_or("");
                    let to = args.first().and_then(Value::as_str).unwrap_or("");
                    vec![Value::Str(format!("{} -> {}", sender, to))]
                })
                .build(),
        )
        .with_struct(
            StructPrototype::builder("shop/notify.SmsNotifier")
                .field("Gateway", TypeRef::string())
                .method("Notify", |_, _| vec![])
                .build(),
        )
        .with_struct(
            StructPrototype::builder("shop/orders.OrderService")
                .pointer_field("Notifier", TypeRef::interface("shop/notify.Notifier"))
                .pointer_field("Clock", TypeRef::structure("shop/time.Clock"))
                .field("Retries", TypeRef::int())
                .build(),
        )
        .with_struct(StructPrototype::builder("shop/time.Clock").build())
        .with_factory(
            "shop/time.Clock",
            Callable::nullary("shop/time.Clock", || {
                Instance::new("shop/time.Clock").with("Zone", "UTC")
            }),
        )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut builder = Injector::builder();
    builder
        .add_table(registry())
        .with_config(InjectorConfig::from_toml(CONFIG)?);
    let mut injector = builder.build()?;

    let orders = injector.make("shop/orders.OrderService")?;
    println!("{:#?}", orders);

    let mut notifier = injector.make("Notifier")?;
    let sent = injector.invoke(&mut notifier, "Notify", vec!["customer@example.com".into()])?;
    println!("{:?}", sent);

    Ok(())
}
