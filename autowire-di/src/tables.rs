//! Binding and definition tables

use crate::name::{short_name, TypeName};
use crate::schema::InterfaceDescriptor;
use crate::value::Value;
use rustc_hash::FxHashMap;

/// Explicit interface → struct overrides
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: FxHashMap<String, TypeName>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a binding under the interface name exactly as given
    pub fn bind(&mut self, interface_name: &str, implementation: TypeName) {
        self.bindings.insert(interface_name.to_string(), implementation);
    }

    /// Struct bound to an interface. Tried in order: the name the caller
    /// asked for, the interface's qualified name, its short name.
    pub fn resolve(&self, interface: &InterfaceDescriptor, requested: &str) -> Option<&TypeName> {
        self.bindings
            .get(requested)
            .or_else(|| self.bindings.get(interface.name().as_str()))
            .or_else(|| self.bindings.get(interface.name().short()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Literal field values, scoped to one object type or global
#[derive(Debug, Clone, Default)]
pub struct DefinitionTable {
    /// Object name → field name → value
    scoped: FxHashMap<String, FxHashMap<String, Value>>,
    /// Field name → value
    global: FxHashMap<String, Value>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, object_name: &str, field_name: &str, value: Value) {
        self.scoped
            .entry(object_name.to_string())
            .or_default()
            .insert(field_name.to_string(), value);
    }

    pub fn define_global(&mut self, field_name: &str, value: Value) {
        self.global.insert(field_name.to_string(), value);
    }

    /// Definition for a field of `object`: scoped under the short name,
    /// then under the qualified name, then global.
    pub fn lookup(&self, object: &TypeName, field_name: &str) -> Option<&Value> {
        let scoped = |name: &str| {
            self.scoped
                .get(name)
                .and_then(|fields| fields.get(field_name))
        };

        scoped(short_name(object.as_str()))
            .or_else(|| scoped(object.as_str()))
            .or_else(|| self.global.get(field_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_definition_wins_over_global() {
        let mut definitions = DefinitionTable::new();
        definitions.define_global("Port", Value::Int(80));
        definitions.define("app.Server", "Port", Value::Int(8080));

        let server = TypeName::new("app.Server");
        let client = TypeName::new("app.Client");
        assert_eq!(definitions.lookup(&server, "Port"), Some(&Value::Int(8080)));
        assert_eq!(definitions.lookup(&client, "Port"), Some(&Value::Int(80)));
        assert_eq!(definitions.lookup(&client, "Host"), None);
    }

    #[test]
    fn test_short_name_scope_is_checked_first() {
        let mut definitions = DefinitionTable::new();
        definitions.define("app.Server", "Port", Value::Int(1));
        definitions.define("Server", "Port", Value::Int(2));

        let server = TypeName::new("app.Server");
        assert_eq!(definitions.lookup(&server, "Port"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_binding_resolves_by_any_interface_name() {
        let interface = InterfaceDescriptor::new("app.Store");
        let mut bindings = BindingTable::new();
        assert!(bindings.resolve(&interface, "app.Store").is_none());

        bindings.bind("Store", TypeName::new("app.SqlStore"));
        assert_eq!(
            bindings.resolve(&interface, "app.Store").map(TypeName::as_str),
            Some("app.SqlStore")
        );
    }
}
