//! Type registry
//!
//! The catalogue of every struct, interface and auto-discovered factory the
//! injector knows about. It is filled once at startup, usually from
//! generated [`RegistryTable`]s, and only read afterwards.

use crate::name::{is_qualified, TypeName};
use crate::provider::Callable;
use crate::schema::{InterfaceDescriptor, StructPrototype};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Factories registered in bulk under the type they produce
#[derive(Debug, Clone)]
pub struct FactoryEntry {
    pub name: TypeName,
    pub implementations: Vec<Callable>,
}

/// One batch of registrations, typically emitted by a code generator
#[derive(Debug, Clone, Default)]
pub struct RegistryTable {
    pub structs: Vec<StructPrototype>,
    pub interfaces: Vec<InterfaceDescriptor>,
    pub factories: Vec<FactoryEntry>,
}

impl RegistryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_struct(mut self, prototype: StructPrototype) -> Self {
        self.structs.push(prototype);
        self
    }

    pub fn with_interface(mut self, interface: InterfaceDescriptor) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_factory(mut self, name: impl Into<TypeName>, factory: Callable) -> Self {
        let name = name.into();
        match self.factories.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.implementations.push(factory),
            None => self.factories.push(FactoryEntry {
                name,
                implementations: vec![factory],
            }),
        }
        self
    }
}

/// Registry of all application types
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    /// Only contains struct prototypes
    structs: FxHashMap<TypeName, StructPrototype>,
    /// Only contains interface descriptors
    interfaces: FxHashMap<TypeName, InterfaceDescriptor>,
    /// Only contains factories
    factories: FxHashMap<TypeName, Vec<Callable>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge any number of tables into a fresh registry
    pub fn from_tables(tables: impl IntoIterator<Item = RegistryTable>) -> Self {
        let mut registry = Self::new();
        for table in tables {
            registry.add(table);
        }
        registry
    }

    /// Merge a table. Structs and interfaces replace same-named entries,
    /// factory lists accumulate.
    pub fn add(&mut self, table: RegistryTable) {
        for prototype in table.structs {
            self.register_struct(prototype);
        }
        for interface in table.interfaces {
            self.register_interface(interface);
        }
        for entry in table.factories {
            for factory in entry.implementations {
                self.register_factory(entry.name.clone(), factory);
            }
        }
    }

    pub fn register_struct(&mut self, prototype: StructPrototype) {
        self.structs.insert(prototype.name().clone(), prototype);
    }

    pub fn register_interface(&mut self, interface: InterfaceDescriptor) {
        self.interfaces.insert(interface.name().clone(), interface);
    }

    pub fn register_factory(&mut self, name: impl Into<TypeName>, factory: Callable) {
        self.factories.entry(name.into()).or_default().push(factory);
    }

    /// Find a struct by qualified name or unambiguous short name
    pub fn find_struct(&self, name: &str) -> Option<&StructPrototype> {
        lookup(&self.structs, name)
    }

    /// Find an interface by qualified name or unambiguous short name
    pub fn find_interface(&self, name: &str) -> Option<&InterfaceDescriptor> {
        lookup(&self.interfaces, name)
    }

    /// Factories registered for a type, empty if there are none
    pub fn find_factories(&self, name: &str) -> &[Callable] {
        lookup(&self.factories, name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every registered struct whose method set satisfies the interface,
    /// sorted by name
    pub fn find_structs_implementing(&self, interface_name: &str) -> Vec<&StructPrototype> {
        let Some(interface) = self.find_interface(interface_name) else {
            return Vec::new();
        };

        let mut found: Vec<&StructPrototype> = self
            .structs
            .values()
            .filter(|prototype| prototype.descriptor().implements(interface))
            .collect();
        found.sort_by(|a, b| a.name().cmp(b.name()));

        trace!(
            "{} struct(s) implement interface '{}'",
            found.len(),
            interface.name()
        );
        found
    }

    /// Whether an unqualified name matches both a struct and an interface.
    /// Such a name cannot pick a type by itself.
    pub fn is_shared_short_name(&self, name: &str) -> bool {
        !is_qualified(name) && self.has_struct(name) && self.has_interface(name)
    }

    pub fn has_struct(&self, name: &str) -> bool {
        self.find_struct(name).is_some()
    }

    pub fn has_interface(&self, name: &str) -> bool {
        self.find_interface(name).is_some()
    }

    /// Registered struct names, sorted
    pub fn struct_names(&self) -> Vec<&TypeName> {
        let mut names: Vec<&TypeName> = self.structs.keys().collect();
        names.sort();
        names
    }

    /// Registered interface names, sorted
    pub fn interface_names(&self) -> Vec<&TypeName> {
        let mut names: Vec<&TypeName> = self.interfaces.keys().collect();
        names.sort();
        names
    }
}

/// Exact lookup, preceded by a short-name scan when `name` is unqualified.
/// A short name shared by several entries is unusable.
fn lookup<'a, T>(entries: &'a FxHashMap<TypeName, T>, name: &str) -> Option<&'a T> {
    if !is_qualified(name) {
        let mut matches = entries.iter().filter(|(key, _)| key.short() == name);
        if let (Some((_, entry)), None) = (matches.next(), matches.next()) {
            return Some(entry);
        }
    }

    entries.get(name)
}
