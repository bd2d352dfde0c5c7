//! Object and delegate caches

use crate::error::{DiError, DiResult};
use crate::name::TypeName;
use crate::provider::Callable;
use crate::value::{Instance, Value};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Built or shared objects keyed by qualified type name.
///
/// Reads hand out independent copies, so mutating a returned object never
/// changes what later reads see. Entries live as long as the cache.
#[derive(Debug, Clone, Default)]
pub struct ObjectCache {
    objects: FxHashMap<TypeName, Instance>,
}

impl ObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object under its own type name, replacing any previous entry
    pub fn store(&mut self, instance: Instance) {
        debug!("Cached object of type: {}", instance.type_name());
        self.objects.insert(instance.type_name().clone(), instance);
    }

    /// Copy of the cached object for a type
    pub fn find(&self, name: &str) -> Option<Instance> {
        match self.objects.get(name) {
            Some(instance) => {
                trace!("Cache hit for object: {}", name);
                Some(instance.clone())
            }
            None => {
                trace!("Cache miss for object: {}", name);
                None
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn size(&self) -> usize {
        self.objects.len()
    }

    /// Names of all cached objects
    pub fn cached_types(&self) -> Vec<TypeName> {
        self.objects.keys().cloned().collect()
    }
}

/// User-registered delegates keyed by the name they were registered under
#[derive(Debug, Clone, Default)]
pub struct DelegateCache {
    delegates: FxHashMap<String, Callable>,
}

impl DelegateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a delegate. Only callables are accepted.
    pub fn store(&mut self, name: &str, delegate: Value) -> DiResult<()> {
        match delegate {
            Value::Callable(callable) => {
                debug!("Registered delegate {:?} for: {}", callable, name);
                self.delegates.insert(name.to_string(), callable);
                Ok(())
            }
            other => Err(DiError::InvalidConfiguration(format!(
                "You can only delegate a function as a factory method for type: '{}', got: {}",
                name,
                other.kind_name()
            ))),
        }
    }

    pub fn find(&self, name: &str) -> Option<Callable> {
        let found = self.delegates.get(name).cloned();
        trace!(
            "Delegate lookup for '{}': {}",
            name,
            if found.is_some() { "hit" } else { "miss" }
        );
        found
    }

    pub fn contains(&self, name: &str) -> bool {
        self.delegates.contains_key(name)
    }

    pub fn size(&self) -> usize {
        self.delegates.len()
    }
}
