//! Runtime object model
//!
//! Objects built by the injector are plain data: an [`Instance`] is a type
//! name plus ordered field values, and a [`Value`] is anything a field,
//! definition or argument can hold. Cloning is always deep, which is what
//! gives cached objects their copy-on-read isolation.

use crate::name::TypeName;
use crate::provider::Callable;
use crate::schema::Ownership;
use std::fmt;

/// A field, definition, argument or return value
#[derive(Clone)]
pub enum Value {
    /// Zero value of pointers, interfaces and unpopulated struct fields
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Struct held by value
    Object(Instance),
    /// Pointer to a value
    Pointer(Box<Value>),
    /// Delegate or factory function
    Callable(Callable),
}

impl Value {
    /// Pointer to a struct instance
    pub fn pointer_to(instance: Instance) -> Self {
        Value::Pointer(Box::new(Value::Object(instance)))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Value::Pointer(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Callable(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.deref_pointers() {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.deref_pointers() {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.deref_pointers() {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.deref_pointers() {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The struct instance behind this value, looking through pointers
    pub fn as_instance(&self) -> Option<&Instance> {
        match self.deref_pointers() {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn as_instance_mut(&mut self) -> Option<&mut Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            Value::Pointer(inner) => inner.as_instance_mut(),
            _ => None,
        }
    }

    pub fn into_instance(self) -> Option<Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            Value::Pointer(inner) => (*inner).into_instance(),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    /// Re-shape this value for a slot with the given ownership.
    ///
    /// Pointers are dereferenced for value slots and non-nil values are
    /// boxed for pointer slots; `Nil` stays `Nil` either way.
    pub fn adapt(self, ownership: Ownership) -> Value {
        match (self, ownership) {
            (Value::Pointer(inner), Ownership::Value) => (*inner).adapt(Ownership::Value),
            (Value::Nil, _) => Value::Nil,
            (pointer @ Value::Pointer(_), Ownership::Pointer) => pointer,
            (value, Ownership::Pointer) => Value::Pointer(Box::new(value)),
            (value, Ownership::Value) => value,
        }
    }

    /// Short description of the value's kind, for diagnostics
    pub fn kind_name(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Str(_) => "string".to_string(),
            Value::Object(instance) => instance.type_name().to_string(),
            Value::Pointer(inner) => format!("*{}", inner.kind_name()),
            Value::Callable(callable) => format!("func() {}", callable.returns()),
        }
    }

    fn deref_pointers(&self) -> &Value {
        let mut value = self;
        while let Value::Pointer(inner) = value {
            value = inner;
        }
        value
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Pointer(a), Value::Pointer(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.same_body(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Object(instance) => fmt::Debug::fmt(instance, f),
            Value::Pointer(inner) => write!(f, "&{:?}", inner),
            Value::Callable(callable) => fmt::Debug::fmt(callable, f),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Object(instance)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Callable(callable)
    }
}

/// A built (or partially built) struct
#[derive(Clone, PartialEq)]
pub struct Instance {
    type_name: TypeName,
    fields: Vec<(String, Value)>,
}

impl Instance {
    /// Instance with no fields set
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field assignment
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub(crate) fn set_type_name(&mut self, type_name: TypeName) {
        self.type_name = type_name;
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Set a field, appending it if the instance does not carry it yet
    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.get_mut(field) {
            Some(slot) => *slot = value,
            None => self.fields.push((field.to_string(), value)),
        }
    }

    /// Nested instance held by a struct or pointer field
    pub fn child(&self, field: &str) -> Option<&Instance> {
        self.get(field).and_then(Value::as_instance)
    }

    pub fn child_mut(&mut self, field: &str) -> Option<&mut Instance> {
        self.get_mut(field).and_then(Value::as_instance_mut)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.type_name.as_str());
        for (name, value) in &self.fields {
            s.field(name, value);
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapt_between_value_and_pointer() {
        let instance = Instance::new("app.Config").with("Port", 8080);

        let pointer = Value::Object(instance.clone()).adapt(Ownership::Pointer);
        assert!(pointer.is_pointer());
        assert_eq!(pointer.as_instance(), Some(&instance));

        let value = pointer.adapt(Ownership::Value);
        assert_eq!(value, Value::Object(instance));

        assert_eq!(Value::Nil.adapt(Ownership::Pointer), Value::Nil);
    }

    #[test]
    fn test_clone_is_deep() {
        let original = Instance::new("app.Outer")
            .with("Inner", Value::pointer_to(Instance::new("app.Inner").with("Int", 42)));

        let mut copy = original.clone();
        copy.child_mut("Inner").unwrap().set("Int", 21);

        assert_eq!(original.child("Inner").unwrap().get("Int"), Some(&Value::Int(42)));
        assert_eq!(copy.child("Inner").unwrap().get("Int"), Some(&Value::Int(21)));
    }

    #[test]
    fn test_set_replaces_existing_field() {
        let mut instance = Instance::new("app.X").with("Int", 1);
        instance.set("Int", 2);
        assert_eq!(instance.field_count(), 1);
        assert_eq!(instance.get("Int").and_then(Value::as_int), Some(2));
    }
}
