//! Type schemas
//!
//! Instead of inspecting live objects, every type the injector can build is
//! described once at registration time: its fields (name, declared type,
//! visibility, ownership) and its method set.

use crate::name::TypeName;
use crate::value::{Instance, Value};
use std::fmt;
use std::sync::Arc;

/// Scalar kinds a field can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    Str,
}

impl ScalarKind {
    pub fn zero(self) -> Value {
        match self {
            ScalarKind::Bool => Value::Bool(false),
            ScalarKind::Int => Value::Int(0),
            ScalarKind::Float => Value::Float(0.0),
            ScalarKind::Str => Value::Str(String::new()),
        }
    }
}

/// Declared type of a field or callable parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Scalar(ScalarKind),
    Struct(TypeName),
    Interface(TypeName),
}

impl TypeRef {
    pub fn bool() -> Self {
        TypeRef::Scalar(ScalarKind::Bool)
    }

    pub fn int() -> Self {
        TypeRef::Scalar(ScalarKind::Int)
    }

    pub fn float() -> Self {
        TypeRef::Scalar(ScalarKind::Float)
    }

    pub fn string() -> Self {
        TypeRef::Scalar(ScalarKind::Str)
    }

    pub fn structure(name: impl Into<TypeName>) -> Self {
        TypeRef::Struct(name.into())
    }

    pub fn interface(name: impl Into<TypeName>) -> Self {
        TypeRef::Interface(name.into())
    }

    /// Name of the referenced struct or interface
    pub fn type_name(&self) -> Option<&TypeName> {
        match self {
            TypeRef::Scalar(_) => None,
            TypeRef::Struct(name) | TypeRef::Interface(name) => Some(name),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, TypeRef::Scalar(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar(kind) => write!(f, "{:?}", kind),
            TypeRef::Struct(name) => write!(f, "struct {}", name),
            TypeRef::Interface(name) => write!(f, "interface {}", name),
        }
    }
}

/// How a slot holds its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Value,
    Pointer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// One structural field of a registered struct
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeRef,
    pub visibility: Visibility,
    pub ownership: Ownership,
}

impl FieldDescriptor {
    /// Public, value-owned field
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: Visibility::Public,
            ownership: Ownership::Value,
        }
    }

    pub fn pointer(mut self) -> Self {
        self.ownership = Ownership::Pointer;
        self
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn zero_value(&self) -> Value {
        match (&self.ty, self.ownership) {
            (TypeRef::Scalar(kind), Ownership::Value) => kind.zero(),
            _ => Value::Nil,
        }
    }
}

/// Method body: receives the receiver and positional arguments
pub type MethodFn = Arc<dyn Fn(&mut Instance, Vec<Value>) -> Vec<Value> + Send + Sync>;

/// A named method in a struct's method set
#[derive(Clone)]
pub struct MethodDescriptor {
    pub name: String,
    body: MethodFn,
}

impl MethodDescriptor {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Instance, Vec<Value>) -> Vec<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    pub fn call(&self, receiver: &mut Instance, args: Vec<Value>) -> Vec<Value> {
        (self.body)(receiver, args)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "func {}()", self.name)
    }
}

/// Schema of a registered struct
#[derive(Debug, Clone)]
pub struct StructDescriptor {
    name: TypeName,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
}

impl StructDescriptor {
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// Instance with every field at its zero value
    pub fn zero_instance(&self) -> Instance {
        let mut instance = Instance::new(self.name.clone());
        for field in &self.fields {
            instance.set(&field.name, field.zero_value());
        }
        instance
    }

    /// Method-set check against an interface's required methods
    pub fn implements(&self, interface: &InterfaceDescriptor) -> bool {
        interface
            .methods()
            .iter()
            .all(|required| self.method(required).is_some())
    }
}

/// Registered struct: its schema plus the seed every build starts from
#[derive(Debug, Clone)]
pub struct StructPrototype {
    descriptor: Arc<StructDescriptor>,
    seed: Instance,
}

impl StructPrototype {
    pub fn builder(name: impl Into<TypeName>) -> StructBuilder {
        StructBuilder::new(name)
    }

    pub fn name(&self) -> &TypeName {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &Arc<StructDescriptor> {
        &self.descriptor
    }

    /// Independent copy of the seed
    pub fn seed(&self) -> Instance {
        self.seed.clone()
    }
}

/// Fluent construction of a [`StructPrototype`]
pub struct StructBuilder {
    name: TypeName,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
    values: Vec<(String, Value)>,
}

impl StructBuilder {
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Add an arbitrary field descriptor
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Public field held by value
    pub fn field(self, name: &str, ty: TypeRef) -> Self {
        self.with_field(FieldDescriptor::new(name, ty))
    }

    /// Public field held by pointer
    pub fn pointer_field(self, name: &str, ty: TypeRef) -> Self {
        self.with_field(FieldDescriptor::new(name, ty).pointer())
    }

    pub fn private_field(self, name: &str, ty: TypeRef) -> Self {
        self.with_field(FieldDescriptor::new(name, ty).private())
    }

    pub fn private_pointer_field(self, name: &str, ty: TypeRef) -> Self {
        self.with_field(FieldDescriptor::new(name, ty).private().pointer())
    }

    pub fn method<F>(mut self, name: &str, body: F) -> Self
    where
        F: Fn(&mut Instance, Vec<Value>) -> Vec<Value> + Send + Sync + 'static,
    {
        self.methods.push(MethodDescriptor::new(name, body));
        self
    }

    /// Seed a field with a non-zero value
    pub fn value(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.values.push((field.to_string(), value.into()));
        self
    }

    pub fn build(self) -> StructPrototype {
        let descriptor = StructDescriptor {
            name: self.name,
            fields: self.fields,
            methods: self.methods,
        };
        let mut seed = descriptor.zero_instance();
        for (field, value) in self.values {
            seed.set(&field, value);
        }
        StructPrototype {
            descriptor: Arc::new(descriptor),
            seed,
        }
    }
}

/// Schema of a registered interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    name: TypeName,
    methods: Vec<String>,
}

impl InterfaceDescriptor {
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Require a method
    pub fn method(mut self, name: &str) -> Self {
        self.methods.push(name.to_string());
        self
    }

    pub fn name(&self) -> &TypeName {
        &self.name
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }
}
