//! Delegates and factories

use crate::name::TypeName;
use crate::schema::{Ownership, TypeRef};
use crate::value::{Instance, Value};
use std::fmt;
use std::sync::Arc;

/// Declared parameter of a callable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: TypeRef,
    pub ownership: Ownership,
}

impl Param {
    pub fn new(ty: TypeRef) -> Self {
        Self {
            ty,
            ownership: Ownership::Value,
        }
    }

    pub fn pointer(ty: TypeRef) -> Self {
        Self {
            ty,
            ownership: Ownership::Pointer,
        }
    }
}

/// Factory body
#[derive(Clone)]
pub enum CallableBody {
    /// Takes no arguments
    Nullary(Arc<dyn Fn() -> Instance + Send + Sync>),
    /// Takes one resolved argument per declared parameter
    Typed(Arc<dyn Fn(Vec<Value>) -> Instance + Send + Sync>),
}

/// A delegate or auto-discovered factory producing one type
#[derive(Clone)]
pub struct Callable {
    returns: TypeName,
    params: Vec<Param>,
    body: CallableBody,
}

impl Callable {
    /// Zero-argument factory
    pub fn nullary<F>(returns: impl Into<TypeName>, factory: F) -> Self
    where
        F: Fn() -> Instance + Send + Sync + 'static,
    {
        Self {
            returns: returns.into(),
            params: Vec::new(),
            body: CallableBody::Nullary(Arc::new(factory)),
        }
    }

    /// Factory whose arguments are resolved by the injector
    pub fn typed<F>(returns: impl Into<TypeName>, params: Vec<Param>, factory: F) -> Self
    where
        F: Fn(Vec<Value>) -> Instance + Send + Sync + 'static,
    {
        Self {
            returns: returns.into(),
            params,
            body: CallableBody::Typed(Arc::new(factory)),
        }
    }

    /// Declared return type
    pub fn returns(&self) -> &TypeName {
        &self.returns
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn body(&self) -> &CallableBody {
        &self.body
    }

    /// Call with already-resolved arguments
    pub fn call(&self, args: Vec<Value>) -> Instance {
        match &self.body {
            CallableBody::Nullary(factory) => factory(),
            CallableBody::Typed(factory) => factory(args),
        }
    }

    /// Whether both callables share the same body
    pub fn same_body(&self, other: &Callable) -> bool {
        match (&self.body, &other.body) {
            (CallableBody::Nullary(a), CallableBody::Nullary(b)) => Arc::ptr_eq(a, b),
            (CallableBody::Typed(a), CallableBody::Typed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|param| match param.ownership {
                Ownership::Value => param.ty.to_string(),
                Ownership::Pointer => format!("*{}", param.ty),
            })
            .collect();
        write!(f, "func({}) {}", params.join(", "), self.returns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_callable_receives_args() {
        let factory = Callable::typed(
            "app.Counter",
            vec![Param::new(TypeRef::int())],
            |args| {
                let start = args.first().and_then(Value::as_int).unwrap_or(-1);
                Instance::new("app.Counter").with("Start", start)
            },
        );

        assert_eq!(factory.arity(), 1);
        let counter = factory.call(vec![Value::Int(7)]);
        assert_eq!(counter.get("Start"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_debug_signature() {
        let factory = Callable::typed(
            "app.Service",
            vec![Param::pointer(TypeRef::structure("app.Db"))],
            |_| Instance::new("app.Service"),
        );
        assert_eq!(format!("{:?}", factory), "func(*struct app.Db) app.Service");
    }

    #[test]
    fn test_same_body_compares_identity() {
        let a = Callable::nullary("app.X", || Instance::new("app.X"));
        let b = Callable::nullary("app.X", || Instance::new("app.X"));
        assert!(a.same_body(&a.clone()));
        assert!(!a.same_body(&b));
    }
}
