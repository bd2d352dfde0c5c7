//! Qualified type names

use std::borrow::Borrow;
use std::fmt;

/// Namespace-qualified name of a registered type, e.g. `app/storage.SqlStore`.
///
/// The short name is the segment after the last `.`; everything before it is
/// the namespace, which may itself contain `/` and `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        TypeName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing name segment
    pub fn short(&self) -> &str {
        short_name(&self.0)
    }

    /// Everything before the short name, if the name is qualified
    pub fn namespace(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(namespace, _)| namespace)
    }

    pub fn is_qualified(&self) -> bool {
        is_qualified(&self.0)
    }
}

/// Trailing segment of a possibly qualified name
pub fn short_name(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, short)| short)
}

pub fn is_qualified(name: &str) -> bool {
    name.contains('.')
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        TypeName::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        TypeName(name)
    }
}

impl From<&TypeName> for TypeName {
    fn from(name: &TypeName) -> Self {
        name.clone()
    }
}
