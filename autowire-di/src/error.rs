//! Error types for the injector

use thiserror::Error;

/// Result type alias for injector operations
pub type DiResult<T> = Result<T, DiError>;

/// Errors that can occur while configuring the injector or building objects.
///
/// Every variant describes a wiring mistake rather than a transient
/// condition, so none of them are worth retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiError {
    /// Name absent from the struct and interface registries
    #[error("No type found in registry for name: '{name}', did you forget to register it?")]
    UnregisteredType { name: String },

    /// More than one struct implements an interface and none is bound
    #[error(
        "Multiple implementing types were found for interface: '{interface}' ({}), specify one with bind()",
        candidates.join(", ")
    )]
    AmbiguousImplementation {
        interface: String,
        candidates: Vec<String>,
    },

    /// No struct implements an interface and no delegate produces it
    #[error(
        "No implementing type found for interface: '{interface}', register exactly one, bind() one or delegate() a factory"
    )]
    NoImplementation { interface: String },

    /// More than one auto-discovered factory produces the same type
    #[error(
        "{count} factories exist in registry for type: '{type_name}', you must delegate() one first"
    )]
    AmbiguousFactory { type_name: String, count: usize },

    /// A configuration call referenced something unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A type re-entered its own construction chain
    #[error("Circular dependency detected: {path}")]
    CircularDependency { path: String },

    /// Method lookup for `invoke` failed
    #[error("Method '{method}' not found on type: '{type_name}'")]
    MethodNotFound { type_name: String, method: String },

    /// Configuration file could not be parsed or converted
    #[cfg(feature = "config")]
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DiError {
    /// Shorthand for an unregistered type error
    pub fn unregistered(name: impl Into<String>) -> Self {
        DiError::UnregisteredType { name: name.into() }
    }

    /// Whether this error was raised by a configuration call rather than by
    /// resolution itself
    pub fn is_configuration(&self) -> bool {
        match self {
            DiError::InvalidConfiguration(_) => true,
            #[cfg(feature = "config")]
            DiError::ConfigError(_) => true,
            _ => false,
        }
    }
}
