//! Configuration-based bindings and definitions

use crate::container::Injector;
use crate::error::{DiError, DiResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Interface binding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Interface name, qualified or short
    pub interface: String,
    /// Implementing struct name, qualified or short
    pub implementation: String,
}

/// Field definitions for one object type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionConfig {
    /// Object type name, qualified or short
    pub object: String,
    /// Field name → value
    #[serde(default)]
    pub parameters: HashMap<String, serde_json::Value>,
}

/// Injector configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjectorConfig {
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
    #[serde(default)]
    pub definitions: Vec<DefinitionConfig>,
    /// Definitions applied to every object with a matching field name
    #[serde(default)]
    pub globals: HashMap<String, serde_json::Value>,
}

impl InjectorConfig {
    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> DiResult<Self> {
        toml::from_str(toml_str)
            .map_err(|e| DiError::ConfigError(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from JSON string
    pub fn from_json(json_str: &str) -> DiResult<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| DiError::ConfigError(format!("Failed to parse JSON: {}", e)))
    }

    /// Apply configuration to an injector.
    ///
    /// Values are converted before anything is recorded, so a config with a
    /// bad value leaves the injector untouched. Bindings are validated
    /// against the registry like [`Injector::bind`].
    pub fn apply(&self, injector: &mut Injector) -> DiResult<()> {
        let mut definitions = Vec::new();
        for definition in &self.definitions {
            for (field, value) in &definition.parameters {
                definitions.push((definition.object.as_str(), field.as_str(), to_value(value)?));
            }
        }

        let mut globals = Vec::new();
        for (field, value) in &self.globals {
            globals.push((field.as_str(), to_value(value)?));
        }

        for binding in &self.bindings {
            injector.bind(&binding.interface, &binding.implementation)?;
        }
        for (object, field, value) in definitions {
            injector.define(object, field, value);
        }
        for (field, value) in globals {
            injector.define_global(field, value);
        }

        debug!(
            "Applied configuration: {} binding(s), {} definition set(s), {} global(s)",
            self.bindings.len(),
            self.definitions.len(),
            self.globals.len()
        );
        Ok(())
    }
}

/// Convert a configuration scalar into a field value
fn to_value(value: &serde_json::Value) -> DiResult<Value> {
    match value {
        serde_json::Value::Null => Ok(Value::Nil),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Int(i)),
            None => n
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| DiError::ConfigError(format!("Unsupported number: {}", n))),
        },
        serde_json::Value::String(s) => Ok(Value::Str(s.clone())),
        other => Err(DiError::ConfigError(format!(
            "Only scalar values can be defined, got: {}",
            other
        ))),
    }
}

/// Configuration builder
#[derive(Default)]
pub struct ConfigBuilder {
    config: InjectorConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an interface to an implementation
    pub fn add_binding(&mut self, interface: &str, implementation: &str) -> &mut Self {
        self.config.bindings.push(BindingConfig {
            interface: interface.to_string(),
            implementation: implementation.to_string(),
        });
        self
    }

    /// Define a field on one object type
    pub fn add_definition(
        &mut self,
        object: &str,
        field: &str,
        value: impl Into<serde_json::Value>,
    ) -> &mut Self {
        let index = match self
            .config
            .definitions
            .iter()
            .position(|definition| definition.object == object)
        {
            Some(index) => index,
            None => {
                self.config.definitions.push(DefinitionConfig {
                    object: object.to_string(),
                    parameters: HashMap::new(),
                });
                self.config.definitions.len() - 1
            }
        };

        self.config.definitions[index]
            .parameters
            .insert(field.to_string(), value.into());
        self
    }

    /// Define a field on every object type
    pub fn add_global(&mut self, field: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        self.config.globals.insert(field.to_string(), value.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> InjectorConfig {
        self.config
    }
}

// Example configuration file format:
// ```toml
// [[bindings]]
// interface = "app.Store"
// implementation = "app.SqlStore"
//
// [[definitions]]
// object = "app.SqlStore"
//
// [definitions.parameters]
// Dsn = "postgres://localhost/app"
//
// [globals]
// Retries = 3
// ```
