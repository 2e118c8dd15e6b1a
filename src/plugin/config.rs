//! Interceptor configuration documents
//!
//! A host engine lists its interceptors by alias, each with opaque string
//! properties, in a JSON document:
//!
//! ```json
//! { "plugins": [ { "interceptor": "audit", "properties": { "level": "full" } } ] }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::ConfigResult;
use super::interceptor::Properties;

/// Ordered list of configured interceptors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Entries in chain order
    #[serde(default)]
    pub plugins: Vec<PluginEntry>,
}

/// One configured interceptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    /// Registry alias
    pub interceptor: String,

    /// Properties handed to `set_properties`
    #[serde(default)]
    pub properties: Properties,
}

impl PluginEntry {
    /// Entry with no properties
    pub fn new(interceptor: impl Into<String>) -> Self {
        Self {
            interceptor: interceptor.into(),
            properties: Properties::new(),
        }
    }

    /// Add a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl PluginConfig {
    /// Parse a configuration document
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration document from disk
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// Write the configuration document to disk
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let data = serde_json::to_vec_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)?;
        Ok(())
    }
}
