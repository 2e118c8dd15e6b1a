//! Ordered interceptor chain
//!
//! Populated while the host engine is configured and shared read-only
//! afterwards. The last interceptor added becomes the outermost layer.

use std::fmt;
use std::sync::Arc;

use super::config::PluginConfig;
use super::error::{ConfigResult, PluginResult};
use super::interceptor::Interceptor;
use super::registry::InterceptorRegistry;
use super::target::Target;

/// Append-only list of interceptors
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain from configuration, in document order.
    ///
    /// Each interceptor is instantiated through the registry, which applies
    /// its properties before it is added.
    pub fn from_config(config: &PluginConfig, registry: &InterceptorRegistry) -> ConfigResult<Self> {
        let mut chain = Self::new();
        for entry in &config.plugins {
            let interceptor = registry.create(&entry.interceptor, &entry.properties)?;
            chain.add_interceptor(interceptor);
        }

        tracing::debug!(interceptors = chain.len(), "Interceptor chain configured");
        Ok(chain)
    }

    /// Append an interceptor
    pub fn add_interceptor(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    /// Offer `target` to every interceptor in insertion order.
    ///
    /// Interceptors with no interest in the target leave it as is.
    pub fn plugin_all(&self, target: Arc<dyn Target>) -> PluginResult<Arc<dyn Target>> {
        self.interceptors
            .iter()
            .try_fold(target, |target, interceptor| {
                Arc::clone(interceptor).plugin(target)
            })
    }

    /// Registered interceptors, in insertion order
    pub fn interceptors(&self) -> &[Arc<dyn Interceptor>] {
        &self.interceptors
    }

    /// Number of registered interceptors
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether no interceptor is registered
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.interceptors.iter().map(|i| i.name()))
            .finish()
    }
}
