//! Interceptor type registry and factory system
//!
//! Provides a global catalog for registering interceptor factories under an
//! alias before the host engine is configured. Configuration resolves
//! aliases against an immutable snapshot of the catalog.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::error::{ConfigError, ConfigResult};
use super::interceptor::{Interceptor, Properties};

/// Alias an interceptor type is registered under (e.g., "audit", "paging")
pub type InterceptorAlias = &'static str;

/// Factory function producing a fresh, unconfigured interceptor
pub type InterceptorFactory = Arc<dyn Fn() -> Box<dyn Interceptor> + Send + Sync>;

/// Global catalog of interceptor factories.
pub struct InterceptorCatalog {
    types: RwLock<HashMap<String, InterceptorFactory>>,
}

static CATALOG: Lazy<InterceptorCatalog> = Lazy::new(InterceptorCatalog::new);

impl InterceptorCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            types: RwLock::new(HashMap::new()),
        }
    }

    /// Access the global catalog singleton.
    pub fn global() -> &'static Self {
        &CATALOG
    }

    /// Register an interceptor type with a factory function.
    ///
    /// Registering an alias again replaces the earlier factory.
    pub fn register<F>(&self, alias: InterceptorAlias, factory: F)
    where
        F: Fn() -> Box<dyn Interceptor> + Send + Sync + 'static,
    {
        let mut types = self.types.write();
        types.insert(alias.to_string(), Arc::new(factory));
    }

    /// Register an interceptor type that implements `Default`.
    pub fn register_default<T>(&self, alias: InterceptorAlias)
    where
        T: Interceptor + Default + 'static,
    {
        self.register(alias, || Box::new(T::default()));
    }

    /// Produce an immutable snapshot for one engine configuration.
    pub fn snapshot(&self) -> InterceptorRegistry {
        let types = self.types.read();
        InterceptorRegistry {
            types: Arc::new(types.clone()),
        }
    }
}

impl Default for InterceptorCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable view of the interceptor catalog.
#[derive(Clone)]
pub struct InterceptorRegistry {
    types: Arc<HashMap<String, InterceptorFactory>>,
}

impl InterceptorRegistry {
    /// Instantiate an interceptor and apply its properties once.
    pub fn create(&self, alias: &str, properties: &Properties) -> ConfigResult<Arc<dyn Interceptor>> {
        let factory = self
            .types
            .get(alias)
            .ok_or_else(|| ConfigError::UnknownInterceptor(alias.to_string()))?;

        let mut interceptor = factory();
        interceptor.set_properties(properties);
        tracing::debug!(
            alias,
            interceptor = interceptor.name(),
            properties = properties.len(),
            "Instantiated interceptor"
        );
        Ok(Arc::from(interceptor))
    }

    /// Check whether the snapshot contains the alias.
    pub fn has_type(&self, alias: &str) -> bool {
        self.types.contains_key(alias)
    }

    /// List all aliases known to this snapshot, sorted.
    pub fn list_types(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.types.keys().cloned().collect();
        aliases.sort();
        aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::error::PluginResult;
    use crate::plugin::invocation::Invocation;
    use preserves::IOValue;

    #[derive(Default)]
    struct Passthrough;

    impl Interceptor for Passthrough {
        fn intercept(&self, invocation: Invocation<'_>) -> PluginResult<IOValue> {
            Ok(invocation.proceed()?)
        }
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_registrations() {
        let catalog = InterceptorCatalog::new();
        catalog.register_default::<Passthrough>("passthrough");
        let snapshot = catalog.snapshot();

        catalog.register_default::<Passthrough>("late");

        assert!(snapshot.has_type("passthrough"));
        assert!(!snapshot.has_type("late"));
        assert_eq!(catalog.snapshot().list_types(), vec!["late", "passthrough"]);
    }

    #[test]
    fn test_unknown_alias() {
        let registry = InterceptorCatalog::new().snapshot();
        match registry.create("missing", &Properties::new()) {
            Err(ConfigError::UnknownInterceptor(alias)) => assert_eq!(alias, "missing"),
            Err(other) => panic!("expected UnknownInterceptor, got {other:?}"),
            Ok(_) => panic!("expected UnknownInterceptor"),
        }
    }
}
