//! Interceptor contract
//!
//! Interceptors declare what they intercept through `intercepts` and receive
//! every matching call through `intercept`.

use preserves::IOValue;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::error::PluginResult;
use super::invocation::Invocation;
use super::signature::Intercepts;
use super::surrogate::Plugin;
use super::target::Target;

/// Opaque configuration handed to an interceptor
pub type Properties = BTreeMap<String, String>;

/// Conversion into a shared trait object; implemented for every interceptor.
pub trait IntoInterceptor {
    /// Erase the concrete type
    fn into_interceptor(self: Arc<Self>) -> Arc<dyn Interceptor>;
}

impl<T: Interceptor + 'static> IntoInterceptor for T {
    fn into_interceptor(self: Arc<Self>) -> Arc<dyn Interceptor> {
        self
    }
}

/// User-supplied interception logic
///
/// `intercept` should eventually call `invocation.proceed()` to continue the
/// chain. Returning without proceeding suppresses the underlying method.
pub trait Interceptor: IntoInterceptor + Send + Sync {
    /// Handle a diverted call
    fn intercept(&self, invocation: Invocation<'_>) -> PluginResult<IOValue>;

    /// Signatures this interceptor wants to see
    ///
    /// Without a declaration the interceptor cannot wrap anything.
    fn intercepts(&self) -> Option<Intercepts> {
        None
    }

    /// Wrap `target` with this interceptor
    fn plugin(self: Arc<Self>, target: Arc<dyn Target>) -> PluginResult<Arc<dyn Target>> {
        Plugin::wrap(target, self.into_interceptor())
    }

    /// Apply configuration; called at most once, before any interception
    fn set_properties(&mut self, _properties: &Properties) {}

    /// Name used in errors and logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl std::fmt::Debug for dyn Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interceptor({})", self.name())
    }
}
