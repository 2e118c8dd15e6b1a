//! Interception framework and public API
//!
//! A host engine builds an [`InterceptorChain`] while it is configured and
//! passes each extensible collaborator through [`InterceptorChain::plugin_all`]
//! before handing it to downstream code:
//!
//! ```text
//! outer = iN.plugin(... i2.plugin(i1.plugin(original)) ...)
//! ```
//!
//! The last interceptor added sees a call first; each `proceed()` moves one
//! layer closer to the original target.

// Submodules
pub mod chain;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod invocation;
pub mod reflect;
pub mod registry;
pub mod signature;
pub mod surrogate;
pub mod target;

// Re-export commonly used types
pub use chain::InterceptorChain;
pub use config::{PluginConfig, PluginEntry};
pub use error::{ConfigError, ConfigResult, InvocationError, PluginError, PluginResult};
pub use interceptor::{Interceptor, Properties};
pub use invocation::Invocation;
pub use reflect::{Interface, Method, TypeRef};
pub use registry::{InterceptorCatalog, InterceptorRegistry};
pub use signature::{Intercepts, Signature, SignatureMap};
pub use surrogate::{Plugin, Surrogate, innermost_target, layer_count};
pub use target::{Target, TypeDescriptor};
