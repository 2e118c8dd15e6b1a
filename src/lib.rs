//! Weave – declarative method interception for host engine collaborators
//!
//! This crate lets third-party interceptors observe and modify calls made on
//! objects a host engine constructs, without those objects knowing they have
//! been wrapped:
//! - Interceptors declare the exact `(interface, method, params)` signatures they want
//! - Wrapping yields a transparent surrogate that diverts only declared methods
//! - Chains layer several interceptors over one target, last added outermost
//! - A registry and JSON configuration instantiate interceptors by alias

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Interception framework: signatures, surrogates, chains
pub mod plugin;

/// Helpers for dynamic argument values
pub mod util;

// Re-export key types for convenience
pub use plugin::{Interceptor, InterceptorChain, Invocation, PluginError, Target};

/// Current version of the Weave crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
