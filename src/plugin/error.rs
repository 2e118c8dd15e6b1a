//! Error types for the interception framework
//!
//! Wrap-time and dispatch-time failures are `PluginError`; the reflective
//! call layer reports `InvocationError`, which is unwrapped exactly once at
//! the surrogate boundary so callers see the original cause.

use std::io;
use thiserror::Error;

/// Top-level interception error
#[derive(Debug, Error)]
pub enum PluginError {
    /// The interceptor carries no intercepts declaration
    #[error("No intercepts declaration was found in interceptor {0}")]
    MissingDeclaration(String),

    /// A declared signature names a method its interface does not have
    #[error("Could not find method on {interface} named {method}({params})")]
    SignatureResolution {
        /// Declared host interface
        interface: String,
        /// Declared method name
        method: String,
        /// Declared parameter types, comma separated
        params: String,
    },

    /// Failure raised by interceptor code
    #[error("Interceptor failed: {0}")]
    Intercept(#[source] anyhow::Error),

    /// Failure raised by the underlying method
    #[error("Invocation of {method} failed: {source}")]
    Invocation {
        /// Method that failed
        method: String,
        /// Original cause
        #[source]
        source: anyhow::Error,
    },

    /// The call itself was malformed (wrong receiver or arguments)
    #[error("Illegal invocation: {0}")]
    IllegalInvocation(String),
}

impl PluginError {
    /// Wrap an arbitrary failure raised inside `intercept`.
    pub fn intercept<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        PluginError::Intercept(err.into())
    }

    /// The user-level cause carried by this error, if any.
    pub fn cause(&self) -> Option<&anyhow::Error> {
        match self {
            PluginError::Intercept(cause) => Some(cause),
            PluginError::Invocation { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience result alias for interception operations
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Failure of a reflective method call
///
/// `Target` is the wrapper around whatever the invoked method raised.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The invoked method failed
    #[error("Method {method} raised: {cause}")]
    Target {
        /// Method that was invoked
        method: String,
        /// What the method raised
        cause: anyhow::Error,
    },

    /// Receiver or arguments do not fit the method
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),
}

/// A surrogate layer's own failure while it travels through the reflective
/// wrapper of the layer above.
///
/// Only this marker is unwrapped. A `PluginError` that a target raises for
/// its own reasons stays a cause of that target's call.
#[derive(Debug, Error)]
#[error(transparent)]
pub(crate) struct LayerFailure(pub(crate) PluginError);

impl LayerFailure {
    /// Box a surrogate failure for the `Target` boundary.
    pub(crate) fn wrap(err: PluginError) -> anyhow::Error {
        anyhow::Error::new(LayerFailure(err))
    }
}

impl From<InvocationError> for PluginError {
    fn from(err: InvocationError) -> Self {
        match err {
            InvocationError::Target { method, cause } => match cause.downcast::<LayerFailure>() {
                Ok(LayerFailure(inner)) => inner,
                Err(source) => PluginError::Invocation { method, source },
            },
            InvocationError::IllegalArgument(detail) => PluginError::IllegalInvocation(detail),
        }
    }
}

/// Registry and configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No factory registered under the alias
    #[error("Unknown interceptor type: {0}")]
    UnknownInterceptor(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
