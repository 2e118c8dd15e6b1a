//! Wrappable targets and their runtime types
//!
//! A target is any host object that exposes one or more interfaces. Its
//! `TypeDescriptor` records the interfaces declared at each level of its
//! ancestry, which is what the surrogate factory inspects.

use anyhow::anyhow;
use preserves::IOValue;
use std::fmt;
use std::sync::Arc;

use super::error::PluginResult;
use super::reflect::{Interface, Method};
use super::surrogate::Surrogate;

/// Runtime type of a target
#[derive(Clone)]
pub struct TypeDescriptor {
    name: String,
    interfaces: Vec<Interface>,
    parent: Option<Arc<TypeDescriptor>>,
}

impl TypeDescriptor {
    /// Create a type with no interfaces and no parent
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interfaces: Vec::new(),
            parent: None,
        }
    }

    /// Declare an interface directly on this type
    pub fn implements(mut self, interface: &Interface) -> Self {
        if !self.interfaces.contains(interface) {
            self.interfaces.push(interface.clone());
        }
        self
    }

    /// Set the parent type
    pub fn extends(mut self, parent: Arc<TypeDescriptor>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interfaces declared directly on this level
    pub fn declared_interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    /// Parent type, if any
    pub fn parent(&self) -> Option<&TypeDescriptor> {
        self.parent.as_deref()
    }

    /// This type followed by each ancestor, nearest first
    pub fn ancestry(&self) -> impl Iterator<Item = &TypeDescriptor> {
        std::iter::successors(Some(self), |ty| ty.parent())
    }

    /// Whether this type or an ancestor declares `interface`.
    ///
    /// Every type implements the root `Object` interface.
    pub fn is_implementation_of(&self, interface: &Interface) -> bool {
        interface.is_object()
            || self
                .ancestry()
                .any(|ty| ty.interfaces.contains(interface))
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("interfaces", &self.interfaces)
            .field("parent", &self.parent.as_ref().map(|p| p.name.clone()))
            .finish()
    }
}

/// A host object that can be wrapped
///
/// Implementations dispatch on `method.name()` (and parameters where a name
/// is overloaded). Failures are reported as plain `anyhow` errors; the
/// reflective layer wraps them and the surrogate unwraps them again.
pub trait Target: Send + Sync {
    /// Runtime type
    fn type_descriptor(&self) -> &TypeDescriptor;

    /// Execute a method of one of the implemented interfaces
    fn invoke_method(&self, method: &Method, args: &[IOValue]) -> anyhow::Result<IOValue>;

    /// Execute a method of the root `Object` interface
    fn invoke_object_method(&self, method: &Method, _args: &[IOValue]) -> anyhow::Result<IOValue> {
        match method.name() {
            "to_string" => Ok(IOValue::new(self.describe())),
            other => Err(anyhow!("unsupported object method {}", other)),
        }
    }

    /// Human-readable rendering, returned by `Object.to_string`
    fn describe(&self) -> String {
        self.type_descriptor().name().to_string()
    }

    /// Downcast to a surrogate layer
    fn as_surrogate(&self) -> Option<&Surrogate> {
        None
    }
}

impl dyn Target {
    /// Invoke `method` as an external caller would.
    ///
    /// Reflective failures are unwrapped once, so the error is the one the
    /// method (or interceptor) actually raised.
    pub fn call(&self, method: &Method, args: &[IOValue]) -> PluginResult<IOValue> {
        Ok(method.invoke(self, args)?)
    }
}

impl fmt::Debug for dyn Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target({})", self.type_descriptor().name())
    }
}
