//! Surrogate factory and dispatch
//!
//! `Plugin::wrap` produces a surrogate exposing the subset of the target's
//! interfaces that an interceptor declares interest in. Calls to declared
//! methods are diverted to the interceptor; everything else falls through to
//! the target unchanged.
//!
//! Matching is keyed on a method's declaring interface rather than the
//! receiver's runtime type, so a surrogate can itself be wrapped again.

use preserves::IOValue;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::error::{LayerFailure, PluginError, PluginResult};
use super::interceptor::Interceptor;
use super::invocation::Invocation;
use super::reflect::{Interface, Method};
use super::signature::SignatureMap;
use super::target::{Target, TypeDescriptor};

static SURROGATE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Surrogate factory
pub struct Plugin;

impl Plugin {
    /// Wrap `target` with `interceptor`.
    ///
    /// Returns the target itself when it implements none of the declared
    /// interfaces.
    pub fn wrap(
        target: Arc<dyn Target>,
        interceptor: Arc<dyn Interceptor>,
    ) -> PluginResult<Arc<dyn Target>> {
        let signature_map = SignatureMap::for_interceptor(interceptor.as_ref())?;
        let interfaces = applicable_interfaces(target.type_descriptor(), &signature_map);

        if interfaces.is_empty() {
            tracing::debug!(
                interceptor = interceptor.name(),
                target = target.type_descriptor().name(),
                "No declared interface applies, target left unwrapped"
            );
            return Ok(target);
        }

        let surrogate = Surrogate::new(target, interceptor, Arc::new(signature_map), interfaces);
        tracing::debug!(
            interceptor = surrogate.interceptor.name(),
            surrogate = surrogate.descriptor.name(),
            target = surrogate.target.type_descriptor().name(),
            interfaces = ?surrogate.descriptor.declared_interfaces(),
            "Created surrogate"
        );
        Ok(Arc::new(surrogate))
    }
}

/// Interfaces of `ty` (or its ancestors) that the map has entries for.
///
/// Order is discovery order: the type's own declarations first, then each
/// ancestor's, duplicates dropped.
pub fn applicable_interfaces(ty: &TypeDescriptor, signature_map: &SignatureMap) -> Vec<Interface> {
    let mut interfaces: Vec<Interface> = Vec::new();
    for level in ty.ancestry() {
        for interface in level.declared_interfaces() {
            if signature_map.contains_interface(interface) && !interfaces.contains(interface) {
                interfaces.push(interface.clone());
            }
        }
    }
    interfaces
}

/// A transparent wrapper around one target and one interceptor
pub struct Surrogate {
    target: Arc<dyn Target>,
    interceptor: Arc<dyn Interceptor>,
    signature_map: Arc<SignatureMap>,
    descriptor: TypeDescriptor,
}

impl Surrogate {
    fn new(
        target: Arc<dyn Target>,
        interceptor: Arc<dyn Interceptor>,
        signature_map: Arc<SignatureMap>,
        interfaces: Vec<Interface>,
    ) -> Self {
        let seq = SURROGATE_SEQ.fetch_add(1, Ordering::Relaxed);
        let descriptor = interfaces
            .iter()
            .fold(TypeDescriptor::new(format!("$Surrogate{}", seq)), |ty, interface| {
                ty.implements(interface)
            });

        Self {
            target,
            interceptor,
            signature_map,
            descriptor,
        }
    }

    /// The wrapped object, one layer down
    pub fn target(&self) -> &Arc<dyn Target> {
        &self.target
    }

    /// The interceptor receiving diverted calls
    pub fn interceptor(&self) -> &Arc<dyn Interceptor> {
        &self.interceptor
    }

    /// Methods diverted by this layer
    pub fn signature_map(&self) -> &SignatureMap {
        &self.signature_map
    }

    /// Interfaces this surrogate exposes
    pub fn interfaces(&self) -> &[Interface] {
        self.descriptor.declared_interfaces()
    }

    fn dispatch(&self, method: &Method, args: &[IOValue]) -> PluginResult<IOValue> {
        if self.signature_map.matches(method) {
            tracing::trace!(
                interceptor = self.interceptor.name(),
                method = %method,
                "Diverting call"
            );
            return self
                .interceptor
                .intercept(Invocation::new(&self.target, method, args));
        }

        method
            .invoke(self.target.as_ref(), args)
            .map_err(PluginError::from)
    }
}

impl Target for Surrogate {
    fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn invoke_method(&self, method: &Method, args: &[IOValue]) -> anyhow::Result<IOValue> {
        self.dispatch(method, args).map_err(LayerFailure::wrap)
    }

    fn invoke_object_method(&self, method: &Method, args: &[IOValue]) -> anyhow::Result<IOValue> {
        self.dispatch(method, args).map_err(LayerFailure::wrap)
    }

    fn describe(&self) -> String {
        self.target.describe()
    }

    fn as_surrogate(&self) -> Option<&Surrogate> {
        Some(self)
    }
}

impl fmt::Debug for Surrogate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surrogate")
            .field("type", &self.descriptor.name())
            .field("interfaces", &self.descriptor.declared_interfaces())
            .field("interceptor", &self.interceptor.name())
            .field("target", &self.target.type_descriptor().name())
            .finish()
    }
}

/// Walk surrogate links down to the original target.
pub fn innermost_target(target: &Arc<dyn Target>) -> Arc<dyn Target> {
    let mut current = Arc::clone(target);
    while let Some(next) = current.as_surrogate().map(|s| Arc::clone(s.target())) {
        current = next;
    }
    current
}

/// Number of surrogate layers above the original target.
pub fn layer_count(target: &Arc<dyn Target>) -> usize {
    let mut layers = 0;
    let mut current = target.as_surrogate();
    while let Some(surrogate) = current {
        layers += 1;
        current = surrogate.target().as_surrogate();
    }
    layers
}
