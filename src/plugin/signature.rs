//! Declarative intercept signatures
//!
//! An interceptor declares the `(interface, method, params)` triples it wants
//! to see. The declaration is resolved into a `SignatureMap` once per wrap.

use std::collections::{HashMap, HashSet};

use super::error::{PluginError, PluginResult};
use super::interceptor::Interceptor;
use super::reflect::{Interface, Method, TypeRef, render_params};

/// Identifies exactly one method on one interface
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    interface: Interface,
    method: String,
    params: Vec<TypeRef>,
}

impl Signature {
    /// Create a signature
    pub fn new(
        interface: &Interface,
        method: impl Into<String>,
        params: impl IntoIterator<Item = TypeRef>,
    ) -> Self {
        Self {
            interface: interface.clone(),
            method: method.into(),
            params: params.into_iter().collect(),
        }
    }

    /// Host interface
    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    /// Method name
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Parameter types
    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    /// Resolve against the host interface.
    pub fn resolve(&self) -> PluginResult<Method> {
        self.interface
            .method(&self.method, &self.params)
            .ok_or_else(|| PluginError::SignatureResolution {
                interface: self.interface.name().to_string(),
                method: self.method.clone(),
                params: render_params(&self.params),
            })
    }
}

/// The set of signatures an interceptor declares
///
/// Always holds at least one signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intercepts {
    signatures: Vec<Signature>,
}

impl Intercepts {
    /// Start a declaration with its first signature
    pub fn new(first: Signature) -> Self {
        Self {
            signatures: vec![first],
        }
    }

    /// Append another signature
    pub fn and(mut self, signature: Signature) -> Self {
        self.signatures.push(signature);
        self
    }

    /// Build from an iterator; `None` when it yields nothing
    pub fn from_signatures(signatures: impl IntoIterator<Item = Signature>) -> Option<Self> {
        let signatures: Vec<_> = signatures.into_iter().collect();
        if signatures.is_empty() {
            None
        } else {
            Some(Self { signatures })
        }
    }

    /// Declared signatures, in declaration order
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }
}

/// Interface to intercepted-method table derived from a declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureMap {
    methods: HashMap<Interface, HashSet<Method>>,
}

impl SignatureMap {
    /// Resolve every signature of a declaration.
    ///
    /// Fails on the first signature that names a method its interface does
    /// not declare. Duplicate signatures collapse into one entry.
    pub fn resolve(declaration: &Intercepts) -> PluginResult<Self> {
        let mut methods: HashMap<Interface, HashSet<Method>> = HashMap::new();
        for signature in declaration.signatures() {
            let method = signature.resolve()?;
            methods
                .entry(signature.interface().clone())
                .or_default()
                .insert(method);
        }
        Ok(Self { methods })
    }

    /// Derive the map for an interceptor from its declaration.
    pub fn for_interceptor(interceptor: &dyn Interceptor) -> PluginResult<Self> {
        let declaration = interceptor
            .intercepts()
            .ok_or_else(|| PluginError::MissingDeclaration(interceptor.name().to_string()))?;
        Self::resolve(&declaration)
    }

    /// Whether any method of `interface` is intercepted
    pub fn contains_interface(&self, interface: &Interface) -> bool {
        self.methods.contains_key(interface)
    }

    /// Whether `method` is intercepted
    ///
    /// Keyed on the method's declaring interface, never on a receiver type.
    pub fn matches(&self, method: &Method) -> bool {
        self.methods
            .get(method.declaring_interface())
            .is_some_and(|methods| methods.contains(method))
    }

    /// Intercepted methods of one interface
    pub fn methods_for(&self, interface: &Interface) -> Option<&HashSet<Method>> {
        self.methods.get(interface)
    }

    /// Interfaces with at least one intercepted method
    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.methods.keys()
    }

    /// Total number of intercepted methods
    pub fn len(&self) -> usize {
        self.methods.values().map(HashSet::len).sum()
    }

    /// Whether nothing is intercepted
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
