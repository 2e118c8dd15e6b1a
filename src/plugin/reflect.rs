//! Runtime metadata for extension-point interfaces
//!
//! Interfaces are named method tables. A `Method` is a resolved handle into
//! one of those tables and is the unit the signature map matches on.

use once_cell::sync::Lazy;
use preserves::IOValue;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::error::InvocationError;
use super::target::Target;
use crate::util::io_value;

/// Name of the root interface every target implements implicitly
pub const OBJECT_INTERFACE: &str = "Object";

static OBJECT: Lazy<Interface> = Lazy::new(|| {
    Interface::builder(OBJECT_INTERFACE)
        .method("to_string", [])
        .build()
});

/// Parameter type reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Accepts any value
    Any,
    /// Boolean
    Boolean,
    /// Signed integer
    Integer,
    /// Double-precision float
    Double,
    /// UTF-8 string
    String,
    /// Symbol
    Symbol,
    /// Sequence of values
    Sequence,
    /// Labelled record
    Record,
}

impl TypeRef {
    /// Get the string representation of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Double => "Double",
            Self::String => "String",
            Self::Symbol => "Symbol",
            Self::Sequence => "Sequence",
            Self::Record => "Record",
        }
    }

    /// Check whether a value is admissible for this type.
    pub fn accepts(&self, value: &IOValue) -> bool {
        match self {
            Self::Any => true,
            Self::Boolean => value.as_boolean().is_some(),
            Self::Integer => value.as_signed_integer().is_some(),
            Self::Double => value.as_double().is_some(),
            Self::String => value.as_string().is_some(),
            Self::Symbol => value.as_symbol().is_some(),
            Self::Sequence => value.is_sequence(),
            Self::Record => value.is_record(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a parameter list as `String, Integer`.
pub(crate) fn render_params(params: &[TypeRef]) -> String {
    params
        .iter()
        .map(TypeRef::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One method slot in an interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,
    /// Ordered parameter types
    pub params: Vec<TypeRef>,
}

#[derive(Debug)]
struct InterfaceDescriptor {
    name: String,
    methods: Vec<MethodDescriptor>,
}

/// A named interface
///
/// Equality and hashing use the canonical name. The root interface is the
/// one exception: an interface built with the name `Object` is an ordinary
/// interface and never equal to [`Interface::object`].
#[derive(Clone)]
pub struct Interface(Arc<InterfaceDescriptor>);

impl Interface {
    /// Start building an interface with the given canonical name.
    pub fn builder(name: impl Into<String>) -> InterfaceBuilder {
        InterfaceBuilder {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// The implicit root interface (`to_string`).
    pub fn object() -> Interface {
        OBJECT.clone()
    }

    /// Canonical name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Whether this is the implicit root interface
    pub fn is_object(&self) -> bool {
        Arc::ptr_eq(&self.0, &OBJECT.0)
    }

    /// Declared method slots, in declaration order
    pub fn descriptors(&self) -> &[MethodDescriptor] {
        &self.0.methods
    }

    /// Resolved handles for every declared method
    pub fn methods(&self) -> impl Iterator<Item = Method> + '_ {
        (0..self.0.methods.len()).map(move |index| Method {
            interface: self.clone(),
            index,
        })
    }

    /// Resolve a method by exact name and parameter list.
    pub fn method(&self, name: &str, params: &[TypeRef]) -> Option<Method> {
        self.0
            .methods
            .iter()
            .position(|m| m.name == name && m.params == params)
            .map(|index| Method {
                interface: self.clone(),
                index,
            })
    }
}

impl PartialEq for Interface {
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name && self.is_object() == other.is_object()
    }
}

impl Eq for Interface {}

impl Hash for Interface {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interface({})", self.0.name)
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Builder for [`Interface`]
pub struct InterfaceBuilder {
    name: String,
    methods: Vec<MethodDescriptor>,
}

impl InterfaceBuilder {
    /// Declare a method slot. Re-declaring an identical slot is ignored.
    pub fn method(
        mut self,
        name: impl Into<String>,
        params: impl IntoIterator<Item = TypeRef>,
    ) -> Self {
        let descriptor = MethodDescriptor {
            name: name.into(),
            params: params.into_iter().collect(),
        };
        if !self.methods.contains(&descriptor) {
            self.methods.push(descriptor);
        }
        self
    }

    /// Finish the interface.
    pub fn build(self) -> Interface {
        Interface(Arc::new(InterfaceDescriptor {
            name: self.name,
            methods: self.methods,
        }))
    }
}

/// Resolved method handle
#[derive(Clone)]
pub struct Method {
    interface: Interface,
    index: usize,
}

impl Method {
    fn descriptor(&self) -> &MethodDescriptor {
        &self.interface.0.methods[self.index]
    }

    /// Interface the method is declared on
    pub fn declaring_interface(&self) -> &Interface {
        &self.interface
    }

    /// Method name
    pub fn name(&self) -> &str {
        &self.descriptor().name
    }

    /// Parameter types
    pub fn params(&self) -> &[TypeRef] {
        &self.descriptor().params
    }

    /// Whether the method belongs to the implicit root interface
    pub fn is_object_method(&self) -> bool {
        self.interface.is_object()
    }

    /// Reflectively invoke this method on `target`.
    ///
    /// Receiver and argument mismatches are reported as
    /// `IllegalArgument`; anything the method itself raises comes back
    /// wrapped in `InvocationError::Target`.
    pub fn invoke(&self, target: &dyn Target, args: &[IOValue]) -> Result<IOValue, InvocationError> {
        let descriptor = target.type_descriptor();
        if !descriptor.is_implementation_of(&self.interface) {
            return Err(InvocationError::IllegalArgument(format!(
                "object of type {} does not implement {}",
                descriptor.name(),
                self.interface
            )));
        }
        self.check_args(args)?;

        let outcome = if self.is_object_method() {
            target.invoke_object_method(self, args)
        } else {
            target.invoke_method(self, args)
        };

        outcome.map_err(|cause| InvocationError::Target {
            method: self.to_string(),
            cause,
        })
    }

    fn check_args(&self, args: &[IOValue]) -> Result<(), InvocationError> {
        let params = self.params();
        if params.len() != args.len() {
            return Err(InvocationError::IllegalArgument(format!(
                "{} expects {} argument(s), got {} ({})",
                self,
                params.len(),
                args.len(),
                io_value::kinds(args)
            )));
        }

        if let Some((position, (param, _))) = params
            .iter()
            .zip(args)
            .enumerate()
            .find(|(_, (param, arg))| !param.accepts(arg))
        {
            return Err(InvocationError::IllegalArgument(format!(
                "{} argument {} expects {}, got {}",
                self,
                position,
                param,
                io_value::value_kind(&args[position])
            )));
        }

        Ok(())
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.interface == other.interface && self.descriptor() == other.descriptor()
    }
}

impl Eq for Method {}

impl Hash for Method {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.interface.hash(state);
        self.name().hash(state);
        self.params().hash(state);
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({})", self)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}({})",
            self.interface,
            self.name(),
            render_params(self.params())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foo() -> Interface {
        Interface::builder("Foo")
            .method("hello", [TypeRef::String])
            .method("hello", [TypeRef::String, TypeRef::Integer])
            .method("count", [])
            .build()
    }

    #[test]
    fn test_method_resolution_is_exact() {
        let iface = foo();
        let one = iface.method("hello", &[TypeRef::String]).unwrap();
        let two = iface
            .method("hello", &[TypeRef::String, TypeRef::Integer])
            .unwrap();

        assert_ne!(one, two);
        assert!(iface.method("hello", &[]).is_none());
        assert!(iface.method("nonexistent", &[]).is_none());
        assert_eq!(one.to_string(), "Foo.hello(String)");
    }

    #[test]
    fn test_interface_identity_is_by_name() {
        let a = foo();
        let b = Interface::builder("Foo").method("hello", [TypeRef::String]).build();
        assert_eq!(a, b);

        let ma = a.method("hello", &[TypeRef::String]).unwrap();
        let mb = b.method("hello", &[TypeRef::String]).unwrap();
        assert_eq!(ma, mb);
    }

    #[test]
    fn test_duplicate_slots_collapse() {
        let iface = Interface::builder("Dup")
            .method("run", [])
            .method("run", [])
            .build();
        assert_eq!(iface.descriptors().len(), 1);
    }

    #[test]
    fn test_type_ref_accepts() {
        assert!(TypeRef::String.accepts(&IOValue::new("x".to_string())));
        assert!(!TypeRef::String.accepts(&IOValue::new(1i64)));
        assert!(TypeRef::Integer.accepts(&IOValue::new(1i64)));
        assert!(TypeRef::Symbol.accepts(&IOValue::symbol("s")));
        assert!(TypeRef::Any.accepts(&IOValue::symbol("s")));
    }

    #[test]
    fn test_object_interface() {
        let object = Interface::object();
        assert!(object.is_object());
        let to_string = object.method("to_string", &[]).unwrap();
        assert!(to_string.is_object_method());
    }

    #[test]
    fn test_user_interface_named_object_is_ordinary() {
        let shadow = Interface::builder(OBJECT_INTERFACE)
            .method("to_string", [])
            .build();
        assert!(!shadow.is_object());
        assert_ne!(shadow, Interface::object());

        let to_string = shadow.method("to_string", &[]).unwrap();
        assert!(!to_string.is_object_method());
        assert_ne!(to_string, Interface::object().method("to_string", &[]).unwrap());
    }

    #[test]
    fn test_methods_in_declaration_order() {
        let names: Vec<_> = foo().methods().map(|m| m.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "Foo.hello(String)",
                "Foo.hello(String, Integer)",
                "Foo.count()"
            ]
        );
    }
}
