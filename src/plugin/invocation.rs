//! A single diverted call
//!
//! The invocation borrows everything from the surrogate that built it; no
//! arguments are copied. `proceed` continues one layer down.

use preserves::IOValue;
use std::sync::Arc;

use super::error::InvocationError;
use super::reflect::Method;
use super::target::Target;

/// Immutable record of one intercepted call
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    target: &'a Arc<dyn Target>,
    method: &'a Method,
    args: &'a [IOValue],
}

impl<'a> Invocation<'a> {
    /// Create an invocation
    pub fn new(target: &'a Arc<dyn Target>, method: &'a Method, args: &'a [IOValue]) -> Self {
        Self {
            target,
            method,
            args,
        }
    }

    /// The object one layer below the surrogate
    pub fn target(&self) -> &'a Arc<dyn Target> {
        self.target
    }

    /// The method being dispatched
    pub fn method(&self) -> &'a Method {
        self.method
    }

    /// Arguments as passed by the caller
    pub fn args(&self) -> &'a [IOValue] {
        self.args
    }

    /// Invoke the method on the target with the original arguments.
    ///
    /// May be called more than once.
    pub fn proceed(&self) -> Result<IOValue, InvocationError> {
        self.method.invoke(self.target.as_ref(), self.args)
    }

    /// Invoke the method on the target with replacement arguments.
    pub fn proceed_with(&self, args: &[IOValue]) -> Result<IOValue, InvocationError> {
        self.method.invoke(self.target.as_ref(), args)
    }
}

impl std::fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("target", &self.target.type_descriptor().name())
            .field("method", self.method)
            .field("args", &self.args)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::reflect::{Interface, TypeRef};
    use crate::plugin::target::TypeDescriptor;
    use crate::util::io_value::as_text;
    use anyhow::anyhow;

    struct Upper {
        ty: TypeDescriptor,
    }

    impl Target for Upper {
        fn type_descriptor(&self) -> &TypeDescriptor {
            &self.ty
        }

        fn invoke_method(&self, method: &Method, args: &[IOValue]) -> anyhow::Result<IOValue> {
            match method.name() {
                "hello" => {
                    let text = as_text(&args[0]).unwrap_or_default();
                    Ok(IOValue::new(text.to_uppercase()))
                }
                _ => Err(anyhow!("boom")),
            }
        }
    }

    fn fixture() -> (Interface, Arc<dyn Target>) {
        let foo = Interface::builder("Foo")
            .method("hello", [TypeRef::String])
            .method("fail", [])
            .build();
        let target: Arc<dyn Target> = Arc::new(Upper {
            ty: TypeDescriptor::new("Upper").implements(&foo),
        });
        (foo, target)
    }

    #[test]
    fn test_proceed_matches_direct_invoke() {
        let (foo, target) = fixture();
        let hello = foo.method("hello", &[TypeRef::String]).unwrap();
        let args = [IOValue::new("x".to_string())];

        let invocation = Invocation::new(&target, &hello, &args);
        let via_proceed = invocation.proceed().unwrap();
        let direct = hello.invoke(target.as_ref(), &args).unwrap();

        assert_eq!(via_proceed, direct);
        assert_eq!(as_text(&via_proceed).as_deref(), Some("X"));
    }

    #[test]
    fn test_proceed_with_replaces_arguments() {
        let (foo, target) = fixture();
        let hello = foo.method("hello", &[TypeRef::String]).unwrap();
        let args = [IOValue::new("x".to_string())];

        let invocation = Invocation::new(&target, &hello, &args);
        let result = invocation
            .proceed_with(&[IOValue::new("y".to_string())])
            .unwrap();
        assert_eq!(as_text(&result).as_deref(), Some("Y"));
        assert_eq!(invocation.args().len(), 1);
    }

    #[test]
    fn test_proceed_wraps_target_failure() {
        let (foo, target) = fixture();
        let fail = foo.method("fail", &[]).unwrap();

        let invocation = Invocation::new(&target, &fail, &[]);
        match invocation.proceed() {
            Err(InvocationError::Target { method, cause }) => {
                assert_eq!(method, "Foo.fail()");
                assert_eq!(cause.to_string(), "boom");
            }
            other => panic!("expected Target failure, got {other:?}"),
        }
    }
}
