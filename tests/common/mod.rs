//! Shared fixtures: a `Foo`/`Bar` interface pair, a greeter target and a
//! configurable wrapping interceptor.

#![allow(dead_code)]

use anyhow::anyhow;
use once_cell::sync::Lazy;
use preserves::IOValue;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use weave::plugin::{
    Interceptor, Intercepts, Interface, Invocation, Method, PluginResult, Signature, Target,
    TypeDescriptor, TypeRef,
};
use weave::util::io_value::as_text;

pub static FOO: Lazy<Interface> = Lazy::new(|| {
    Interface::builder("Foo")
        .method("hello", [TypeRef::String])
        .method("goodbye", [])
        .method("fail", [])
        .build()
});

pub static BAR: Lazy<Interface> = Lazy::new(|| Interface::builder("Bar").method("baz", []).build());

pub fn hello() -> Method {
    FOO.method("hello", &[TypeRef::String]).unwrap()
}

pub fn goodbye() -> Method {
    FOO.method("goodbye", &[]).unwrap()
}

pub fn fail() -> Method {
    FOO.method("fail", &[]).unwrap()
}

pub fn to_string() -> Method {
    Interface::object().method("to_string", &[]).unwrap()
}

pub fn text(value: &IOValue) -> String {
    as_text(value).expect("string result")
}

pub fn arg(value: &str) -> IOValue {
    IOValue::new(value.to_string())
}

/// Implements `Foo`: `hello` upper-cases its argument.
pub struct Greeter {
    ty: TypeDescriptor,
    pub hello_calls: AtomicUsize,
}

impl Greeter {
    pub fn new() -> Self {
        Self {
            ty: TypeDescriptor::new("Greeter").implements(&FOO),
            hello_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_type(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            hello_calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.hello_calls.load(Ordering::SeqCst)
    }
}

impl Target for Greeter {
    fn type_descriptor(&self) -> &TypeDescriptor {
        &self.ty
    }

    fn invoke_method(&self, method: &Method, args: &[IOValue]) -> anyhow::Result<IOValue> {
        match method.name() {
            "hello" => {
                self.hello_calls.fetch_add(1, Ordering::SeqCst);
                Ok(IOValue::new(text(&args[0]).to_uppercase()))
            }
            "goodbye" => Ok(IOValue::new("bye".to_string())),
            "fail" => Err(anyhow!("greeter failed")),
            "baz" => Ok(IOValue::symbol("baz")),
            other => Err(anyhow!("no such method {}", other)),
        }
    }

    fn describe(&self) -> String {
        "Greeter@1".to_string()
    }
}

/// Surrounds the proceeded result with `open` and `close`.
pub struct Wrapping {
    pub open: &'static str,
    pub close: &'static str,
    pub declaration: Option<Intercepts>,
}

impl Wrapping {
    pub fn hello(open: &'static str, close: &'static str) -> Self {
        Self {
            open,
            close,
            declaration: Some(Intercepts::new(Signature::new(
                &FOO,
                "hello",
                [TypeRef::String],
            ))),
        }
    }
}

impl Interceptor for Wrapping {
    fn intercept(&self, invocation: Invocation<'_>) -> PluginResult<IOValue> {
        let inner = invocation.proceed()?;
        Ok(IOValue::new(format!("{}{}{}", self.open, text(&inner), self.close)))
    }

    fn intercepts(&self) -> Option<Intercepts> {
        self.declaration.clone()
    }
}

pub fn greeter() -> (Arc<Greeter>, Arc<dyn Target>) {
    let greeter = Arc::new(Greeter::new());
    let target: Arc<dyn Target> = greeter.clone();
    (greeter, target)
}
