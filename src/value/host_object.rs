use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::EvalResult;
use crate::value::Value;

/// The interface a host application implements to expose an opaque value
/// (a build target, a dependency, a compiler handle, ...) to DSL programs.
///
/// A registered `Callable` constructs a `Value::HostObject` by boxing a value
/// implementing this trait into a `HostHandle`; the interpreter never
/// inspects the concrete type, only calls through the trait.
pub trait HostObject: fmt::Debug {
    /// Name used in error messages ("Variable \"x\" is not callable", type
    /// mismatch reports, ...).
    fn type_name(&self) -> &str;

    /// Mutable host objects are deep-copied on `=` assignment (§4.7);
    /// immutable ones are shared by reference like any other Value.
    fn is_mutable(&self) -> bool;

    /// The subproject this object was constructed in, if the host tags
    /// objects that way. Not consulted by the core evaluator; exposed for
    /// host callables that want it.
    fn subproject(&self) -> Option<&str> {
        None
    }

    /// Dispatch a method call. Argument flattening has already been applied
    /// unless the host opted a specific method out (`flattens_args`).
    fn call_method(
        &mut self,
        method_name: &str,
        positional: Vec<Value>,
        keywords: HashMap<String, Value>,
    ) -> EvalResult<Value>;

    /// Whether `method_name` should receive flattened positional arguments.
    /// Defaults to true, matching the function-call flattening rule; a host
    /// opts a method out the same way a registered function opts out.
    fn flattens_args(&self, _method_name: &str) -> bool {
        true
    }

    /// Used by the `disabler: true` keyword decorator (§4.6): if the method
    /// that was just called reports a `found()` value, a caller that passed
    /// `disabler: true` and got `found() == false` back gets a fresh
    /// `Disabler` instead of this object.
    fn found(&self) -> Option<bool> {
        None
    }

    fn deep_clone(&self) -> Box<dyn HostObject>;
}

/// Reference-counted, interior-mutable handle to a host object, shared the
/// way `Array`/`Dict` values are shared under the hood.
#[derive(Debug, Clone)]
pub struct HostHandle(pub Rc<RefCell<dyn HostObject>>);

impl HostHandle {
    pub fn new(obj: Box<dyn HostObject>) -> Self {
        Self(Rc::new(RefCell::new(UnboxedHostObject(obj))))
    }

    pub fn deep_clone(&self) -> HostHandle {
        let cloned = self.0.borrow().deep_clone();
        HostHandle(Rc::new(RefCell::new(UnboxedHostObject(cloned))))
    }

    pub fn is_mutable(&self) -> bool {
        self.0.borrow().is_mutable()
    }

    pub fn type_name(&self) -> String {
        self.0.borrow().type_name().to_string()
    }
}

impl PartialEq for HostHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// `Box<dyn HostObject>` doesn't itself implement `HostObject` (trait
/// objects can't implement the trait they erase without this kind of
/// forwarding shim), so wrap it once here to put it behind `RefCell`.
#[derive(Debug)]
struct UnboxedHostObject(Box<dyn HostObject>);

impl HostObject for UnboxedHostObject {
    fn type_name(&self) -> &str {
        self.0.type_name()
    }
    fn is_mutable(&self) -> bool {
        self.0.is_mutable()
    }
    fn subproject(&self) -> Option<&str> {
        self.0.subproject()
    }
    fn call_method(
        &mut self,
        method_name: &str,
        positional: Vec<Value>,
        keywords: HashMap<String, Value>,
    ) -> EvalResult<Value> {
        self.0.call_method(method_name, positional, keywords)
    }
    fn flattens_args(&self, method_name: &str) -> bool {
        self.0.flattens_args(method_name)
    }
    fn found(&self) -> Option<bool> {
        self.0.found()
    }
    fn deep_clone(&self) -> Box<dyn HostObject> {
        self.0.deep_clone()
    }
}
