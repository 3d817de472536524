//! Function/method dispatch, argument flattening, and disabler short-circuit
//! (§4.5, §4.6).

mod disabler;
mod flatten;

pub use disabler::{apply_disabler_decorator, args_contain_disabler, disabler_short_circuit};
pub use flatten::flatten_positional;

use std::collections::HashMap;
use std::rc::Rc;

use crate::config::InterpreterConfig;
use crate::diagnostics::WarnSink;
use crate::env::Environment;
use crate::error::EvalError;
use crate::feature_policy::FeaturePolicy;
use crate::value::Value;
use crate::version::VersionComparer;

/// The side channels a registered callable may need beyond its own
/// arguments: the variable environment (for the `get_variable`/
/// `set_variable` escape hatches), the feature-policy registry (for a
/// `project()`-equivalent callable to set the subproject's target version,
/// or for any callable to register a `single_use` feature), and the
/// diagnostics/version-comparison surfaces.
pub struct CallContext<'a> {
    pub env: &'a mut Environment,
    pub feature_policy: &'a mut FeaturePolicy,
    pub warn_sink: &'a dyn WarnSink,
    pub version_comparer: &'a dyn VersionComparer,
    pub config: &'a InterpreterConfig,
    pub subproject: &'a str,
}

/// A host- or builtin-registered callable. `flattens_args` controls whether
/// the dispatcher applies the default positional-flattening pass before
/// invoking it (§4.5).
pub trait Callable {
    fn call(
        &self,
        ctx: &mut CallContext<'_>,
        positional: Vec<Value>,
        keyword: HashMap<String, Value>,
    ) -> crate::error::EvalResult<Value>;

    fn flattens_args(&self) -> bool {
        true
    }
}

impl<F> Callable for F
where
    F: Fn(&mut CallContext<'_>, Vec<Value>, HashMap<String, Value>) -> crate::error::EvalResult<Value>,
{
    fn call(
        &self,
        ctx: &mut CallContext<'_>,
        positional: Vec<Value>,
        keyword: HashMap<String, Value>,
    ) -> crate::error::EvalResult<Value> {
        self(ctx, positional, keyword)
    }
}

#[derive(Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Rc<dyn Callable>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, callable: Rc<dyn Callable>) {
        self.functions.insert(name.into(), callable);
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn Callable>> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

/// Method dispatch result for receivers that aren't callable at all, per the
/// `File`/other-non-callable branch of §4.5.
pub fn reject_non_callable_receiver(type_name: &str) -> EvalError {
    EvalError::invalid_arguments(format!("Object of type \"{type_name}\" is not callable."))
}
