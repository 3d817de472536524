//! The owning `Interpreter` value (§5, §9): every piece of mutable state —
//! the variable environment, the function registry, the feature-policy
//! registries, the diagnostics sink — lives on one instance constructed per
//! run. There is no process-wide mutable state; running independent
//! programs concurrently just means constructing independent `Interpreter`
//! values.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::Node;
use crate::builtins::call_builtin_method;
use crate::config::InterpreterConfig;
use crate::diagnostics::{TracingWarnSink, WarnSink};
use crate::dispatch::{
    apply_disabler_decorator, args_contain_disabler, disabler_short_circuit, flatten_positional,
    reject_non_callable_receiver, CallContext, Callable, FunctionRegistry,
};
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::eval::{eval_stmt, Control};
use crate::feature_policy::{FeaturePolicy, PolicyClass};
use crate::value::Value;
use crate::version::{DefaultVersionComparer, VersionComparer};

pub struct Interpreter {
    pub(crate) env: Environment,
    pub(crate) functions: FunctionRegistry,
    pub(crate) feature_policy: FeaturePolicy,
    pub(crate) config: InterpreterConfig,
    pub(crate) warn_sink: Box<dyn WarnSink>,
    pub(crate) version_comparer: Box<dyn VersionComparer>,
    pub(crate) subproject: String,
    /// Cleared before each `if` clause's condition is evaluated; set by
    /// `version_compare` on a version-tagged string receiver (§3 invariant
    /// 4, §4.2).
    pub(crate) tmp_version_target: Option<String>,
    call_depth: usize,
    foreach_depth: usize,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            env: Environment::new(),
            functions: FunctionRegistry::new(),
            feature_policy: FeaturePolicy::new(),
            config,
            warn_sink: Box::new(TracingWarnSink),
            version_comparer: Box::new(DefaultVersionComparer),
            subproject: String::new(),
            tmp_version_target: None,
            call_depth: 0,
            foreach_depth: 0,
        }
    }

    pub fn register_function(&mut self, name: impl Into<String>, callable: Rc<dyn Callable>) {
        self.functions.register(name, callable);
    }

    pub fn register_builtin(&mut self, name: impl Into<String>, value: Value) {
        self.env.set_builtin(name, value);
    }

    pub fn set_warn_sink(&mut self, sink: Box<dyn WarnSink>) {
        self.warn_sink = sink;
    }

    pub fn set_version_comparer(&mut self, comparer: Box<dyn VersionComparer>) {
        self.version_comparer = comparer;
    }

    pub fn feature_policy(&self) -> &FeaturePolicy {
        &self.feature_policy
    }

    /// Top-level run loop (§6 "File loading", §5 "Cancellation"). The first
    /// statement must be a call to `project`; `SubdirDone` is swallowed
    /// here and nowhere else.
    pub fn run(&mut self, program: &Node) -> EvalResult<()> {
        let crate::ast::NodeKind::CodeBlock(stmts) = &program.kind else {
            return Err(EvalError::invalid_code("Program must be a code block."));
        };
        match stmts.first().map(|n| &n.kind) {
            Some(crate::ast::NodeKind::Function(name, _)) if name == "project" => {}
            _ => return Err(EvalError::invalid_code("First statement must be a call to \"project\".")),
        }

        for stmt in stmts {
            let control = eval_stmt(self, stmt).map_err(|e| e.with_location_if_missing(&stmt.location))?;
            match control {
                Control::None => {}
                Control::SubdirDone => break,
                Control::Continue | Control::Break => {
                    return Err(EvalError::invalid_code("continue/break used outside of a loop.")
                        .with_location_if_missing(&stmt.location));
                }
            }
        }
        Ok(())
    }

    pub fn get_variable(&self, name: &str) -> EvalResult<Value> {
        self.env.get(name)
    }

    pub fn set_variable(&mut self, name: &str, value: Value) -> EvalResult<()> {
        self.env.assign(name, value)
    }

    pub(crate) fn enter_foreach(&mut self) -> EvalResult<()> {
        self.foreach_depth += 1;
        if self.foreach_depth > self.config.max_foreach_depth {
            return Err(EvalError::interpreter("Maximum foreach nesting depth exceeded."));
        }
        Ok(())
    }

    pub(crate) fn exit_foreach(&mut self) {
        self.foreach_depth -= 1;
    }

    fn enter_call(&mut self) -> EvalResult<()> {
        self.call_depth += 1;
        if self.call_depth > self.config.max_call_depth {
            return Err(EvalError::interpreter("Maximum call depth exceeded."));
        }
        Ok(())
    }

    fn exit_call(&mut self) {
        self.call_depth -= 1;
    }

    /// Registers a feature-gate use for the current subproject and emits a
    /// warning (or, under `strict_deprecations`, an error for a deprecated
    /// use) the way `FeatureNew`/`FeatureDeprecated` do in §4.8.
    pub(crate) fn gate_feature(&mut self, class: PolicyClass, version: &str, feature_name: &str) -> EvalResult<()> {
        let subproject = self.subproject.clone();
        self.feature_policy.register_use(
            class,
            &subproject,
            version,
            feature_name,
            self.config.default_subproject_version.as_deref(),
            self.config.strict_deprecations,
            self.version_comparer.as_ref(),
            self.warn_sink.as_ref(),
        )
    }

    /// The `single_use` entry point (§4.8): fires once per call site.
    pub(crate) fn gate_single_use(&mut self, feature_name: &str, version: &str, extra_message: Option<&str>) {
        let subproject = self.subproject.clone();
        self.feature_policy
            .single_use(feature_name, version, &subproject, extra_message, self.warn_sink.as_ref());
    }

    fn call_context(&mut self) -> CallContext<'_> {
        CallContext {
            env: &mut self.env,
            feature_policy: &mut self.feature_policy,
            warn_sink: self.warn_sink.as_ref(),
            version_comparer: self.version_comparer.as_ref(),
            config: &self.config,
            subproject: &self.subproject,
        }
    }

    /// Function-call dispatch (§4.5): lookup, disabler short-circuit,
    /// default argument flattening, then invocation.
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        positional: Vec<Value>,
        keyword: HashMap<String, Value>,
    ) -> EvalResult<Value> {
        let callable = self
            .functions
            .get(name)
            .ok_or_else(|| EvalError::invalid_code(format!("Unknown function \"{name}\".")))?;

        if let Some(short_circuited) = disabler_short_circuit(name, &positional, &keyword) {
            return Ok(short_circuited);
        }

        let positional = if callable.flattens_args() {
            flatten_positional(positional)
        } else {
            positional
        };

        self.enter_call()?;
        let mut ctx = self.call_context();
        let result = callable.call(&mut ctx, positional, keyword.clone());
        self.exit_call();
        result.map(|v| apply_disabler_decorator(v, &keyword))
    }

    /// Method-call dispatch (§4.5, §4.6): receiver-variant-based dispatch
    /// to either the fixed builtin tables or a host object's own method
    /// table.
    pub(crate) fn call_method(
        &mut self,
        receiver: Value,
        method_name: &str,
        positional: Vec<Value>,
        keyword: HashMap<String, Value>,
    ) -> EvalResult<Value> {
        // Method calls have no escape hatches (§4.6): unlike function calls,
        // every method call short-circuits on a disabled argument.
        if matches!(receiver, Value::Disabler) {
            return if method_name == "found" {
                Ok(Value::Bool(false))
            } else {
                Ok(Value::Disabler)
            };
        }
        if args_contain_disabler(&positional, &keyword) {
            return Ok(Value::Disabler);
        }

        match receiver {
            Value::File(_) => Err(reject_non_callable_receiver("file")),
            Value::Str(ref s) if method_name == "version_compare" => {
                let [arg] = positional.as_slice() else {
                    return Err(EvalError::interpreter("version_compare() takes exactly one argument."));
                };
                let Value::Str(cmpr) = arg else {
                    return Err(EvalError::interpreter("version_compare() argument must be a string."));
                };
                if s.is_version() {
                    self.tmp_version_target = Some(cmpr.as_str().to_string());
                }
                Ok(Value::Bool(self.version_comparer.version_compare(s.as_str(), cmpr.as_str())))
            }
            Value::Str(_) if method_name == "replace" => {
                self.gate_single_use("str.replace", crate::builtins::strings::REPLACE_FEATURE_VERSION, None);
                call_builtin_method(&receiver, method_name, flatten_positional(positional), keyword)
            }
            Value::HostObject(handle) => {
                let flattens = handle.0.borrow().flattens_args(method_name);
                let positional = if flattens { flatten_positional(positional) } else { positional };
                let result = handle.0.borrow_mut().call_method(method_name, positional, keyword.clone())?;
                Ok(apply_disabler_decorator(result, &keyword))
            }
            other => call_builtin_method(&other, method_name, flatten_positional(positional), keyword),
        }
    }
}
