//! Built-in methods for string/int/bool/array/dict values (§4.1, §4.5).

pub mod arrays;
pub mod bools;
pub mod dicts;
pub mod ints;
pub mod strings;

use std::collections::HashMap;

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

/// Dispatches a method call on a non-host value to its builtin table. The
/// `Disabler`/`File`/`HostObject` cases are handled one level up by the
/// dispatcher (§4.5); this function only covers the elementary/container
/// value kinds that have a fixed, non-extensible method table.
pub fn call_builtin_method(
    receiver: &Value,
    method_name: &str,
    positional: Vec<Value>,
    keyword: HashMap<String, Value>,
) -> EvalResult<Value> {
    if !keyword.is_empty() {
        return Err(EvalError::invalid_arguments(format!(
            "Method \"{method_name}\" does not take keyword arguments."
        )));
    }
    match receiver {
        Value::Bool(b) => bools::call(*b, method_name, &positional),
        Value::Integer(i) => ints::call(*i, method_name, &positional),
        Value::Str(s) => strings::call(s, method_name, &positional),
        Value::Array(items) => arrays::call(items, method_name, &positional),
        Value::Dict(dict) => dicts::call(dict, method_name, &positional),
        other => Err(EvalError::invalid_arguments(format!(
            "Type \"{}\" has no builtin methods.",
            other.type_name()
        ))),
    }
}
