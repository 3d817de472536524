//! Disabler short-circuit (§4.6).

use std::collections::HashMap;

use crate::value::Value;

/// Functions exempted from the short-circuit so a program can still inspect
/// or construct a disabler explicitly.
const ESCAPE_HATCHES: [&str; 3] = ["get_variable", "set_variable", "is_disabler"];

pub fn args_contain_disabler(positional: &[Value], keyword: &HashMap<String, Value>) -> bool {
    positional.iter().any(Value::contains_disabler)
        || keyword.values().any(Value::contains_disabler)
}

/// Returns `Some(Value::Disabler)` if `name` should short-circuit given
/// these arguments, `None` if the call should proceed normally.
pub fn disabler_short_circuit(
    name: &str,
    positional: &[Value],
    keyword: &HashMap<String, Value>,
) -> Option<Value> {
    if ESCAPE_HATCHES.contains(&name) {
        return None;
    }
    if args_contain_disabler(positional, keyword) {
        tracing::debug!(function = name, "disabler short-circuit triggered");
        Some(Value::Disabler)
    } else {
        None
    }
}

/// The `disabler: true` keyword decorator (§4.6): if the call succeeded and
/// returned a host object whose `found()` is `Some(false)`, and the caller
/// asked for `disabler: true`, replace the result with a fresh `Disabler`.
pub fn apply_disabler_decorator(result: Value, keyword: &HashMap<String, Value>) -> Value {
    let wants_disabler = matches!(keyword.get("disabler"), Some(Value::Bool(true)));
    if !wants_disabler {
        return result;
    }
    if let Value::HostObject(handle) = &result {
        if handle.0.borrow().found() == Some(false) {
            return Value::Disabler;
        }
    }
    result
}
