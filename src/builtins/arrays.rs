//! Array builtin methods, grounded on `array_method_call` in the distilled
//! source.

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

pub fn call(obj: &[Value], method_name: &str, posargs: &[Value]) -> EvalResult<Value> {
    match method_name {
        "contains" => {
            let [needle] = posargs else {
                return Err(EvalError::interpreter("Contains method takes exactly one argument."));
            };
            Ok(Value::Bool(contains_recursive(obj, needle)))
        }
        "length" => Ok(Value::Integer(obj.len() as i64)),
        "get" => {
            if posargs.is_empty() || posargs.len() > 2 {
                return Err(EvalError::invalid_arguments(
                    "Array method 'get()' only takes two arguments: the index and an optional fallback value if the index is out of range.",
                ));
            }
            let Value::Integer(index) = &posargs[0] else {
                return Err(EvalError::invalid_arguments("Array index must be a number."));
            };
            let len = obj.len() as i64;
            if *index < -len || *index >= len {
                return match posargs.get(1) {
                    // The fallback has already been evaluated by the time it
                    // reaches here; unlike the dict `get` path's internal
                    // call sites, nothing re-evaluates an AST node at this
                    // point (see SPEC_FULL.md §9 on this parity no-op).
                    Some(fallback) => Ok(fallback.clone()),
                    None => Err(EvalError::invalid_arguments(format!(
                        "Array index {index} is out of bounds for array of size {len}."
                    ))),
                };
            }
            let resolved = if *index < 0 { index + len } else { *index };
            Ok(obj[resolved as usize].clone())
        }
        other => Err(EvalError::interpreter(format!(
            "Arrays do not have a method called \"{other}\"."
        ))),
    }
}

fn contains_recursive(items: &[Value], needle: &Value) -> bool {
    items.iter().any(|item| match item {
        Value::Array(inner) => contains_recursive(inner, needle),
        other => other == needle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_recurses_into_nested_arrays() {
        let arr = vec![Value::Integer(1), Value::array(vec![Value::Integer(2)])];
        assert_eq!(call(&arr, "contains", &[Value::Integer(2)]).unwrap(), Value::Bool(true));
        assert_eq!(call(&arr, "contains", &[Value::Integer(3)]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn get_supports_negative_index_and_fallback() {
        let arr = vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)];
        assert_eq!(call(&arr, "get", &[Value::Integer(-1)]).unwrap(), Value::Integer(3));
        assert_eq!(
            call(&arr, "get", &[Value::Integer(9), Value::str("fallback")]).unwrap(),
            Value::str("fallback")
        );
        assert!(call(&arr, "get", &[Value::Integer(9)]).is_err());
    }
}
