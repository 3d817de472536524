//! Dict builtin methods, grounded on `dict_method_call` in the distilled
//! source.

use crate::error::{EvalError, EvalResult};
use crate::value::{DictValue, Value};

pub fn call(obj: &DictValue, method_name: &str, posargs: &[Value]) -> EvalResult<Value> {
    match method_name {
        "has_key" | "get" => {
            if method_name == "has_key" && posargs.len() != 1 {
                return Err(EvalError::interpreter("has_key() takes exactly one argument."));
            }
            if method_name == "get" && !(1..=2).contains(&posargs.len()) {
                return Err(EvalError::interpreter("get() takes one or two arguments."));
            }
            let Value::Str(key) = &posargs[0] else {
                return Err(EvalError::invalid_arguments("Dictionary key must be a string."));
            };
            let has_key = obj.contains_key(key.as_str());
            if method_name == "has_key" {
                return Ok(Value::Bool(has_key));
            }
            if has_key {
                return Ok(obj.get(key.as_str()).unwrap().clone());
            }
            if let Some(fallback) = posargs.get(1) {
                return Ok(fallback.clone());
            }
            Err(EvalError::interpreter(format!(
                "Key '{}' is not in the dictionary.",
                key.as_str()
            )))
        }
        "keys" => {
            if !posargs.is_empty() {
                return Err(EvalError::interpreter("keys() takes no arguments."));
            }
            Ok(Value::array(obj.sorted_keys().into_iter().map(Value::str).collect()))
        }
        other => Err(EvalError::interpreter(format!(
            "Dictionaries do not have a method called \"{other}\"."
        ))),
    }
}
