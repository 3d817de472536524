use crate::error::{EvalError, EvalResult};
use crate::value::Value;

pub fn call(obj: i64, method_name: &str, posargs: &[Value]) -> EvalResult<Value> {
    if !posargs.is_empty() {
        return Err(EvalError::interpreter(format!(
            "int.{method_name}() must have no arguments."
        )));
    }
    match method_name {
        "is_even" => Ok(Value::Bool(obj % 2 == 0)),
        "is_odd" => Ok(Value::Bool(obj % 2 != 0)),
        "to_string" => Ok(Value::str(obj.to_string())),
        other => Err(EvalError::interpreter(format!(
            "Unknown method \"{other}\" for an integer."
        ))),
    }
}
