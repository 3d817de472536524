use crate::error::{EvalError, EvalResult};
use crate::value::Value;

pub fn call(obj: bool, method_name: &str, posargs: &[Value]) -> EvalResult<Value> {
    match method_name {
        "to_string" => match posargs {
            [] => Ok(Value::str(if obj { "true" } else { "false" })),
            [Value::Str(t), Value::Str(f)] => {
                Ok(Value::str(if obj { t.as_str() } else { f.as_str() }.to_string()))
            }
            _ => Err(EvalError::interpreter(
                "bool.to_string() must have either no arguments or exactly two string arguments that signify what values to return for true and false.",
            )),
        },
        "to_int" => Ok(Value::Integer(if obj { 1 } else { 0 })),
        other => Err(EvalError::interpreter(format!(
            "Unknown method \"{other}\" for a boolean."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_string_default_and_custom() {
        assert_eq!(call(true, "to_string", &[]).unwrap(), Value::str("true"));
        assert_eq!(
            call(false, "to_string", &[Value::str("yes"), Value::str("no")]).unwrap(),
            Value::str("no")
        );
    }

    #[test]
    fn to_int() {
        assert_eq!(call(true, "to_int", &[]).unwrap(), Value::Integer(1));
        assert_eq!(call(false, "to_int", &[]).unwrap(), Value::Integer(0));
    }
}
