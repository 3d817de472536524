//! String/version-string builtin methods, grounded on `string_method_call`
//! in the distilled source.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{EvalError, EvalResult};
use crate::value::{StringValue, Value};

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").unwrap());
static FORMAT_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\d+)@").unwrap());

fn one_string_arg(posargs: &[Value], method_name: &str) -> EvalResult<Option<String>> {
    match posargs {
        [] => Ok(None),
        [Value::Str(s)] => Ok(Some(s.as_str().to_string())),
        [_] => Err(EvalError::interpreter(format!(
            "{method_name}() argument must be a string"
        ))),
        _ => Err(EvalError::interpreter(format!(
            "{method_name}() must have zero or one arguments"
        ))),
    }
}

pub fn call(obj: &StringValue, method_name: &str, posargs: &[Value]) -> EvalResult<Value> {
    let text = obj.as_str();
    match method_name {
        "strip" => {
            let pat = one_string_arg(posargs, "strip")?;
            Ok(Value::str(match pat {
                Some(chars) => text.trim_matches(|c| chars.contains(c)).to_string(),
                None => text.trim().to_string(),
            }))
        }
        "format" => Ok(Value::str(format_string(text, posargs))),
        "to_upper" => Ok(Value::str(text.to_uppercase())),
        "to_lower" => Ok(Value::str(text.to_lowercase())),
        "underscorify" => Ok(Value::str(NON_ALNUM.replace_all(text, "_").to_string())),
        "split" => {
            let sep = one_string_arg(posargs, "split")?;
            let parts: Vec<Value> = match sep {
                Some(sep) => text.split(sep.as_str()).map(Value::str).collect(),
                None => text.split_whitespace().map(Value::str).collect(),
            };
            Ok(Value::array(parts))
        }
        "startswith" | "contains" | "endswith" => {
            let needle = match posargs {
                [Value::Str(s)] => s.as_str(),
                _ => return Err(EvalError::interpreter("Argument must be a string.")),
            };
            Ok(Value::Bool(match method_name {
                "startswith" => text.starts_with(needle),
                "contains" => text.contains(needle),
                _ => text.ends_with(needle),
            }))
        }
        "to_int" => text
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| EvalError::interpreter(format!("String '{text}' cannot be converted to int"))),
        "join" => match posargs {
            [Value::Array(items)] => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items.iter() {
                    match item {
                        Value::Str(s) => parts.push(s.as_str().to_string()),
                        other => {
                            return Err(EvalError::interpreter(format!(
                                "join() list must contain only strings, found {}.",
                                other.type_name()
                            )))
                        }
                    }
                }
                Ok(Value::str(parts.join(text)))
            }
            _ => Err(EvalError::interpreter("join() takes exactly one argument.")),
        },
        "substring" => {
            let chars: Vec<char> = text.chars().collect();
            let (mut start, mut end) = (0i64, chars.len() as i64);
            if let Some(v) = posargs.first() {
                start = expect_int(v, "substring")?;
            }
            if let Some(v) = posargs.get(1) {
                end = expect_int(v, "substring")?;
            }
            if posargs.len() > 2 {
                return Err(EvalError::interpreter("substring() takes maximum two arguments."));
            }
            let start = start.clamp(0, chars.len() as i64) as usize;
            let end = end.clamp(0, chars.len() as i64) as usize;
            if start >= end {
                Ok(Value::str(""))
            } else {
                Ok(Value::str(chars[start..end].iter().collect::<String>()))
            }
        }
        "replace" => match posargs {
            [Value::Str(from), Value::Str(to)] => Ok(Value::str(text.replace(from.as_str(), to.as_str()))),
            _ => Err(EvalError::interpreter(
                "replace() requires that both arguments be strings",
            )),
        },
        other => Err(EvalError::interpreter(format!(
            "Unknown method \"{other}\" for a string."
        ))),
    }
}

fn expect_int(v: &Value, method_name: &str) -> EvalResult<i64> {
    match v {
        Value::Integer(i) => Ok(*i),
        _ => Err(EvalError::interpreter(format!(
            "{method_name}() argument must be an int"
        ))),
    }
}

/// `str.replace` is itself feature-gated at 0.58.0 in the original; callers
/// (the evaluator's method dispatch) register this before invoking `call`.
pub const REPLACE_FEATURE_VERSION: &str = "0.58.0";

fn format_string(template: &str, args: &[Value]) -> String {
    let rendered: Vec<String> = args.iter().map(render_format_arg).collect();
    FORMAT_PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            let idx: usize = caps[1].parse().unwrap_or(usize::MAX);
            rendered.get(idx).cloned().unwrap_or_default()
        })
        .into_owned()
}

fn render_format_arg(v: &Value) -> String {
    match v {
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(t: &str) -> StringValue {
        StringValue::plain(t.to_string())
    }

    #[test]
    fn strip_split_join_roundtrip() {
        assert_eq!(call(&s("  hi  "), "strip", &[]).unwrap(), Value::str("hi"));
        let split = call(&s("a,b,c"), "split", &[Value::str(",")]).unwrap();
        assert_eq!(split, Value::array(vec![Value::str("a"), Value::str("b"), Value::str("c")]));
    }

    #[test]
    fn substring_clamped_bounds() {
        assert_eq!(call(&s("hello"), "substring", &[Value::Integer(1), Value::Integer(3)]).unwrap(), Value::str("el"));
        assert_eq!(call(&s("hello"), "substring", &[Value::Integer(10)]).unwrap(), Value::str(""));
    }

    #[test]
    fn underscorify_replaces_non_alnum() {
        assert_eq!(call(&s("a-b.c"), "underscorify", &[]).unwrap(), Value::str("a_b_c"));
    }

    #[test]
    fn format_substitutes_placeholders_in_order() {
        let out = format_string("@0@-@1@", &[Value::Integer(1), Value::Bool(true)]);
        assert_eq!(out, "1-true");
    }
}
