//! Expression evaluation: literals, arithmetic, comparison, indexing,
//! logical operators, calls, container literals, format strings (§4.1,
//! §4.2).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::args::reduce_arguments;
use crate::ast::{ArithOp, CompareOp, KeyNode, Node, NodeKind, NumberLiteral};
use crate::error::{EvalError, EvalResult};
use crate::feature_policy::PolicyClass;
use crate::interpreter::Interpreter;
use crate::value::{DictValue, Value};

static FORMAT_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"@([_A-Za-z][_A-Za-z0-9]*)@").unwrap());

pub(crate) fn eval_expr(interp: &mut Interpreter, node: &Node) -> EvalResult<Value> {
    let result = eval_expr_inner(interp, node);
    result.map_err(|e| e.with_location_if_missing(&node.location))
}

fn eval_expr_inner(interp: &mut Interpreter, node: &Node) -> EvalResult<Value> {
    match &node.kind {
        NodeKind::String(s) => Ok(Value::str(s.clone())),
        NodeKind::Number(NumberLiteral::Integer(i)) => Ok(Value::Integer(*i)),
        NodeKind::Number(NumberLiteral::Float(f)) => Ok(Value::Float(*f)),
        NodeKind::Boolean(b) => Ok(Value::Bool(*b)),
        NodeKind::Id(name) => interp.get_variable(name),
        NodeKind::Empty => Ok(Value::Bool(false)),

        NodeKind::Not(inner) => {
            let v = eval_expr(interp, inner)?;
            Ok(Value::Bool(!v.expect_bool("operand of \"not\"")?))
        }
        NodeKind::UMinus(inner) => match eval_expr(interp, inner)? {
            Value::Integer(i) => Ok(Value::Integer(-i)),
            other => Err(EvalError::invalid_code(format!(
                "Unary minus is only supported on integers, got {}.",
                other.type_name()
            ))),
        },
        NodeKind::And(l, r) => {
            let lv = eval_expr(interp, l)?.expect_bool("left operand of \"and\"")?;
            if !lv {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(eval_expr(interp, r)?.expect_bool("right operand of \"and\"")?))
        }
        NodeKind::Or(l, r) => {
            let lv = eval_expr(interp, l)?.expect_bool("left operand of \"or\"")?;
            if lv {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(eval_expr(interp, r)?.expect_bool("right operand of \"or\"")?))
        }

        NodeKind::Ternary(cond, t, f) => match eval_expr(interp, cond)? {
            Value::Bool(true) => eval_expr(interp, t),
            Value::Bool(false) => eval_expr(interp, f),
            Value::Disabler => Ok(Value::Disabler),
            other => Err(EvalError::interpreter(format!(
                "Ternary condition must be a boolean, got {}.",
                other.type_name()
            ))),
        },

        NodeKind::Arithmetic(l, r, op) => {
            let lv = eval_expr(interp, l)?;
            let rv = eval_expr(interp, r)?;
            eval_arithmetic(interp, *op, lv, rv)
        }
        NodeKind::Comparison(l, r, op) => {
            let lv = eval_expr(interp, l)?;
            let rv = eval_expr(interp, r)?;
            eval_comparison(interp, *op, lv, rv)
        }

        NodeKind::Index(receiver, index_expr) => {
            let receiver = eval_expr(interp, receiver)?;
            let index = eval_expr(interp, index_expr)?;
            eval_index(&receiver, &index)
        }

        NodeKind::Array(args) => {
            if !args.keyword.is_empty() {
                return Err(EvalError::invalid_code("Array literal does not take keyword arguments."));
            }
            let mut items = Vec::with_capacity(args.positional.len());
            for expr in &args.positional {
                items.push(eval_expr(interp, expr)?);
            }
            Ok(Value::array(items))
        }

        NodeKind::Dict(args) => eval_dict_literal(interp, args),

        NodeKind::FormatString(template) => eval_format_string(interp, template),

        NodeKind::Function(name, args) => {
            let reduced = reduce_arguments(args, |e| eval_expr(interp, e))?;
            interp.call_function(name, reduced.positional, reduced.keyword)
        }
        NodeKind::Method(receiver, name, args) => {
            let receiver_value = eval_expr(interp, receiver)?;
            let reduced = reduce_arguments(args, |e| eval_expr(interp, e))?;
            interp.call_method(receiver_value, name, reduced.positional, reduced.keyword)
        }

        other => Err(EvalError::invalid_code(format!(
            "Node kind {other:?} is not a valid expression here."
        ))),
    }
}

fn eval_dict_literal(interp: &mut Interpreter, args: &crate::ast::ArgumentNode) -> EvalResult<Value> {
    if !args.positional.is_empty() {
        return Err(EvalError::invalid_code("Dict literal does not take positional arguments."));
    }
    interp.gate_feature(PolicyClass::New, "0.47.0", "dict")?;

    let mut entries: Vec<(String, Value)> = Vec::with_capacity(args.keyword.len());
    for (key_node, value_node) in &args.keyword {
        let key = match key_node {
            KeyNode::Identifier(name) => name.clone(),
            KeyNode::Expression(expr) => {
                if !matches!(expr.kind, NodeKind::String(_)) {
                    interp.gate_feature(
                        PolicyClass::New,
                        "0.53.0",
                        "Dictionary entry using non literal key",
                    )?;
                }
                match eval_expr(interp, expr)? {
                    Value::Str(s) => s.as_str().to_string(),
                    other => {
                        return Err(EvalError::invalid_arguments(format!(
                            "Dictionary key must be a string, got {}.",
                            other.type_name()
                        )))
                    }
                }
            }
        };
        if entries.iter().any(|(k, _)| k == &key) {
            return Err(EvalError::invalid_arguments(format!("Duplicate key \"{key}\" in dictionary.")));
        }
        let value = eval_expr(interp, value_node)?;
        entries.push((key, value));
    }
    Ok(Value::Dict(std::rc::Rc::new(DictValue::from_entries(entries))))
}

fn eval_format_string(interp: &mut Interpreter, template: &str) -> EvalResult<Value> {
    interp.gate_feature(PolicyClass::New, "0.58.0", "format string")?;
    let mut first_error = None;
    let rendered = FORMAT_VAR.replace_all(template, |caps: &regex::Captures| {
        let name = &caps[1];
        match interp.get_variable(name) {
            Ok(Value::Str(s)) => s.as_str().to_string(),
            Ok(Value::Integer(i)) => i.to_string(),
            Ok(Value::Float(f)) => f.to_string(),
            Ok(Value::Bool(b)) => if b { "true" } else { "false" }.to_string(),
            Ok(other) => {
                if first_error.is_none() {
                    first_error = Some(EvalError::invalid_code(format!(
                        "Format string variable \"{name}\" must be str, int, float, or bool, got {}.",
                        other.type_name()
                    )));
                }
                String::new()
            }
            Err(_) => {
                if first_error.is_none() {
                    first_error = Some(EvalError::invalid_code(format!(
                        "Format string references unknown variable \"{name}\"."
                    )));
                }
                String::new()
            }
        }
    });
    let rendered = rendered.into_owned();
    match first_error {
        Some(e) => Err(e),
        None => Ok(Value::str(rendered)),
    }
}

/// Floor division (rounds toward negative infinity), matching Python's `//`.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if (r != 0) && ((r < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

/// Floor modulo: the remainder takes the divisor's sign, matching Python's `%`.
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a % b;
    if (r != 0) && ((r < 0) != (b < 0)) {
        r + b
    } else {
        r
    }
}

fn eval_arithmetic(interp: &mut Interpreter, op: ArithOp, lv: Value, rv: Value) -> EvalResult<Value> {
    use ArithOp::*;
    match (op, lv, rv) {
        (Add, Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
        (Add, Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Add, Value::Str(a), Value::Str(b)) => Ok(Value::str(format!("{}{}", a.as_str(), b.as_str()))),
        (Add, Value::Array(a), Value::Array(b)) => {
            let mut items = (*a).clone();
            items.extend((*b).iter().cloned());
            Ok(Value::array(items))
        }
        (Add, Value::Array(a), b) => {
            let mut items = (*a).clone();
            items.push(b);
            Ok(Value::array(items))
        }
        (Add, Value::Dict(a), Value::Dict(b)) => Ok(Value::Dict(std::rc::Rc::new(a.merged_with(&b)))),

        (Sub, Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a - b)),
        (Mul, Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a * b)),
        (Mod, Value::Integer(a), Value::Integer(b)) => {
            if b == 0 {
                Err(EvalError::invalid_code("Modulo by zero."))
            } else {
                Ok(Value::Integer(floor_mod(a, b)))
            }
        }
        (Div, Value::Integer(a), Value::Integer(b)) => {
            if b == 0 {
                Err(EvalError::invalid_code("Division by zero."))
            } else {
                Ok(Value::Integer(floor_div(a, b)))
            }
        }
        (Div, Value::Str(a), Value::Str(b)) => {
            interp.gate_feature(PolicyClass::New, "0.49.0", "/ operator for path joining")?;
            let left = a.as_str().replace('\\', "/");
            let right = b.as_str().replace('\\', "/");
            let joined = format!("{}/{}", left.trim_end_matches('/'), right.trim_start_matches('/'));
            Ok(Value::str(joined))
        }

        (_, lv, rv) => Err(EvalError::invalid_code(format!(
            "Operator not supported between {} and {}.",
            lv.type_name(),
            rv.type_name()
        ))),
    }
}

fn eval_comparison(interp: &mut Interpreter, op: CompareOp, lv: Value, rv: Value) -> EvalResult<Value> {
    use CompareOp::*;
    match op {
        Eq | NotEq => {
            if std::mem::discriminant(&lv) != std::mem::discriminant(&rv) {
                interp.warn_sink.warn(
                    None,
                    &format!(
                        "Trying to compare values of different types ({}, {}) using == or !=.",
                        lv.type_name(),
                        rv.type_name()
                    ),
                );
            }
            let eq = lv == rv;
            Ok(Value::Bool(if op == Eq { eq } else { !eq }))
        }
        Lt | LtEq | Gt | GtEq => {
            let ordering = ordered_compare(&lv, &rv)?;
            Ok(Value::Bool(match op {
                Lt => ordering == std::cmp::Ordering::Less,
                LtEq => ordering != std::cmp::Ordering::Greater,
                Gt => ordering == std::cmp::Ordering::Greater,
                GtEq => ordering != std::cmp::Ordering::Less,
                _ => unreachable!(),
            }))
        }
        In | NotIn => {
            let found = eval_membership(&lv, &rv)?;
            Ok(Value::Bool(if op == In { found } else { !found }))
        }
    }
}

fn ordered_compare(lv: &Value, rv: &Value) -> EvalResult<std::cmp::Ordering> {
    match (lv, rv) {
        (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).ok_or_else(|| EvalError::interpreter("NaN is not ordered.")),
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
        _ => Err(EvalError::interpreter(format!(
            "Ordering comparison requires two values of the same elementary type, got {} and {}.",
            lv.type_name(),
            rv.type_name()
        ))),
    }
}

fn eval_membership(lv: &Value, rv: &Value) -> EvalResult<bool> {
    if !matches!(lv, Value::Str(_) | Value::Integer(_) | Value::Float(_) | Value::HostObject(_)) {
        return Err(EvalError::invalid_arguments(format!(
            "\"in\" left-hand side must be str, int, float, or object, got {}.",
            lv.type_name()
        )));
    }
    match rv {
        Value::Array(items) => Ok(items.iter().any(|item| item == lv)),
        Value::Dict(dict) => match lv {
            Value::Str(key) => Ok(dict.contains_key(key.as_str())),
            _ => Ok(false),
        },
        other => Err(EvalError::invalid_arguments(format!(
            "\"in\" right-hand side must be array or dict, got {}.",
            other.type_name()
        ))),
    }
}

fn eval_index(receiver: &Value, index: &Value) -> EvalResult<Value> {
    match receiver {
        Value::Array(items) => {
            let Value::Integer(i) = index else {
                return Err(EvalError::invalid_code("Array index must be an integer."));
            };
            let len = items.len() as i64;
            let resolved = if *i < 0 { i + len } else { *i };
            items
                .get(resolved as usize)
                .cloned()
                .ok_or_else(|| EvalError::invalid_arguments(format!("Array index {i} is out of bounds for array of size {len}.")))
        }
        Value::Dict(dict) => {
            let Value::Str(key) = index else {
                return Err(EvalError::invalid_code("Dict index must be a string."));
            };
            dict.get(key.as_str())
                .cloned()
                .ok_or_else(|| EvalError::invalid_code(format!("Key \"{}\" is not in the dictionary.", key.as_str())))
        }
        Value::Range(range) => {
            let Value::Integer(i) = index else {
                return Err(EvalError::invalid_code("Range index must be an integer."));
            };
            range
                .index_signed(*i)
                .map(Value::Integer)
                .ok_or_else(|| EvalError::invalid_code(format!("Range index {i} is out of bounds.")))
        }
        other => Err(EvalError::invalid_code(format!(
            "Type \"{}\" doesn't support indexing.",
            other.type_name()
        ))),
    }
}
