//! Statement evaluation: control flow, assignment, for-each (§4.2, §4.7).

use crate::ast::{Node, NodeKind};
use crate::error::{EvalError, EvalResult};
use crate::eval::control::Control;
use crate::eval::expr::eval_expr;
use crate::interpreter::Interpreter;
use crate::value::Value;

pub(crate) fn eval_stmt(interp: &mut Interpreter, node: &Node) -> EvalResult<Control> {
    let result = eval_stmt_inner(interp, node);
    result.map_err(|e| e.with_location_if_missing(&node.location))
}

fn eval_stmt_inner(interp: &mut Interpreter, node: &Node) -> EvalResult<Control> {
    match &node.kind {
        NodeKind::CodeBlock(stmts) => eval_block(interp, stmts),

        NodeKind::Assignment(name, expr) => {
            let value = eval_expr(interp, expr)?;
            interp.set_variable(name, deep_copy_if_mutable(value))?;
            Ok(Control::None)
        }
        NodeKind::PlusAssignment(name, expr) => {
            let current = interp.get_variable(name)?;
            let rhs = eval_expr(interp, expr)?;
            let combined = eval_plus_assign(current, rhs)?;
            interp.set_variable(name, combined)?;
            Ok(Control::None)
        }

        NodeKind::If(clauses, else_block) => eval_if(interp, clauses, else_block.as_deref()),

        NodeKind::Foreach(vars, items_expr, body) => eval_foreach(interp, vars, items_expr, body),

        NodeKind::Continue => Ok(Control::Continue),
        NodeKind::Break => Ok(Control::Break),

        // Everything else is a bare expression statement: evaluate for its
        // side effects (function/method calls) and discard the value.
        _ => {
            eval_expr(interp, node)?;
            Ok(Control::None)
        }
    }
}

fn eval_block(interp: &mut Interpreter, stmts: &[Node]) -> EvalResult<Control> {
    for stmt in stmts {
        let control = eval_stmt(interp, stmt)?;
        if !control.is_none() {
            return Ok(control);
        }
    }
    Ok(Control::None)
}

/// Mutable host objects are deep-copied on assignment; everything else is
/// value-semantic already (§4.7).
fn deep_copy_if_mutable(value: Value) -> Value {
    match value {
        Value::HostObject(handle) if handle.is_mutable() => Value::HostObject(handle.deep_clone()),
        other => other,
    }
}

fn eval_plus_assign(current: Value, rhs: Value) -> EvalResult<Value> {
    match (current, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::str(format!("{}{}", a.as_str(), b.as_str()))),
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
        (Value::Array(a), Value::Array(b)) => {
            let mut items = (*a).clone();
            items.extend((*b).iter().cloned());
            Ok(Value::array(items))
        }
        (Value::Array(a), b) => {
            let mut items = (*a).clone();
            items.push(b);
            Ok(Value::array(items))
        }
        (Value::Dict(a), Value::Dict(b)) => Ok(Value::Dict(std::rc::Rc::new(a.merged_with(&b)))),
        (a, b) => Err(EvalError::invalid_arguments(format!(
            "+= is not supported between {} and {}.",
            a.type_name(),
            b.type_name()
        ))),
    }
}

/// Condition clauses evaluated in order; a `Disabler` condition disables
/// just that clause (falls through to the next, rather than raising or
/// executing it) — see SPEC_FULL.md's Open Question resolution on this
/// point (DESIGN.md).
fn eval_if(interp: &mut Interpreter, clauses: &[(Node, Node)], else_block: Option<&Node>) -> EvalResult<Control> {
    for (cond, block) in clauses {
        interp.tmp_version_target = None;
        match eval_expr(interp, cond)? {
            Value::Bool(true) => {
                return eval_if_block_with_tmp_version(interp, block);
            }
            Value::Bool(false) => continue,
            Value::Disabler => continue,
            other => {
                return Err(EvalError::invalid_code(format!(
                    "If condition must be a boolean, got {}.",
                    other.type_name()
                )))
            }
        }
    }
    match else_block {
        Some(block) => eval_stmt(interp, block),
        None => Ok(Control::None),
    }
}

fn eval_if_block_with_tmp_version(interp: &mut Interpreter, block: &Node) -> EvalResult<Control> {
    let Some(target) = interp.tmp_version_target.take() else {
        return eval_stmt(interp, block);
    };
    let subproject = interp.subproject.clone();
    let previous = interp.feature_policy.project_version(&subproject).map(str::to_string);
    interp.feature_policy.set_project_version(subproject.clone(), target);
    let result = eval_stmt(interp, block);
    match previous {
        Some(v) => interp.feature_policy.set_project_version(subproject, v),
        None => {}
    }
    result
}

fn eval_foreach(interp: &mut Interpreter, vars: &[String], items_expr: &Node, body: &Node) -> EvalResult<Control> {
    let items = eval_expr(interp, items_expr)?;
    interp.enter_foreach()?;
    let result = eval_foreach_inner(interp, vars, items, body);
    interp.exit_foreach();
    result
}

fn eval_foreach_inner(interp: &mut Interpreter, vars: &[String], items: Value, body: &Node) -> EvalResult<Control> {
    match items {
        Value::Array(array) => {
            let [var] = vars else {
                return Err(EvalError::invalid_arguments("foreach over an array requires exactly one loop variable."));
            };
            for item in array.iter() {
                interp.set_variable(var, item.clone())?;
                match eval_stmt(interp, body)? {
                    Control::Continue | Control::None => continue,
                    Control::Break => break,
                    Control::SubdirDone => return Ok(Control::SubdirDone),
                }
            }
            Ok(Control::None)
        }
        Value::Range(range) => {
            let [var] = vars else {
                return Err(EvalError::invalid_arguments("foreach over a range requires exactly one loop variable."));
            };
            for i in range.iter() {
                interp.set_variable(var, Value::Integer(i))?;
                match eval_stmt(interp, body)? {
                    Control::Continue | Control::None => continue,
                    Control::Break => break,
                    Control::SubdirDone => return Ok(Control::SubdirDone),
                }
            }
            Ok(Control::None)
        }
        Value::Dict(dict) => {
            let [key_var, value_var] = vars else {
                return Err(EvalError::invalid_arguments("foreach over a dict requires exactly two loop variables."));
            };
            for key in dict.sorted_keys() {
                let value = dict.get(key).expect("sorted key must exist").clone();
                interp.set_variable(key_var, Value::str(key.to_string()))?;
                interp.set_variable(value_var, value)?;
                match eval_stmt(interp, body)? {
                    Control::Continue | Control::None => continue,
                    Control::Break => break,
                    Control::SubdirDone => return Ok(Control::SubdirDone),
                }
            }
            Ok(Control::None)
        }
        other => Err(EvalError::invalid_arguments(format!(
            "foreach cannot iterate over type \"{}\".",
            other.type_name()
        ))),
    }
}
