//! Turns an `ArgumentNode` into an evaluated positional list + keyword map
//! (§4.3). Evaluation of the expression nodes themselves is a callback so
//! this module stays independent of the evaluator.

use std::collections::HashMap;

use crate::ast::{ArgumentNode, KeyNode};
use crate::error::{EvalError, EvalResult};
use crate::value::Value;

pub struct ReducedArguments {
    pub positional: Vec<Value>,
    pub keyword: HashMap<String, Value>,
}

/// `eval` evaluates a single AST node into a `Value`; it's the evaluator's
/// `eval_expr`, threaded through so this module has no dependency on it.
pub fn reduce_arguments<E>(node: &ArgumentNode, mut eval: E) -> EvalResult<ReducedArguments>
where
    E: FnMut(&crate::ast::Node) -> EvalResult<Value>,
{
    if node.incorrect_order() {
        return Err(EvalError::invalid_arguments(
            "All keyword arguments must be after positional arguments.",
        ));
    }

    let mut positional = Vec::with_capacity(node.positional.len());
    for expr in &node.positional {
        positional.push(eval(expr)?);
    }

    let mut keyword = HashMap::with_capacity(node.keyword.len());
    for (key_node, value_expr) in &node.keyword {
        let key = resolve_key(key_node, &mut eval)?;
        let value = eval(value_expr)?;
        if keyword.insert(key.clone(), value).is_some() {
            return Err(EvalError::invalid_arguments(format!(
                "Duplicate keyword argument \"{key}\"."
            )));
        }
    }

    expand_default_kwargs(&mut keyword)?;

    Ok(ReducedArguments { positional, keyword })
}

fn resolve_key<E>(key_node: &KeyNode, eval: &mut E) -> EvalResult<String>
where
    E: FnMut(&crate::ast::Node) -> EvalResult<Value>,
{
    match key_node {
        KeyNode::Identifier(name) => Ok(name.clone()),
        KeyNode::Expression(expr) => match eval(expr)? {
            Value::Str(s) => Ok(s.as_str().to_string()),
            other => Err(EvalError::invalid_arguments(format!(
                "Dictionary key must be a string, got {}.",
                other.type_name()
            ))),
        },
    }
}

/// The literal keyword name `kwargs` is reserved: if present and bound to a
/// `Dict`, its contents are spliced into the keyword map and the `kwargs`
/// entry itself is removed. A collision with an already-present keyword, or
/// a nested `kwargs` key inside the expansion, is an error.
fn expand_default_kwargs(keyword: &mut HashMap<String, Value>) -> EvalResult<()> {
    let Some(expansion) = keyword.remove("kwargs") else {
        return Ok(());
    };
    let Value::Dict(dict) = expansion else {
        return Err(EvalError::invalid_arguments(
            "\"kwargs\" keyword argument must be a dictionary.",
        ));
    };
    for (key, value) in dict.iter() {
        if key == "kwargs" {
            return Err(EvalError::invalid_arguments(
                "\"kwargs\" dictionary may not itself contain a \"kwargs\" key.",
            ));
        }
        if keyword.contains_key(key) {
            return Err(EvalError::invalid_arguments(format!(
                "Keyword argument \"{key}\" defined both directly and via \"kwargs\"."
            )));
        }
        keyword.insert(key.to_string(), value.clone());
    }
    Ok(())
}
