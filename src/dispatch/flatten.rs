//! Default positional-argument flattening (§4.5): recursively splices
//! nested arrays into one flat list before a call that hasn't opted out.

use crate::value::Value;

pub fn flatten_positional(args: Vec<Value>) -> Vec<Value> {
    let mut out = Vec::with_capacity(args.len());
    flatten_into(args, &mut out);
    out
}

fn flatten_into(args: Vec<Value>, out: &mut Vec<Value>) {
    for arg in args {
        match arg {
            Value::Array(items) => match Rc::try_unwrap(items) {
                Ok(items) => flatten_into(items, out),
                Err(shared) => flatten_into(shared.to_vec(), out),
            },
            other => out.push(other),
        }
    }
}

use std::rc::Rc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_arrays_splice_into_one_flat_list() {
        let nested = Value::array(vec![
            Value::Integer(1),
            Value::array(vec![Value::Integer(2), Value::array(vec![Value::Integer(3)])]),
        ]);
        let flat = flatten_positional(vec![nested, Value::Integer(4)]);
        assert_eq!(
            flat,
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(3), Value::Integer(4)]
        );
    }

    #[test]
    fn non_array_arguments_pass_through_untouched() {
        let flat = flatten_positional(vec![Value::str("a"), Value::Integer(1)]);
        assert_eq!(flat, vec![Value::str("a"), Value::Integer(1)]);
    }
}
