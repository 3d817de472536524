//! Name → Value environment: builtins (immutable) layered over user
//! variables (assignable). Mirrors the teacher's separation of a fixed
//! global namespace from a mutable per-run scope.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[_A-Za-z][_A-Za-z0-9]*$").unwrap());

pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

#[derive(Debug, Default)]
pub struct Environment {
    builtins: HashMap<String, Value>,
    variables: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a builtin. Builtins are not subject to the identifier
    /// regex (`meson`, `host_machine`, ... are all valid builtin names by
    /// construction) but may never be reassigned once set.
    pub fn set_builtin(&mut self, name: impl Into<String>, value: Value) {
        self.builtins.insert(name.into(), value);
    }

    /// Assigns a user variable. Rejects names that don't match the
    /// identifier grammar and names that collide with a builtin.
    pub fn assign(&mut self, name: &str, value: Value) -> EvalResult<()> {
        if !is_valid_identifier(name) {
            return Err(EvalError::invalid_code(format!(
                "Invalid variable name \"{name}\"."
            )));
        }
        if self.builtins.contains_key(name) {
            return Err(EvalError::invalid_code(format!(
                "Tried to overwrite builtin variable \"{name}\"."
            )));
        }
        self.variables.insert(name.to_string(), value);
        Ok(())
    }

    /// Read order: builtins first, then user variables, matching §3's
    /// "builtins take precedence" rule.
    pub fn get(&self, name: &str) -> EvalResult<Value> {
        if let Some(v) = self.builtins.get(name) {
            return Ok(v.clone());
        }
        if let Some(v) = self.variables.get(name) {
            return Ok(v.clone());
        }
        Err(EvalError::invalid_code(format!("Unknown variable \"{name}\".")))
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.builtins.contains_key(name) || self.variables.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_cannot_be_shadowed() {
        let mut env = Environment::new();
        env.set_builtin("meson", Value::str("meson"));
        let err = env.assign("meson", Value::Integer(1)).unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::InvalidCode(_)));
    }

    #[test]
    fn builtins_take_precedence_on_read() {
        let mut env = Environment::new();
        env.set_builtin("x", Value::Integer(1));
        assert_eq!(env.get("x").unwrap(), Value::Integer(1));
    }

    #[test]
    fn invalid_identifier_rejected() {
        let mut env = Environment::new();
        assert!(env.assign("9bad", Value::Integer(1)).is_err());
        assert!(env.assign("good_name1", Value::Integer(1)).is_ok());
    }
}
