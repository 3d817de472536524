//! The DSL's dynamic value union.
//!
//! Kept as a closed tagged sum (no subclassing) plus one escape hatch,
//! `HostObject`, for embedder-supplied opaque values — the shape the
//! REDESIGN FLAG in SPEC_FULL.md §9 calls for in place of the original's
//! string-subclassing and ad-hoc object hierarchy.

mod dict_value;
mod file_value;
mod host_object;
mod range;
mod string_value;

pub use dict_value::DictValue;
pub use file_value::FileHandle;
pub use host_object::{HostHandle, HostObject};
pub use range::RangeValue;
pub use string_value::{StringKind, StringValue};

use std::rc::Rc;

use crate::error::{EvalError, EvalResult};

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Str(StringValue),
    Array(Rc<Vec<Value>>),
    Dict(Rc<DictValue>),
    Range(RangeValue),
    HostObject(HostHandle),
    Disabler,
    File(FileHandle),
}

impl Value {
    pub fn str(text: impl Into<Rc<str>>) -> Self {
        Value::Str(StringValue::plain(text))
    }

    pub fn version_str(text: impl Into<Rc<str>>) -> Self {
        Value::Str(StringValue::version(text))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }

    pub fn dict(entries: Vec<(String, Value)>) -> Self {
        Value::Dict(Rc::new(DictValue::from_entries(entries)))
    }

    /// Name used in type-mismatch error messages; mirrors the teacher's
    /// `type_name()` convention on its own value union.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(s) if s.is_version() => "version_string",
            Value::Str(_) => "str",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
            Value::Range(_) => "range",
            Value::HostObject(_) => "object",
            Value::Disabler => "disabler",
            Value::File(_) => "file",
        }
    }

    /// Only `Bool` is truthy; everything else is a hard error when used as a
    /// condition (§4.1).
    pub fn expect_bool(&self, context: &str) -> EvalResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(EvalError::interpreter(format!(
                "{context} is not a boolean (got {}).",
                other.type_name()
            ))),
        }
    }

    pub fn is_disabler(&self) -> bool {
        matches!(self, Value::Disabler)
    }

    /// Recursively scans positional/keyword argument contents for a
    /// transitively-nested `Disabler`, per §4.6. Only arrays recurse;
    /// dicts, like the original, are not unwrapped for this check.
    pub fn contains_disabler(&self) -> bool {
        match self {
            Value::Disabler => true,
            Value::Array(items) => items.iter().any(Value::contains_disabler),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Range(a), Value::Range(b)) => a == b,
            (Value::HostObject(a), Value::HostObject(b)) => a == b,
            (Value::Disabler, Value::Disabler) => true,
            (Value::File(a), Value::File(b)) => a == b,
            // Mismatched variants: always unequal. The caller (comparison
            // evaluator) is responsible for the deprecation warning; this
            // impl has no side channel to a diagnostics sink.
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Str(s) => write!(f, "{}", s.as_str()),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Dict(d) => {
                write!(f, "{{")?;
                for (i, (k, v)) in d.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Range(r) => write!(f, "range({}, {}, {})", r.start, r.stop, r.step),
            Value::HostObject(h) => write!(f, "<{}>", h.type_name()),
            Value::Disabler => write!(f, "<disabler>"),
            Value::File(file) => write!(f, "<file: {}>", file.display()),
        }
    }
}
