//! Positional and keyword argument validation (§4.4).

use std::collections::HashMap;

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

/// One type, or a union of types, an argument/keyword may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Float,
    Bool,
    Str,
    Array,
    Dict,
    Range,
    HostObject,
    File,
    Any,
}

impl ValueKind {
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (ValueKind::Any, _) => true,
            (ValueKind::Integer, Value::Integer(_)) => true,
            (ValueKind::Float, Value::Float(_)) => true,
            (ValueKind::Bool, Value::Bool(_)) => true,
            (ValueKind::Str, Value::Str(_)) => true,
            (ValueKind::Array, Value::Array(_)) => true,
            (ValueKind::Dict, Value::Dict(_)) => true,
            (ValueKind::Range, Value::Range(_)) => true,
            (ValueKind::HostObject, Value::HostObject(_)) => true,
            (ValueKind::File, Value::File(_)) => true,
            _ => false,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ValueKind::Integer => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Str => "str",
            ValueKind::Array => "array",
            ValueKind::Dict => "dict",
            ValueKind::Range => "range",
            ValueKind::HostObject => "object",
            ValueKind::File => "file",
            ValueKind::Any => "any",
        }
    }
}

fn type_union_matches(kinds: &[ValueKind], value: &Value) -> bool {
    kinds.iter().any(|k| k.matches(value))
}

fn type_union_name(kinds: &[ValueKind]) -> String {
    kinds
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Positional-argument arity shape (§4.4 "Positional gate").
#[derive(Debug, Clone)]
pub enum PositionalArity {
    Exact,
    Variadic {
        element: Vec<ValueKind>,
        min_varargs: usize,
        max_varargs: usize,
    },
    OptionalTail {
        optional: Vec<Vec<ValueKind>>,
    },
}

#[derive(Debug, Clone)]
pub struct PositionalSchema {
    pub required: Vec<Vec<ValueKind>>,
    pub arity: PositionalArity,
}

/// The reshaped positional arguments handed to a callable after validation.
pub enum ReshapedPositional {
    /// Exact arity: one value per declared parameter, in order.
    Fixed(Vec<Value>),
    /// Variadic: required parameters, then the collected tail as one array.
    Variadic(Vec<Value>, Vec<Value>),
    /// Optional tail: required parameters, then each optional slot filled or
    /// `None`.
    OptionalTail(Vec<Value>, Vec<Option<Value>>),
}

#[derive(Debug, Clone)]
pub struct ContainerTypeInfo {
    pub container: ValueKind,
    pub contains: Vec<ValueKind>,
    pub pairs: bool,
    pub allow_empty: bool,
}

#[derive(Debug, Clone)]
pub enum KwargType {
    Scalar(Vec<ValueKind>),
    Container(ContainerTypeInfo),
}

#[derive(Debug, Clone)]
pub struct KwargInfo {
    pub name: String,
    pub kind: KwargType,
    pub required: bool,
    pub listify: bool,
    pub default: Option<Value>,
    pub since: Option<&'static str>,
    pub deprecated: Option<&'static str>,
}

impl KwargInfo {
    pub fn new(name: impl Into<String>, kind: KwargType) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            listify: false,
            default: None,
            since: None,
            deprecated: None,
        }
    }
}

/// A feature-policy use discovered while checking keywords, handed back to
/// the caller (the dispatcher) so it can register it against the
/// `FeaturePolicy` for the current subproject (§4.8). This module has no
/// dependency on `FeaturePolicy` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordUseKind {
    New,
    Deprecated,
}

pub struct KeywordUse<'a> {
    pub keyword: &'a str,
    pub version: &'static str,
    pub kind: KeywordUseKind,
}

pub struct TypeChecker;

impl TypeChecker {
    pub fn check_positional(schema: &PositionalSchema, args: Vec<Value>) -> EvalResult<ReshapedPositional> {
        let required = schema.required.len();
        match &schema.arity {
            PositionalArity::Exact => {
                if args.len() != required {
                    return Err(EvalError::invalid_arguments(format!(
                        "Expected {required} positional argument(s), got {}.",
                        args.len()
                    )));
                }
                Self::check_each(&schema.required, &args)?;
                Ok(ReshapedPositional::Fixed(args))
            }
            PositionalArity::Variadic {
                element,
                min_varargs,
                max_varargs,
            } => {
                if args.len() < required + min_varargs {
                    return Err(EvalError::invalid_arguments(format!(
                        "Expected at least {} positional argument(s), got {}.",
                        required + min_varargs,
                        args.len()
                    )));
                }
                if *max_varargs > 0 && args.len() > required + max_varargs {
                    return Err(EvalError::invalid_arguments(format!(
                        "Expected at most {} positional argument(s), got {}.",
                        required + max_varargs,
                        args.len()
                    )));
                }
                let mut iter = args.into_iter();
                let head: Vec<Value> = (&mut iter).take(required).collect();
                Self::check_each(&schema.required, &head)?;
                let tail: Vec<Value> = iter.collect();
                for (i, v) in tail.iter().enumerate() {
                    if !type_union_matches(element, v) {
                        return Err(EvalError::invalid_arguments(format!(
                            "Argument {} must be {}, got {}.",
                            required + i,
                            type_union_name(element),
                            v.type_name()
                        )));
                    }
                }
                Ok(ReshapedPositional::Variadic(head, tail))
            }
            PositionalArity::OptionalTail { optional } => {
                if args.len() < required || args.len() > required + optional.len() {
                    return Err(EvalError::invalid_arguments(format!(
                        "Expected {}..{} positional argument(s), got {}.",
                        required,
                        required + optional.len(),
                        args.len()
                    )));
                }
                let mut iter = args.into_iter();
                let head: Vec<Value> = (&mut iter).take(required).collect();
                Self::check_each(&schema.required, &head)?;
                let provided: Vec<Value> = iter.collect();
                let mut tail = Vec::with_capacity(optional.len());
                for (i, kinds) in optional.iter().enumerate() {
                    if let Some(v) = provided.get(i) {
                        if !type_union_matches(kinds, v) {
                            return Err(EvalError::invalid_arguments(format!(
                                "Argument {} must be {}, got {}.",
                                required + i,
                                type_union_name(kinds),
                                v.type_name()
                            )));
                        }
                        tail.push(Some(provided[i].clone()));
                    } else {
                        tail.push(None);
                    }
                }
                Ok(ReshapedPositional::OptionalTail(head, tail))
            }
        }
    }

    fn check_each(kinds: &[Vec<ValueKind>], args: &[Value]) -> EvalResult<()> {
        for (i, (expected, value)) in kinds.iter().zip(args.iter()).enumerate() {
            if !type_union_matches(expected, value) {
                return Err(EvalError::invalid_arguments(format!(
                    "Argument {i} must be {}, got {}.",
                    type_union_name(expected),
                    value.type_name()
                )));
            }
        }
        Ok(())
    }

    /// Validates and normalizes a keyword map in place against a schema,
    /// returning the feature-policy uses discovered (if any) for the caller
    /// to register. On return, every schema entry is present in `keyword`.
    pub fn check_keyword<'a>(
        schema: &'a [KwargInfo],
        keyword: &mut HashMap<String, Value>,
    ) -> EvalResult<Vec<KeywordUse<'a>>> {
        let known: std::collections::HashSet<&str> = schema.iter().map(|k| k.name.as_str()).collect();
        let unknown: Vec<String> = keyword
            .keys()
            .filter(|k| !known.contains(k.as_str()))
            .cloned()
            .collect();
        for name in unknown {
            tracing::warn!(keyword = %name, "unknown keyword argument dropped");
            keyword.remove(&name);
        }

        let mut uses = Vec::new();

        for entry in schema {
            let provided = keyword.remove(&entry.name);
            match provided {
                Some(mut value) => {
                    if let Some(version) = entry.since {
                        uses.push(KeywordUse {
                            keyword: &entry.name,
                            version,
                            kind: KeywordUseKind::New,
                        });
                    }
                    if let Some(version) = entry.deprecated {
                        uses.push(KeywordUse {
                            keyword: &entry.name,
                            version,
                            kind: KeywordUseKind::Deprecated,
                        });
                    }
                    if entry.listify {
                        if !matches!(value, Value::Array(_)) {
                            value = Value::array(vec![value]);
                        }
                    }
                    Self::check_keyword_value(entry, &value)?;
                    keyword.insert(entry.name.clone(), value);
                }
                None => {
                    if entry.required {
                        return Err(EvalError::invalid_arguments(format!(
                            "Missing required keyword argument \"{}\".",
                            entry.name
                        )));
                    }
                    if let Some(default) = &entry.default {
                        keyword.insert(entry.name.clone(), default.clone());
                    }
                }
            }
        }

        Ok(uses)
    }

    fn check_keyword_value(entry: &KwargInfo, value: &Value) -> EvalResult<()> {
        match &entry.kind {
            KwargType::Scalar(kinds) => {
                if !type_union_matches(kinds, value) {
                    return Err(EvalError::invalid_arguments(format!(
                        "Keyword argument \"{}\" must be {}, got {}.",
                        entry.name,
                        type_union_name(kinds),
                        value.type_name()
                    )));
                }
                Ok(())
            }
            KwargType::Container(info) => {
                if !info.container.matches(value) {
                    return Err(EvalError::invalid_arguments(format!(
                        "Keyword argument \"{}\" must be {}, got {}.",
                        entry.name,
                        info.container.name(),
                        value.type_name()
                    )));
                }
                let elements: Vec<&Value> = match value {
                    Value::Array(items) => items.iter().collect(),
                    Value::Dict(dict) => dict.iter().map(|(_, v)| v).collect(),
                    _ => vec![],
                };
                if !info.allow_empty && elements.is_empty() {
                    return Err(EvalError::invalid_arguments(format!(
                        "Keyword argument \"{}\" may not be empty.",
                        entry.name
                    )));
                }
                if info.pairs && elements.len() % 2 != 0 {
                    return Err(EvalError::invalid_arguments(format!(
                        "Keyword argument \"{}\" must contain an even number of elements.",
                        entry.name
                    )));
                }
                for element in elements {
                    if !type_union_matches(&info.contains, element) {
                        return Err(EvalError::invalid_arguments(format!(
                            "Element of keyword argument \"{}\" must be {}, got {}.",
                            entry.name,
                            type_union_name(&info.contains),
                            element.type_name()
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_arity_checks_types_and_count() {
        let schema = PositionalSchema {
            required: vec![vec![ValueKind::Str], vec![ValueKind::Integer]],
            arity: PositionalArity::Exact,
        };
        let ok = TypeChecker::check_positional(&schema, vec![Value::str("a"), Value::Integer(1)]);
        assert!(ok.is_ok());
        let bad = TypeChecker::check_positional(&schema, vec![Value::str("a")]);
        assert!(bad.is_err());
    }

    #[test]
    fn listify_wraps_scalar_into_single_element_array() {
        let schema = vec![KwargInfo {
            listify: true,
            ..KwargInfo::new("sources", KwargType::Container(ContainerTypeInfo {
                container: ValueKind::Array,
                contains: vec![ValueKind::Str],
                pairs: false,
                allow_empty: true,
            }))
        }];
        let mut keyword = HashMap::new();
        keyword.insert("sources".to_string(), Value::str("a.c"));
        TypeChecker::check_keyword(&schema, &mut keyword).unwrap();
        assert_eq!(keyword.get("sources"), Some(&Value::array(vec![Value::str("a.c")])));
    }

    #[test]
    fn missing_required_keyword_errors() {
        let schema = vec![KwargInfo {
            required: true,
            ..KwargInfo::new("name", KwargType::Scalar(vec![ValueKind::Str]))
        }];
        let mut keyword = HashMap::new();
        assert!(TypeChecker::check_keyword(&schema, &mut keyword).is_err());
    }

    #[test]
    fn unknown_keyword_is_dropped_not_rejected() {
        let schema: Vec<KwargInfo> = vec![];
        let mut keyword = HashMap::new();
        keyword.insert("mystery".to_string(), Value::Integer(1));
        let uses = TypeChecker::check_keyword(&schema, &mut keyword).unwrap();
        assert!(uses.is_empty());
        assert!(keyword.is_empty());
    }
}
