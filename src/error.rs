//! Error taxonomy for the evaluator.
//!
//! Mirrors the three-way split the DSL draws between a generic interpreter
//! fault, an ill-formed program, and a call-site contract violation. Control
//! transfer (`continue`/`break`/early subdir exit) is a distinct type in
//! `crate::eval::control` and never flows through this hierarchy.

use crate::span::Location;

/// The kind of failure, independent of where it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Generic interpreter fault (bad operand to `not`/`and`/`or`, index
    /// doesn't support `__getitem__`, non-bool ternary condition, ...).
    Interpreter(String),
    /// The program itself is ill-formed: unknown statement kind, a
    /// type-impossible operation, an invalid assignment target.
    InvalidCode(String),
    /// A call-site contract was violated: arity, argument type, unknown
    /// required keyword, duplicate dict key, and so on.
    InvalidArguments(String),
}

impl ErrorKind {
    fn message(&self) -> &str {
        match self {
            ErrorKind::Interpreter(m) => m,
            ErrorKind::InvalidCode(m) => m,
            ErrorKind::InvalidArguments(m) => m,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ErrorKind::Interpreter(_) => "InterpreterException",
            ErrorKind::InvalidCode(_) => "InvalidCode",
            ErrorKind::InvalidArguments(_) => "InvalidArguments",
        }
    }
}

/// An [`ErrorKind`] paired with an optional source location.
///
/// `location` starts unset for errors raised deep inside expression
/// evaluation; the statement-boundary catch point in `crate::eval` fills it
/// in from the currently-executing AST node before letting it propagate
/// further, exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub kind: ErrorKind,
    pub location: Option<Location>,
}

impl EvalError {
    pub fn interpreter(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Interpreter(msg.into()),
            location: None,
        }
    }

    pub fn invalid_code(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidCode(msg.into()),
            location: None,
        }
    }

    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidArguments(msg.into()),
            location: None,
        }
    }

    /// Fill in a location if one hasn't already been attached. Called once,
    /// at the statement boundary.
    pub fn with_location_if_missing(mut self, location: &Location) -> Self {
        if self.location.is_none() {
            self.location = Some(location.clone());
        }
        self
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(loc) if !loc.is_unknown() => {
                write!(f, "{} at {}: {}", self.kind.label(), loc, self.kind.message())
            }
            _ => write!(f, "{}: {}", self.kind.label(), self.kind.message()),
        }
    }
}

impl std::error::Error for EvalError {}

pub type EvalResult<T> = Result<T, EvalError>;
