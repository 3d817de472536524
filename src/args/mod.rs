//! Argument reduction and type checking (§4.3, §4.4).

mod reduction;
mod type_checker;

pub use reduction::{reduce_arguments, ReducedArguments};
pub use type_checker::{
    ContainerTypeInfo, KeywordUse, KeywordUseKind, KwargInfo, KwargType, PositionalArity,
    PositionalSchema, ReshapedPositional, TypeChecker, ValueKind,
};
