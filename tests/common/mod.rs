//! Shared AST-construction helpers for the integration suite.
//!
//! There is no parser in this crate (see `src/ast.rs`): a real embedding
//! hands the interpreter the output of its own parser. These helpers stand
//! in for that parser, the same way the test suite builds `Node` values
//! directly instead of going through source text.

use std::collections::HashMap;
use std::rc::Rc;

use buildscript_lang::ast::{ArgumentNode, ArithOp, CompareOp, KeyNode, Node, NodeKind, NumberLiteral};
use buildscript_lang::dispatch::CallContext;
use buildscript_lang::error::EvalResult;
use buildscript_lang::span::Location;
use buildscript_lang::value::Value;
use buildscript_lang::{Interpreter, InterpreterConfig};

pub fn node(kind: NodeKind) -> Node {
    Node::new(kind, Location::unknown())
}

pub fn int(i: i64) -> Node {
    node(NodeKind::Number(NumberLiteral::Integer(i)))
}

pub fn string(s: &str) -> Node {
    node(NodeKind::String(Rc::from(s)))
}

pub fn boolean(b: bool) -> Node {
    node(NodeKind::Boolean(b))
}

pub fn id(name: &str) -> Node {
    node(NodeKind::Id(name.to_string()))
}

pub fn block(stmts: Vec<Node>) -> Node {
    node(NodeKind::CodeBlock(stmts))
}

pub fn assign(name: &str, expr: Node) -> Node {
    node(NodeKind::Assignment(name.to_string(), Box::new(expr)))
}

pub fn call(name: &str, positional: Vec<Node>) -> Node {
    node(NodeKind::Function(name.to_string(), ArgumentNode::new(positional, vec![], false)))
}

pub fn call_kw(name: &str, positional: Vec<Node>, keyword: Vec<(&str, Node)>) -> Node {
    let keyword = keyword
        .into_iter()
        .map(|(k, v)| (KeyNode::Identifier(k.to_string()), v))
        .collect();
    node(NodeKind::Function(name.to_string(), ArgumentNode::new(positional, keyword, false)))
}

pub fn method(receiver: Node, name: &str, positional: Vec<Node>) -> Node {
    node(NodeKind::Method(
        Box::new(receiver),
        name.to_string(),
        ArgumentNode::new(positional, vec![], false),
    ))
}

pub fn if_stmt(clauses: Vec<(Node, Node)>, else_block: Option<Node>) -> Node {
    node(NodeKind::If(clauses, else_block.map(Box::new)))
}

pub fn foreach(vars: &[&str], items: Node, body: Node) -> Node {
    node(NodeKind::Foreach(
        vars.iter().map(|v| v.to_string()).collect(),
        Box::new(items),
        Box::new(body),
    ))
}

pub fn cmp(lhs: Node, op: CompareOp, rhs: Node) -> Node {
    node(NodeKind::Comparison(Box::new(lhs), Box::new(rhs), op))
}

pub fn arith(lhs: Node, op: ArithOp, rhs: Node) -> Node {
    node(NodeKind::Arithmetic(Box::new(lhs), Box::new(rhs), op))
}

pub fn array(items: Vec<Node>) -> Node {
    node(NodeKind::Array(ArgumentNode::new(items, vec![], false)))
}

/// A minimal `project()` callable: sets the subproject's target version the
/// way a host's real `project()` would, from a `meson_version:` keyword.
fn project_callable(
    ctx: &mut CallContext<'_>,
    _positional: Vec<Value>,
    keyword: HashMap<String, Value>,
) -> EvalResult<Value> {
    if let Some(Value::Str(v)) = keyword.get("meson_version") {
        ctx.feature_policy.set_project_version(ctx.subproject, v.as_str().to_string());
    }
    Ok(Value::Bool(true))
}

/// Builds an interpreter with `project()` registered, ready to `run()` a
/// program whose first statement is a `project(...)` call.
pub fn interpreter_with_project(config: InterpreterConfig) -> Interpreter {
    init_tracing();
    let mut interp = Interpreter::new(config);
    interp.register_function("project", Rc::new(project_callable));
    interp
}

/// Routes `tracing::warn!`/etc. emitted during a test run to the test
/// harness's captured output. Safe to call from every test; only the first
/// call in the process actually installs the subscriber.
fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}
