//! End-to-end control-flow tests: if/elseif/else, foreach over each
//! container kind, and break/continue, run through `Interpreter::run`.

mod common;

use buildscript_lang::ast::{ArithOp, CompareOp, NodeKind};
use buildscript_lang::value::Value;
use buildscript_lang::InterpreterConfig;
use common::*;

fn program(stmts: Vec<buildscript_lang::ast::Node>) -> buildscript_lang::ast::Node {
    let mut full = vec![call("project", vec![string("demo")])];
    full.extend(stmts);
    block(full)
}

#[test]
fn if_elseif_else_picks_the_first_matching_clause() {
    let mut interp = interpreter_with_project(InterpreterConfig::default());
    let prog = program(vec![
        assign("n", int(20)),
        if_stmt(
            vec![
                (cmp(id("n"), CompareOp::Eq, int(50)), assign("result", string("*"))),
                (cmp(id("n"), CompareOp::Gt, int(10)), assign("result", string("+"))),
            ],
            Some(assign("result", string(" "))),
        ),
    ]);
    interp.run(&prog).unwrap();
    assert_eq!(interp.get_variable("result").unwrap(), Value::str("+"));
}

#[test]
fn if_else_falls_through_when_no_clause_matches() {
    let mut interp = interpreter_with_project(InterpreterConfig::default());
    let prog = program(vec![
        assign("n", int(5)),
        if_stmt(
            vec![(cmp(id("n"), CompareOp::Eq, int(50)), assign("result", string("*")))],
            Some(assign("result", string(" "))),
        ),
    ]);
    interp.run(&prog).unwrap();
    assert_eq!(interp.get_variable("result").unwrap(), Value::str(" "));
}

#[test]
fn disabler_condition_skips_just_that_clause() {
    // Per the Open Question resolution (DESIGN.md): a `Disabler` condition
    // disables only its own clause, falling through to the next one rather
    // than raising or short-circuiting the whole statement.
    let mut interp = interpreter_with_project(InterpreterConfig::default());
    interp.register_function(
        "maybe_disabled",
        std::rc::Rc::new(
            |_ctx: &mut buildscript_lang::dispatch::CallContext<'_>,
             _pos: Vec<Value>,
             _kw: std::collections::HashMap<String, Value>| Ok(Value::Disabler),
        ),
    );
    let prog = program(vec![if_stmt(
        vec![(call("maybe_disabled", vec![]), assign("result", string("unreachable")))],
        Some(assign("result", string("fell through"))),
    )]);
    interp.run(&prog).unwrap();
    assert_eq!(interp.get_variable("result").unwrap(), Value::str("fell through"));
}

#[test]
fn foreach_over_array_accumulates_a_sum() {
    let mut interp = interpreter_with_project(InterpreterConfig::default());
    let prog = program(vec![
        assign("total", int(0)),
        foreach(
            &["x"],
            array(vec![int(1), int(2), int(3)]),
            assign("total", arith(id("total"), ArithOp::Add, id("x"))),
        ),
    ]);
    interp.run(&prog).unwrap();
    assert_eq!(interp.get_variable("total").unwrap(), Value::Integer(6));
}

#[test]
fn foreach_break_stops_early() {
    let mut interp = interpreter_with_project(InterpreterConfig::default());
    let prog = program(vec![
        assign("last", int(-1)),
        foreach(
            &["x"],
            array(vec![int(1), int(2), int(3)]),
            block(vec![
                if_stmt(
                    vec![(cmp(id("x"), CompareOp::Eq, int(2)), buildscript_lang::ast::Node::new(
                        NodeKind::Break,
                        buildscript_lang::span::Location::unknown(),
                    ))],
                    None,
                ),
                assign("last", id("x")),
            ]),
        ),
    ]);
    interp.run(&prog).unwrap();
    assert_eq!(interp.get_variable("last").unwrap(), Value::Integer(1));
}

#[test]
fn foreach_continue_skips_the_body_remainder() {
    let mut interp = interpreter_with_project(InterpreterConfig::default());
    let prog = program(vec![
        assign("evens_sum", int(0)),
        foreach(
            &["x"],
            array(vec![int(1), int(2), int(3), int(4)]),
            block(vec![
                if_stmt(
                    vec![(
                        cmp(
                            arith(id("x"), ArithOp::Mod, int(2)),
                            CompareOp::NotEq,
                            int(0),
                        ),
                        buildscript_lang::ast::Node::new(NodeKind::Continue, buildscript_lang::span::Location::unknown()),
                    )],
                    None,
                ),
                assign("evens_sum", arith(id("evens_sum"), ArithOp::Add, id("x"))),
            ]),
        ),
    ]);
    interp.run(&prog).unwrap();
    assert_eq!(interp.get_variable("evens_sum").unwrap(), Value::Integer(6));
}

#[test]
fn foreach_over_dict_visits_keys_in_sorted_order() {
    let mut interp = interpreter_with_project(InterpreterConfig::default());
    let dict_node = buildscript_lang::ast::Node::new(
        NodeKind::Dict(buildscript_lang::ast::ArgumentNode::new(
            vec![],
            vec![
                (buildscript_lang::ast::KeyNode::Identifier("b".to_string()), int(2)),
                (buildscript_lang::ast::KeyNode::Identifier("a".to_string()), int(1)),
            ],
            false,
        )),
        buildscript_lang::span::Location::unknown(),
    );
    let prog = program(vec![
        assign("order", array(vec![])),
        foreach(
            &["k", "v"],
            dict_node,
            assign("order", arith(id("order"), ArithOp::Add, id("k"))),
        ),
    ]);
    interp.run(&prog).unwrap();
    assert_eq!(
        interp.get_variable("order").unwrap(),
        Value::array(vec![Value::str("a"), Value::str("b")])
    );
}
