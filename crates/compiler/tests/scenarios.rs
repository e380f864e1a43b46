//! Integration tests for concrete scenarios and failure scenarios that
//! exercise the expression compiler end to end, through the crate's
//! public API rather than its internal test modules.

use scripty_compiler::{eval, gen_optree};
use scripty_core::error::ErrorKind;
use scripty_core::{NamedStack, Value};

fn eval_expr(src: &str) -> Value {
    let tree = gen_optree(src, None).expect("parse");
    eval(&tree, &NamedStack::new()).expect("eval")
}

#[test]
fn integer_arithmetic_with_parens() {
    assert_eq!(eval_expr("(7+2)-3"), Value::Int(6));
}

#[test]
fn mixed_float_int_precedence() {
    match eval_expr("17 - ((1.0 + 2.0) - 0.5)") {
        Value::Float(f) => assert!((f - 14.5).abs() < 1e-3),
        other => panic!("expected a float, got {other:?}"),
    }
}

#[test]
fn comparison_chain_or_and_and() {
    assert_eq!(eval_expr("(7+2 <= 3) || (7-5 <= 3)"), Value::Bool(true));
    assert_eq!(eval_expr("(7+2 <= 3) && (7-5 <= 3)"), Value::Bool(false));
}

#[test]
fn variable_substitution_against_named_stack() {
    let mut stack = NamedStack::new();
    stack.push("test_a", Value::Int(12));
    stack.push("test_b", Value::Int(24));
    let tree = gen_optree("(test_a + test_b) * test_b", Some(&stack)).expect("parse");
    assert_eq!(eval(&tree, &stack).expect("eval"), Value::Int(864));
}

#[test]
fn division_by_zero_is_bad_val() {
    let tree = gen_optree("1 / 0", None).expect("parse");
    let err = eval(&tree, &NamedStack::new()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadVal);
}

#[test]
fn unresolved_name_without_a_stack_is_a_syntax_error() {
    let err = gen_optree("undeclared_var + 1", None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax);
}
