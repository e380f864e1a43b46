//! `gen_optree`/`eval` — the expression compiler.
//!
//! Builds a left-leaning operation tree from an infix string in
//! root-last precedence order: the parser records the first top-level
//! occurrence of each operator class (logical, comparison, additive,
//! multiplicative) and splits at the *weakest* class that appeared,
//! recursing on both halves. Ties within a class resolve to the first
//! occurrence.

use scripty_core::value::{StackRef, Value};
use scripty_core::{read_value_string, NamedStack, ParsedLiteral, ScriptError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

/// A leaf either carries a literal value or an already-resolved reference
/// (a slot index) into the named stack supplied at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Literal(Value),
    StackSlot(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OpTree {
    Leaf(Leaf),
    Unary(UnOp, Box<OpTree>),
    Binary(BinOp, Box<OpTree>, Box<OpTree>),
}

/// Operator classes in root-last precedence order: weakest-binding first.
/// Longer operators are listed before their prefixes within a class
/// (`==`/`>=`/`<=` before `>`/`<`) so a greedy top-level scan never
/// mistakes `>=` for `>`.
const LOGICAL: &[&str] = &["||", "&&"];
const COMPARISON: &[&str] = &["==", ">=", "<=", ">", "<"];
const ADDITIVE: &[&str] = &["+", "-"];
const MULTIPLICATIVE: &[&str] = &["*", "/"];

pub fn gen_optree(source: &str, named_stack: Option<&NamedStack>) -> Result<OpTree, ScriptError> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(ScriptError::syntax("empty expression"));
    }

    for (ops, unary_skip) in [
        (LOGICAL, false),
        (COMPARISON, false),
        (ADDITIVE, true),
        (MULTIPLICATIVE, false),
    ] {
        if let Some((idx, len)) = find_top_level_op(trimmed, ops, unary_skip) {
            let left = &trimmed[..idx];
            let op_str = &trimmed[idx..idx + len];
            let right = &trimmed[idx + len..];
            let left_tree = gen_optree(left, named_stack)?;
            let right_tree = gen_optree(right, named_stack)?;
            return Ok(OpTree::Binary(binop_from_str(op_str), Box::new(left_tree), Box::new(right_tree)));
        }
    }

    parse_atom(trimmed, named_stack)
}

fn parse_atom(s: &str, named_stack: Option<&NamedStack>) -> Result<OpTree, ScriptError> {
    if let Some(inner) = crate::scan::strip_wrapping(s, '(', ')') {
        return gen_optree(inner, named_stack);
    }
    if let Some(rest) = s.strip_prefix('!') {
        return Ok(OpTree::Unary(UnOp::Not, Box::new(gen_optree(rest, named_stack)?)));
    }
    if let Some(rest) = s.strip_prefix('-') {
        return Ok(OpTree::Unary(UnOp::Neg, Box::new(gen_optree(rest, named_stack)?)));
    }
    if let Some(rest) = s.strip_prefix('+') {
        return gen_optree(rest, named_stack);
    }

    match read_value_string(s, None)? {
        ParsedLiteral::Value(v) => Ok(OpTree::Leaf(Leaf::Literal(v))),
        ParsedLiteral::UnresolvedName(name) => {
            let stack = named_stack.ok_or_else(|| ScriptError::syntax(format!("no named stack to resolve '{name}'")))?;
            let slot = stack
                .lookup(&name)
                .ok_or_else(|| ScriptError::syntax(format!("unresolved name '{name}'")))?;
            Ok(OpTree::Leaf(Leaf::StackSlot(slot)))
        }
    }
}

/// Finds the first top-level occurrence (outside `()`/`[]`/`{}` nesting and
/// quoted strings) of any operator in `ops`. When `unary_skip` is set,
/// a `+`/`-` at the very start of the scan or immediately following
/// another operator is treated as a sign and skipped, not as a split
/// candidate.
fn find_top_level_op(s: &str, ops: &[&str], unary_skip: bool) -> Option<(usize, usize)> {
    let chars: Vec<char> = s.chars().collect();
    let byte_offsets: Vec<usize> = s.char_indices().map(|(i, _)| i).chain([s.len()]).collect();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut prev_is_operand_end = false;
    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        if in_string {
            if c == '\\' {
                i += 2;
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                prev_is_operand_end = false;
                i += 1;
                continue;
            }
            '(' | '[' | '{' => {
                depth += 1;
                prev_is_operand_end = false;
                i += 1;
                continue;
            }
            ')' | ']' | '}' => {
                depth -= 1;
                prev_is_operand_end = true;
                i += 1;
                continue;
            }
            ' ' | '\t' | '\n' | '\r' => {
                i += 1;
                continue;
            }
            _ => {}
        }
        if depth == 0 {
            let mut matched = None;
            for op in ops {
                let op_len = op.chars().count();
                if i + op_len <= chars.len() && chars[i..i + op_len].iter().collect::<String>() == *op {
                    matched = Some((*op, op_len));
                    break;
                }
            }
            if let Some((op, op_len)) = matched {
                let is_sign = unary_skip && (op == "+" || op == "-") && !prev_is_operand_end;
                if !is_sign {
                    return Some((byte_offsets[i], byte_offsets[i + op_len] - byte_offsets[i]));
                }
            }
        }
        prev_is_operand_end = c.is_alphanumeric() || c == '_';
        i += 1;
    }
    None
}

fn binop_from_str(op: &str) -> BinOp {
    match op {
        "+" => BinOp::Add,
        "-" => BinOp::Sub,
        "*" => BinOp::Mul,
        "/" => BinOp::Div,
        "==" => BinOp::Eq,
        ">" => BinOp::Gt,
        "<" => BinOp::Lt,
        ">=" => BinOp::Ge,
        "<=" => BinOp::Le,
        "&&" => BinOp::And,
        "||" => BinOp::Or,
        other => unreachable!("unrecognized operator '{other}'"),
    }
}

/// Walks the tree, resolving `StackSlot` leaves against `stack` at eval
/// time.
pub fn eval(tree: &OpTree, stack: &NamedStack) -> Result<Value, ScriptError> {
    use scripty_core::value_ops::*;
    match tree {
        OpTree::Leaf(Leaf::Literal(v)) => Ok(v.clone()),
        OpTree::Leaf(Leaf::StackSlot(slot)) => stack.get(*slot as i64).cloned(),
        OpTree::Unary(UnOp::Neg, inner) => op_neg(&eval(inner, stack)?),
        OpTree::Unary(UnOp::Not, inner) => Ok(Value::Bool(op_not(&eval(inner, stack)?)?)),
        OpTree::Binary(op, left, right) => {
            let a = eval(left, stack)?;
            let b = eval(right, stack)?;
            Ok(match op {
                BinOp::Add => op_add(&a, &b)?,
                BinOp::Sub => op_sub(&a, &b)?,
                BinOp::Mul => op_mul(&a, &b)?,
                BinOp::Div => op_div(&a, &b)?,
                BinOp::Eq => Value::Bool(op_eq(&a, &b)?),
                BinOp::Gt => Value::Bool(op_gt(&a, &b)?),
                BinOp::Lt => Value::Bool(op_lt(&a, &b)?),
                BinOp::Ge => Value::Bool(op_ge(&a, &b)?),
                BinOp::Le => Value::Bool(op_le(&a, &b)?),
                BinOp::And => Value::Bool(op_and(&a, &b)?),
                BinOp::Or => Value::Bool(op_or(&a, &b)?),
            })
        }
    }
}

/// `StackRef`-carrying leaves are not produced by `gen_optree` itself (that
/// would require a preceding `&`-style reference operator, which this
/// expression grammar does not define) but the helper is kept here so the
/// function compiler can build one-off trees whose leaves already carry a
/// resolved global reference, sharing `eval`'s dispatch.
pub fn literal_ref(target: StackRef) -> Value {
    Value::StackRef {
        target,
        unresolved_name: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scripty_core::stack::NamedStack;

    fn eval_str(s: &str) -> Value {
        let tree = gen_optree(s, None).unwrap();
        let stack = NamedStack::new();
        eval(&tree, &stack).unwrap()
    }

    #[test]
    fn integer_arithmetic_with_parens() {
        assert_eq!(eval_str("(7+2)-3"), Value::Int(6));
    }

    #[test]
    fn mixed_float_int_precedence() {
        match eval_str("17 - ((1.0 + 2.0) - 0.5)") {
            Value::Float(f) => assert!((f - 14.5).abs() < 1e-3),
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[test]
    fn comparison_chain_or_and_and() {
        assert_eq!(eval_str("(7+2 <= 3) || (7-5 <= 3)"), Value::Bool(true));
        assert_eq!(eval_str("(7+2 <= 3) && (7-5 <= 3)"), Value::Bool(false));
    }

    #[test]
    fn unary_minus_is_distinguished_from_binary() {
        assert_eq!(eval_str("-5+3"), Value::Int(-2));
        assert_eq!(eval_str("3-5"), Value::Int(-2));
    }

    #[test]
    fn variable_substitution_against_named_stack() {
        let mut stack = NamedStack::new();
        stack.push("test_a", Value::Int(12));
        stack.push("test_b", Value::Int(24));
        let tree = gen_optree("(test_a + test_b) * test_b", Some(&stack)).unwrap();
        assert_eq!(eval(&tree, &stack).unwrap(), Value::Int(864));
    }

    #[test]
    fn unresolved_name_without_stack_is_syntax_error() {
        let err = gen_optree("foo + 1", None).unwrap_err();
        assert_eq!(err.kind, scripty_core::error::ErrorKind::Syntax);
    }

    #[test]
    fn weakest_class_splits_before_stronger_ones() {
        // && binds weaker than +, so the outer split must be on &&.
        let tree = gen_optree("1 + 2 && 3", None).unwrap();
        match tree {
            OpTree::Binary(BinOp::And, ..) => {}
            other => panic!("expected top-level &&, got {other:?}"),
        }
    }
}
