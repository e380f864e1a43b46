//! The function compiler: lowers a
//! `(args) => (rets) { body }` source into a `scripty_core::Function`.
//!
//! A small recursive-descent compiler that emits against the shared
//! `scripty-core` instruction encoding, built around two scoping
//! mechanisms that keep compile-time slot numbering and runtime stack
//! depth in lockstep:
//!
//! - nested `if`/`while`/`else` bodies pop every local they declared before
//!   falling through to the statement after the block, so a conditionally
//!   taken branch and its not-taken sibling leave the stack at the same
//!   depth at the join point;
//! - a function call's frame (every argument and top-level local pushed
//!   while compiling/running the callee) is trimmed back to its call-time
//!   base by the VM's `FN_EVAL` handling, leaving only the declared return
//!   values behind — not by instructions this compiler emits.

use crate::optree::{self, BinOp, Leaf, OpTree, UnOp};
use scripty_core::context::Resolution;
use scripty_core::instr::cell;
use scripty_core::value::ValueTag;
use scripty_core::{Context, Function, InstructionBuffer, Opcode, OperandMode, SArray, ScriptError, TreeOp, Value, Word};
use std::collections::HashMap;
use std::rc::Rc;

struct FuncCx<'a> {
    ctx: &'a mut Context,
    buf: InstructionBuffer,
    /// Names declared with a literal array initializer, tracked so
    /// `name[start:end:step]` slicing can be computed statically. Slicing
    /// is restricted to compile-time-known arrays.
    known_arrays: HashMap<String, SArray>,
}

impl FuncCx<'_> {
    fn emit_mov_reg_const(&mut self, reg: i64, value: Value) {
        self.buf.emit_control(Opcode::Mov, OperandMode::Register, OperandMode::Constant);
        self.buf.emit_int(reg);
        self.buf.emit_word(Word::Const(cell(value)));
    }

    fn emit_mov_reg_stack(&mut self, reg: i64, slot: i64) {
        self.buf.emit_control(Opcode::Mov, OperandMode::Register, OperandMode::Stack);
        self.buf.emit_int(reg);
        self.buf.emit_int(slot);
    }

    fn emit_mov_reg_global(&mut self, reg: i64, name: &str) {
        self.buf.emit_control(Opcode::Mov, OperandMode::Register, OperandMode::Global);
        self.buf.emit_int(reg);
        self.buf.emit_word(Word::GlobalKey(Rc::from(name)));
    }

    fn emit_mov_reg_reg(&mut self, dst: i64, src: i64) {
        self.buf.emit_control(Opcode::Mov, OperandMode::Register, OperandMode::Register);
        self.buf.emit_int(dst);
        self.buf.emit_int(src);
    }

    fn emit_push_reg(&mut self, reg: i64) {
        self.buf.emit_control(Opcode::Push, OperandMode::Register, OperandMode::Register);
        self.buf.emit_int(reg);
    }

    fn emit_push_const(&mut self, value: Value) {
        self.buf.emit_control(Opcode::Push, OperandMode::Constant, OperandMode::Register);
        self.buf.emit_word(Word::Const(cell(value)));
    }

    fn emit_pop_discard(&mut self) {
        self.buf.emit_control(Opcode::Pop, OperandMode::Register, OperandMode::Register);
        self.buf.emit_int(0);
    }

    fn emit_pop_stack(&mut self, slot: i64) {
        self.buf.emit_control(Opcode::Pop, OperandMode::Stack, OperandMode::Register);
        self.buf.emit_int(slot);
    }

    fn emit_pop_global(&mut self, name: &str) {
        self.buf.emit_control(Opcode::Pop, OperandMode::Global, OperandMode::Register);
        self.buf.emit_word(Word::GlobalKey(Rc::from(name)));
    }

    fn emit_op_eval(&mut self, reg_a: i64, reg_b: i64, op: TreeOp) {
        self.buf.emit_control(Opcode::OpEval, OperandMode::Register, OperandMode::Register);
        self.buf.emit_int(reg_a);
        self.buf.emit_int(reg_b);
        self.buf.emit_int(op as i64);
    }
}

/// Compiles one function source. Pushes argument slots onto `ctx.stack` for
/// the duration of compilation so the body can resolve their names, then
/// restores the stack to its pre-call depth on both success and failure.
pub fn compile_function(ctx: &mut Context, source: &str) -> Result<Function, ScriptError> {
    let source = source.trim();
    let arrow_idx = find_arrow(source).ok_or_else(|| ScriptError::syntax("missing '=>' in function source"))?;
    let args_text_raw = source[..arrow_idx].trim();
    let args_text = crate::scan::strip_wrapping(args_text_raw, '(', ')').unwrap_or(args_text_raw);

    let after_arrow = source[arrow_idx + 2..].trim_start();
    if !after_arrow.starts_with('(') {
        return Err(ScriptError::syntax("expected '(' to start the return-type list"));
    }
    let rets_close = crate::scan::find_matching(after_arrow, 0)
        .ok_or_else(|| ScriptError::syntax("unbalanced '(' in return-type list"))?;
    let rets_text = &after_arrow[1..rets_close];

    let after_rets = after_arrow[rets_close + 1..].trim_start();
    if !after_rets.starts_with('{') {
        return Err(ScriptError::syntax("expected '{' to start the function body"));
    }
    let body_close =
        crate::scan::find_matching(after_rets, 0).ok_or_else(|| ScriptError::syntax("unbalanced '{' in function body"))?;
    let body_text = &after_rets[1..body_close];

    let args = parse_param_list(args_text)?;
    let rets = parse_param_list(rets_text)?;

    let mark = ctx.stack.len();
    let mut arg_types = Vec::with_capacity(args.len());
    for (tag, name) in &args {
        ctx.stack.push(name.clone(), Value::zero_for_tag(*tag));
        arg_types.push(*tag);
    }
    let ret_types: Vec<ValueTag> = rets.iter().map(|(t, _)| *t).collect();

    let mut fc = FuncCx {
        ctx,
        buf: InstructionBuffer::new(),
        known_arrays: HashMap::new(),
    };
    let result = compile_body(&mut fc, body_text);
    let buf = fc.buf;
    fc.ctx.stack.truncate(mark);
    result?;

    Ok(Function::new(arg_types, ret_types, buf))
}

fn parse_param_list(s: &str) -> Result<Vec<(ValueTag, String)>, ScriptError> {
    let mut out = Vec::new();
    for piece in crate::scan::split_top_level(s, ',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let mut parts = piece.splitn(2, char::is_whitespace);
        let ty = parts.next().unwrap_or("");
        let name = parts.next().unwrap_or("").trim();
        let tag = ValueTag::from_type_name(ty).ok_or_else(|| ScriptError::syntax(format!("unknown type '{ty}'")))?;
        if name.is_empty() || !is_ident(name) {
            return Err(ScriptError::syntax("missing or invalid parameter name"));
        }
        out.push((tag, name.to_string()));
    }
    Ok(out)
}

fn find_arrow(s: &str) -> Option<usize> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut depth = 0i32;
    let mut in_string = false;
    for w in 0..chars.len() {
        let (idx, c) = chars[w];
        match c {
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth -= 1,
            '=' if !in_string && depth == 0 => {
                if let Some(&(_, '>')) = chars.get(w + 1) {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_') && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// `kw` matched as a whole word: `s` starts with it and the following byte
/// (if any) isn't an identifier continuation character.
fn strip_keyword<'a>(s: &'a str, kw: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(kw)?;
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(rest),
    }
}

fn extract_parenthesized(s: &str) -> Result<(&str, usize), ScriptError> {
    if !s.starts_with('(') {
        return Err(ScriptError::syntax("expected '('"));
    }
    let close = crate::scan::find_matching(s, 0).ok_or_else(|| ScriptError::syntax("unbalanced '('"))?;
    Ok((s[1..close].trim(), close + 1))
}

fn extract_braced(s: &str) -> Result<(&str, usize), ScriptError> {
    if !s.starts_with('{') {
        return Err(ScriptError::syntax("expected '{'"));
    }
    let close = crate::scan::find_matching(s, 0).ok_or_else(|| ScriptError::syntax("unbalanced '{'"))?;
    Ok((&s[1..close], close + 1))
}

fn is_decl(s: &str) -> bool {
    let first = s.split_whitespace().next().unwrap_or("");
    matches!(first, "bool" | "char" | "int" | "float" | "string" | "array" | "func")
}

/// Top-level single `=` (not `==`, `!=`, `<=`, `>=`) — the boundary between
/// an assignment's targets and its right-hand side.
fn find_assign_eq(s: &str) -> Option<usize> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut depth = 0i32;
    let mut in_string = false;
    for w in 0..chars.len() {
        let (idx, c) = chars[w];
        match c {
            '"' => in_string = !in_string,
            '(' | '[' | '{' if !in_string => depth += 1,
            ')' | ']' | '}' if !in_string => depth -= 1,
            '=' if !in_string && depth == 0 => {
                let prev = if w > 0 { Some(chars[w - 1].1) } else { None };
                let next = chars.get(w + 1).map(|&(_, c)| c);
                if next == Some('=') {
                    continue;
                }
                if matches!(prev, Some('!') | Some('<') | Some('>') | Some('=')) {
                    continue;
                }
                return Some(idx);
            }
            _ => {}
        }
    }
    None
}

fn compile_body(fc: &mut FuncCx, body: &str) -> Result<(), ScriptError> {
    let stmts = crate::scan::split_statements(body);
    let mut i = 0;
    while i < stmts.len() {
        let s = stmts[i].trim();
        if s.is_empty() {
            i += 1;
            continue;
        }
        if strip_keyword(s, "if").is_some() {
            i = compile_if_chain(fc, &stmts, i)?;
        } else if strip_keyword(s, "while").is_some() {
            i = compile_while(fc, &stmts, i)?;
        } else if strip_keyword(s, "return").is_some() {
            compile_return(fc, s)?;
            i += 1;
        } else if strip_keyword(s, "else").is_some() {
            return Err(ScriptError::syntax("'else' without a matching 'if'"));
        } else if is_decl(s) {
            compile_decl(fc, s)?;
            i += 1;
        } else if find_assign_eq(s).is_some() {
            compile_assign(fc, s)?;
            i += 1;
        } else {
            compile_call_stmt(fc, s)?;
            i += 1;
        }
    }
    Ok(())
}

/// Wraps a nested `if`/`while`/`else` body: pops every local it declared
/// before returning, so the stack depth after the block is the same
/// whether or not the block's code actually ran.
fn compile_block_scoped(fc: &mut FuncCx, body: &str) -> Result<(), ScriptError> {
    let mark = fc.ctx.stack.len();
    let result = compile_body(fc, body);
    match result {
        Ok(()) => {
            let depth = fc.ctx.stack.len();
            for _ in mark..depth {
                fc.emit_pop_discard();
            }
            fc.ctx.stack.truncate(mark);
            Ok(())
        }
        Err(e) => {
            fc.ctx.stack.truncate(mark);
            Err(e)
        }
    }
}

fn compile_decl(fc: &mut FuncCx, stmt: &str) -> Result<(), ScriptError> {
    let eq_idx = find_assign_eq(stmt);
    let (header, rhs) = match eq_idx {
        Some(i) => (stmt[..i].trim(), Some(stmt[i + 1..].trim())),
        None => (stmt.trim(), None),
    };
    let mut parts = header.splitn(2, char::is_whitespace);
    let ty = parts.next().unwrap_or("");
    let name = parts.next().unwrap_or("").trim();
    let tag = ValueTag::from_type_name(ty).ok_or_else(|| ScriptError::syntax(format!("unknown type '{ty}'")))?;
    if name.is_empty() || !is_ident(name) {
        return Err(ScriptError::syntax("invalid declaration: missing variable name"));
    }

    match rhs {
        Some(expr) => {
            if tag == ValueTag::Array {
                if let Ok(scripty_core::literal::ParsedLiteral::Value(Value::Array(arr))) =
                    scripty_core::read_value_string(expr, None)
                {
                    fc.known_arrays.insert(name.to_string(), arr);
                }
            }
            compile_expr_to_reg0(fc, expr)?;
            fc.emit_push_reg(0);
        }
        None => fc.emit_push_const(Value::zero_for_tag(tag)),
    }
    fc.ctx.stack.push(name, Value::zero_for_tag(tag));
    Ok(())
}

fn compile_assign(fc: &mut FuncCx, stmt: &str) -> Result<(), ScriptError> {
    let eq_idx = find_assign_eq(stmt).ok_or_else(|| ScriptError::syntax("assignment missing '='"))?;
    let lhs_text = stmt[..eq_idx].trim();
    let rhs_text = stmt[eq_idx + 1..].trim();
    let lhs_names: Vec<&str> = crate::scan::split_top_level(lhs_text, ',').into_iter().map(str::trim).collect();
    if lhs_names.iter().any(|n| n.is_empty() || !is_ident(n)) {
        return Err(ScriptError::syntax("invalid assignment target"));
    }

    let n_pushed = parse_rval(fc, rhs_text, false)?;
    if n_pushed != lhs_names.len() {
        return Err(ScriptError::bad_val(format!(
            "assignment expects {} value(s), right-hand side produced {}",
            lhs_names.len(),
            n_pushed
        )));
    }

    // Pop from the top down: the last-pushed value corresponds to the last
    // declared target.
    for name in lhs_names.iter().rev() {
        match fc.ctx.lookup(name) {
            Resolution::Stack(slot) => fc.emit_pop_stack(slot as i64),
            Resolution::Global | Resolution::NotFound => fc.emit_pop_global(name),
        }
    }
    Ok(())
}

fn compile_call_stmt(fc: &mut FuncCx, stmt: &str) -> Result<(), ScriptError> {
    let n = parse_rval(fc, stmt, false)?;
    for _ in 0..n {
        fc.emit_pop_discard();
    }
    Ok(())
}

fn compile_return(fc: &mut FuncCx, stmt: &str) -> Result<(), ScriptError> {
    let rest = strip_keyword(stmt, "return").unwrap_or(stmt).trim();
    if !rest.is_empty() {
        for e in crate::scan::split_top_level(rest, ',') {
            let e = e.trim();
            if e.is_empty() {
                continue;
            }
            compile_expr_to_reg0(fc, e)?;
            fc.emit_push_reg(0);
        }
    }
    fc.buf.emit_control(Opcode::Return, OperandMode::Register, OperandMode::Register);
    Ok(())
}

fn compile_if_chain(fc: &mut FuncCx, stmts: &[&str], i: usize) -> Result<usize, ScriptError> {
    let mut end_jumps = Vec::new();
    let mut i = compile_if_head(fc, stmts, i, &mut end_jumps, true)?;
    loop {
        if i >= stmts.len() {
            break;
        }
        let s = stmts[i].trim();
        let Some(after_else) = strip_keyword(s, "else") else {
            break;
        };
        let after_else = after_else.trim_start();
        if strip_keyword(after_else, "if").is_some() {
            i = compile_if_head(fc, stmts, i, &mut end_jumps, false)?;
        } else {
            let (body_text, _) = extract_braced(after_else)?;
            compile_block_scoped(fc, body_text)?;
            i += 1;
            break;
        }
    }
    let end = fc.buf.len() as i64;
    for w in end_jumps {
        fc.buf.patch_int(w, end);
    }
    Ok(i)
}

fn compile_if_head(
    fc: &mut FuncCx,
    stmts: &[&str],
    i: usize,
    end_jumps: &mut Vec<usize>,
    is_first: bool,
) -> Result<usize, ScriptError> {
    let s = stmts[i].trim();
    let after_kw = if is_first {
        strip_keyword(s, "if").ok_or_else(|| ScriptError::syntax("expected 'if'"))?
    } else {
        let after_else = strip_keyword(s, "else").ok_or_else(|| ScriptError::syntax("expected 'else'"))?;
        strip_keyword(after_else.trim_start(), "if").ok_or_else(|| ScriptError::syntax("expected 'if'"))?
    };
    let after_kw = after_kw.trim_start();
    let (cond_text, cond_end) = extract_parenthesized(after_kw)?;
    let after_cond = after_kw[cond_end..].trim_start();
    let (body_text, _) = extract_braced(after_cond)?;

    compile_expr_to_reg0(fc, cond_text)?;
    fc.buf.emit_control(Opcode::JumpCnd, OperandMode::Register, OperandMode::Register);
    let jf_word = fc.buf.len();
    fc.buf.emit_int(0);

    compile_block_scoped(fc, body_text)?;

    fc.buf.emit_control(Opcode::Jump, OperandMode::Register, OperandMode::Register);
    end_jumps.push(fc.buf.len());
    fc.buf.emit_int(0);

    fc.buf.patch_int(jf_word, fc.buf.len() as i64);
    Ok(i + 1)
}

fn compile_while(fc: &mut FuncCx, stmts: &[&str], i: usize) -> Result<usize, ScriptError> {
    let s = stmts[i].trim();
    let after_kw = strip_keyword(s, "while")
        .ok_or_else(|| ScriptError::syntax("expected 'while'"))?
        .trim_start();
    let (cond_text, cond_end) = extract_parenthesized(after_kw)?;
    let after_cond = after_kw[cond_end..].trim_start();
    let (body_text, _) = extract_braced(after_cond)?;

    let loop_start = fc.buf.len() as i64;
    compile_expr_to_reg0(fc, cond_text)?;
    fc.buf.emit_control(Opcode::JumpCnd, OperandMode::Register, OperandMode::Register);
    let jf_word = fc.buf.len();
    fc.buf.emit_int(0);

    compile_block_scoped(fc, body_text)?;

    fc.buf.emit_control(Opcode::Jump, OperandMode::Register, OperandMode::Register);
    fc.buf.emit_int(loop_start);

    fc.buf.patch_int(jf_word, fc.buf.len() as i64);
    Ok(i + 1)
}

fn compile_expr_to_reg0(fc: &mut FuncCx, expr: &str) -> Result<(), ScriptError> {
    let tree = optree::gen_optree(expr, Some(&fc.ctx.stack))?;
    emit_tree(fc, &tree)
}

fn emit_tree(fc: &mut FuncCx, tree: &OpTree) -> Result<(), ScriptError> {
    match tree {
        OpTree::Leaf(Leaf::Literal(v)) => fc.emit_mov_reg_const(0, v.clone()),
        OpTree::Leaf(Leaf::StackSlot(slot)) => fc.emit_mov_reg_stack(0, *slot as i64),
        OpTree::Unary(op, inner) => {
            emit_tree(fc, inner)?;
            let treeop = match op {
                UnOp::Neg => TreeOp::Neg,
                UnOp::Not => TreeOp::Not,
            };
            fc.emit_op_eval(0, 0, treeop);
        }
        OpTree::Binary(op, l, r) => {
            emit_tree(fc, l)?;
            fc.emit_mov_reg_reg(1, 0);
            emit_tree(fc, r)?;
            let treeop = match op {
                BinOp::Add => TreeOp::Add,
                BinOp::Sub => TreeOp::Sub,
                BinOp::Mul => TreeOp::Mul,
                BinOp::Div => TreeOp::Div,
                BinOp::Eq => TreeOp::Eq,
                BinOp::Gt => TreeOp::Gt,
                BinOp::Lt => TreeOp::Lt,
                BinOp::Ge => TreeOp::Ge,
                BinOp::Le => TreeOp::Le,
                BinOp::And => TreeOp::And,
                BinOp::Or => TreeOp::Or,
            };
            fc.emit_op_eval(1, 0, treeop);
        }
    }
    Ok(())
}

fn try_parse_call(s: &str) -> Option<(&str, &str)> {
    let s = s.trim();
    if !s.ends_with(')') {
        return None;
    }
    let open = s.find('(')?;
    let name = s[..open].trim();
    if name.is_empty() || !is_ident(name) {
        return None;
    }
    let close = crate::scan::find_matching(s, open)?;
    if close != s.len() - 1 {
        return None;
    }
    Some((name, &s[open + 1..close]))
}

fn try_parse_index(s: &str) -> Option<(&str, &str)> {
    let s = s.trim();
    if !s.ends_with(']') {
        return None;
    }
    let open = s.find('[')?;
    let name = s[..open].trim();
    if name.is_empty() || !is_ident(name) {
        return None;
    }
    let close = crate::scan::find_matching(s, open)?;
    if close != s.len() - 1 {
        return None;
    }
    Some((name, &s[open + 1..close]))
}

/// Lowers one right-hand-side expression: a function call, an indexing
/// expression, or a plain operation-tree expression. Leaves its results on
/// top of `ctx.stack` and returns how many values were pushed.
fn parse_rval(fc: &mut FuncCx, expr: &str, force_single_return: bool) -> Result<usize, ScriptError> {
    let expr = expr.trim();

    if let Some((name, args_text)) = try_parse_call(expr) {
        let callee = fc
            .ctx
            .get(name)
            .cloned()
            .ok_or_else(|| ScriptError::undef(format!("unknown function '{name}'")))?;
        let Value::Function(func) = callee else {
            return Err(ScriptError::bad_type(format!("'{name}' is not callable")));
        };
        let arg_exprs: Vec<&str> = crate::scan::split_top_level(args_text, ',')
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if arg_exprs.len() != func.n_args() {
            return Err(ScriptError::bad_val(format!(
                "'{name}' expects {} argument(s), got {}",
                func.n_args(),
                arg_exprs.len()
            )));
        }
        for a in &arg_exprs {
            let n = parse_rval(fc, a, true)?;
            if n != 1 {
                return Err(ScriptError::bad_val("call argument must produce exactly one value"));
            }
        }
        match fc.ctx.lookup(name) {
            Resolution::Stack(slot) => {
                fc.buf.emit_control(Opcode::FnEval, OperandMode::Stack, OperandMode::Register);
                fc.buf.emit_int(slot as i64);
            }
            _ => {
                fc.buf.emit_control(Opcode::FnEval, OperandMode::Global, OperandMode::Register);
                fc.buf.emit_word(Word::GlobalKey(Rc::from(name)));
            }
        }
        let n_rets = func.n_rets();
        if force_single_return && n_rets != 1 {
            return Err(ScriptError::bad_val(format!(
                "'{name}' must return exactly one value in this position"
            )));
        }
        return Ok(n_rets);
    }

    if let Some((name, index_text)) = try_parse_index(expr) {
        return parse_index_expr(fc, name, index_text);
    }

    compile_expr_to_reg0(fc, expr)?;
    fc.emit_push_reg(0);
    Ok(1)
}

fn parse_index_expr(fc: &mut FuncCx, name: &str, index_text: &str) -> Result<usize, ScriptError> {
    let parts = crate::scan::split_top_level(index_text, ':');
    if parts.len() > 1 {
        let arr = fc
            .known_arrays
            .get(name)
            .cloned()
            .ok_or_else(|| ScriptError::bad_val(format!("slice of '{name}' requires a compile-time-known array literal")))?;
        let parse_bound = |s: &str, default: i64| -> Result<i64, ScriptError> {
            let t = s.trim();
            if t.is_empty() {
                Ok(default)
            } else {
                t.parse::<i64>().map_err(|_| ScriptError::syntax("slice bound must be a literal integer"))
            }
        };
        let start = parse_bound(parts[0], 0)?;
        let end = parse_bound(parts.get(1).copied().unwrap_or(""), arr.len() as i64)?;
        let step = if parts.len() > 2 { parse_bound(parts[2], 1)? } else { 1 };
        let elems = arr.slice(start, end, step)?;
        let n = elems.len();
        for e in elems {
            fc.emit_push_const(e);
        }
        Ok(n)
    } else {
        match fc.ctx.lookup(name) {
            Resolution::Stack(slot) => fc.emit_mov_reg_stack(1, slot as i64),
            Resolution::Global => fc.emit_mov_reg_global(1, name),
            Resolution::NotFound => return Err(ScriptError::undef(format!("unknown variable '{name}'"))),
        }
        compile_expr_to_reg0(fc, index_text)?;
        fc.emit_mov_reg_reg(2, 0);
        fc.buf.emit_control(Opcode::IndRead, OperandMode::Register, OperandMode::Register);
        fc.buf.emit_int(1);
        fc.buf.emit_int(2);
        fc.emit_push_reg(0);
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_simple_add_and_assign_function() {
        let mut ctx = Context::new();
        let f = compile_function(&mut ctx, "(int a, int b) => (int) { int c = a+b; c = c+1; return c; }").unwrap();
        assert_eq!(f.n_args(), 2);
        assert_eq!(f.n_rets(), 1);
        assert!(!f.code.is_empty());
        // make_function's cleanup must leave the context's stack untouched.
        assert_eq!(ctx.stack.len(), 0);
    }

    #[test]
    fn rejects_unknown_type_name() {
        let mut ctx = Context::new();
        let err = compile_function(&mut ctx, "(weird a) => (int) { return a; }").unwrap_err();
        assert_eq!(err.kind, scripty_core::error::ErrorKind::Syntax);
    }

    #[test]
    fn array_type_name_compiles_to_array_tag() {
        let mut ctx = Context::new();
        let f = compile_function(&mut ctx, "(array a) => (int) { return 0; }").unwrap();
        assert_eq!(f.arg_types[0], ValueTag::Array);
    }

    #[test]
    fn if_else_chain_compiles_and_restores_stack() {
        let mut ctx = Context::new();
        let f = compile_function(
            &mut ctx,
            "(int a) => (int) { if (a > 0) { int t = 1; return t; } else if (a < 0) { return -1; } else { return 0; } }",
        )
        .unwrap();
        assert_eq!(f.n_args(), 1);
        assert_eq!(ctx.stack.len(), 0);
    }

    #[test]
    fn while_loop_compiles() {
        let mut ctx = Context::new();
        let f = compile_function(
            &mut ctx,
            "(int n) => (int) { int i = 0; while (i < n) { i = i+1; } return i; }",
        )
        .unwrap();
        assert_eq!(f.n_rets(), 1);
    }

    #[test]
    fn call_with_wrong_argument_count_is_bad_val() {
        let mut ctx = Context::new();
        let add = compile_function(&mut ctx, "(int a, int b) => (int) { return a+b; }").unwrap();
        ctx.globals.insert("add", Value::Function(Rc::new(add)));
        let err = compile_function(&mut ctx, "(int x) => (int) { return add(x); }").unwrap_err();
        assert_eq!(err.kind, scripty_core::error::ErrorKind::BadVal);
    }

    #[test]
    fn assignment_count_mismatch_is_bad_val() {
        let mut ctx = Context::new();
        let err = compile_function(&mut ctx, "(int a) => (int) { int b; a, b = 1; return a; }").unwrap_err();
        assert_eq!(err.kind, scripty_core::error::ErrorKind::BadVal);
    }
}
