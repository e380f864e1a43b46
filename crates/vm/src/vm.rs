//! The dispatch loop: fetch a control word, branch on opcode plus
//! operand-mode bits, read operand words, perform the operation, advance
//! the instruction pointer by the consumed length; jumps replace the
//! instruction pointer; `RETURN` exits the loop; `FN_EVAL` recurses.
//!
//! `read_operand`/`write_operand` are the two generic helpers every
//! handler shares, rather than one match arm per opcode×mode combination.

use crate::registers::Registers;
use scripty_core::context::Resolution;
use scripty_core::instr::{decode_control, InstructionBuffer, Opcode, OperandMode, TreeOp, Word};
use scripty_core::value::{StackRef, Value, ValueTag};
use scripty_core::{value_ops, Context, Function, ScriptError, ScriptResult};
use std::rc::Rc;
use tracing::{debug, trace};

/// How deep a single call chain (nested `FN_EVAL`s) may go before the VM
/// gives up and reports `StackOverflow` rather than overflowing the native
/// Rust call stack.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 2_048;

/// Pushes `args` onto `ctx.stack` as the callee's frame, then executes
/// `func`. This is the entry point a driver (the CLI's `run` subcommand, or
/// a test) uses to invoke a top-level function.
pub fn call_function(ctx: &mut Context, func: &Function, args: Vec<Value>) -> ScriptResult<Vec<Value>> {
    if args.len() != func.n_args() {
        return Err(ScriptError::bad_val(format!(
            "function expects {} argument(s), got {}",
            func.n_args(),
            args.len()
        )));
    }
    for arg in args {
        ctx.stack.push(String::new(), arg);
    }
    run_function(ctx, func, 0)
}

/// Invokes `func` against whatever `func.n_args()` entries are already on
/// top of `ctx.stack` — the callee sees the caller's pushed arguments there.
/// Used both by `call_function` and by the VM's own `FN_EVAL` handling.
fn run_function(ctx: &mut Context, func: &Function, depth: usize) -> ScriptResult<Vec<Value>> {
    if depth >= DEFAULT_MAX_CALL_DEPTH {
        return Err(ScriptError::stack_overflow("maximum call depth exceeded"));
    }
    let frame_base = ctx
        .stack
        .len()
        .checked_sub(func.n_args())
        .ok_or_else(|| ScriptError::stack_underflow("not enough arguments on the stack for this call"))?;
    debug!(frame_base, n_args = func.n_args(), n_rets = func.n_rets(), "entering function frame");
    run(ctx, &func.code, frame_base, func.n_rets(), depth)
}

/// Frame-relative stack addressing: every `OperandMode::Stack` operand this
/// VM reads or writes is an offset from `frame_base`, not from the shared
/// stack's true bottom. `MAKE_PTR` stores an offset measured from bottom
/// (not top) so the reference survives subsequent pushes/pops, and
/// "bottom" means *this call frame's* bottom — a nested `FN_EVAL` compiles
/// its own body with slot numbers starting at 0, and those numbers must
/// resolve against the callee's own frame, not the whole program's stack.
fn absolute_slot(frame_base: usize, offset: i64) -> ScriptResult<i64> {
    let abs = frame_base as i64 + offset;
    if abs < 0 {
        return Err(ScriptError::range("stack slot resolves before frame base"));
    }
    Ok(abs)
}

fn next_word(code: &InstructionBuffer, ip: &mut usize) -> ScriptResult<Word> {
    let word = code
        .get(*ip)
        .cloned()
        .ok_or_else(|| ScriptError::range("instruction pointer ran past the end of the buffer"))?;
    *ip += 1;
    Ok(word)
}

fn next_int(code: &InstructionBuffer, ip: &mut usize) -> ScriptResult<i64> {
    next_word(code, ip)?
        .as_int()
        .ok_or_else(|| ScriptError::bad_type("expected an integer operand word"))
}

/// Reads one value per the operand resolution table, consuming exactly
/// one word from `code` at `*ip`.
fn read_operand(
    mode: OperandMode,
    code: &InstructionBuffer,
    ip: &mut usize,
    regs: &Registers,
    ctx: &Context,
    frame_base: usize,
) -> ScriptResult<Value> {
    match mode {
        OperandMode::Register => {
            let idx = next_int(code, ip)?;
            Ok(regs.get(idx)?.clone())
        }
        OperandMode::Stack => {
            let offset = next_int(code, ip)?;
            let slot = absolute_slot(frame_base, offset)?;
            Ok(ctx.stack.get(slot)?.clone())
        }
        OperandMode::Global => match next_word(code, ip)? {
            Word::GlobalKey(key) => ctx
                .globals
                .get(&key)
                .cloned()
                .ok_or_else(|| ScriptError::undef(format!("undefined global '{key}'"))),
            _ => Err(ScriptError::bad_type("expected a global-key operand word")),
        },
        OperandMode::Constant => match next_word(code, ip)? {
            Word::Const(cell) => Ok(cell.borrow().clone()),
            Word::Func(f) => Ok(Value::Function(f)),
            _ => Err(ScriptError::bad_type("expected a constant operand word")),
        },
    }
}

/// Writes one value per `mode`, consuming exactly one word — the write-side
/// counterpart to `read_operand`.
fn write_operand(
    mode: OperandMode,
    code: &InstructionBuffer,
    ip: &mut usize,
    regs: &mut Registers,
    ctx: &mut Context,
    frame_base: usize,
    value: Value,
) -> ScriptResult<()> {
    match mode {
        OperandMode::Register => {
            let idx = next_int(code, ip)?;
            regs.set(idx, value)
        }
        OperandMode::Stack => {
            let offset = next_int(code, ip)?;
            let slot = absolute_slot(frame_base, offset)?;
            *ctx.stack.get_mut(slot)? = value;
            Ok(())
        }
        OperandMode::Global => match next_word(code, ip)? {
            Word::GlobalKey(key) => {
                ctx.globals.insert(&key, value);
                Ok(())
            }
            _ => Err(ScriptError::bad_type("expected a global-key operand word")),
        },
        OperandMode::Constant => Err(ScriptError::bad_type("cannot write to a constant operand")),
    }
}

fn as_index(v: &Value) -> ScriptResult<i64> {
    match v {
        Value::Int(i) => Ok(*i),
        _ => Err(ScriptError::bad_type("array index must be an integer")),
    }
}

/// Executes `code` starting at instruction 0, addressing `Stack`-mode
/// operands relative to `frame_base`, until a `RETURN` is reached or an
/// error short-circuits the loop — the VM abandons the current function
/// on any non-success error.
fn run(ctx: &mut Context, code: &InstructionBuffer, frame_base: usize, n_rets: usize, depth: usize) -> ScriptResult<Vec<Value>> {
    let mut regs = Registers::new();
    let mut ip: usize = 0;

    loop {
        if ip >= code.len() {
            // Falling off the end without an explicit RETURN: treat as a
            // bare return of zero values, matching a function body whose
            // last statement wasn't `return`.
            return finish_frame(ctx, frame_base, Vec::new());
        }
        let control = next_int(code, &mut ip)?;
        let (opcode, dst_mode, src_mode) = decode_control(control);
        trace!(ip, ?opcode, "dispatch");

        match opcode {
            Opcode::Nop => {}

            Opcode::Mov => {
                let dst_idx = next_int(code, &mut ip)?;
                let value = read_operand(src_mode, code, &mut ip, &regs, ctx, frame_base)?;
                regs.set(dst_idx, value)?;
            }

            Opcode::Push => {
                let value = read_operand(dst_mode, code, &mut ip, &regs, ctx, frame_base)?;
                ctx.stack.push(String::new(), value);
            }

            Opcode::Pop => {
                let (_, value) = ctx.stack.pop()?;
                write_operand(dst_mode, code, &mut ip, &mut regs, ctx, frame_base, value)?;
            }

            Opcode::OpEval => {
                let reg_a = next_int(code, &mut ip)?;
                let reg_b = next_int(code, &mut ip)?;
                let op = TreeOp::from_i64(next_int(code, &mut ip)?)
                    .ok_or_else(|| ScriptError::bad_type("unrecognized tree operator code"))?;
                let a = regs.get(reg_a)?.clone();
                let result = if op.is_unary() {
                    apply_unary(op, &a)?
                } else {
                    let b = regs.get(reg_b)?.clone();
                    apply_binary(op, &a, &b)?
                };
                regs.set(0, result)?;
            }

            Opcode::Jump => {
                let target = next_int(code, &mut ip)?;
                ip = target as usize;
                continue;
            }

            Opcode::JumpCnd => {
                let target = next_int(code, &mut ip)?;
                let cond = regs.get(0)?.clone();
                if !value_ops::truthy(&cond)? {
                    ip = target as usize;
                    continue;
                }
            }

            Opcode::FnEval => {
                let callee = read_operand(dst_mode, code, &mut ip, &regs, ctx, frame_base)?;
                let Value::Function(func) = callee else {
                    return Err(ScriptError::bad_type("FN_EVAL target is not a function"));
                };
                // The callee's own RETURN leaves its results on top of
                // ctx.stack; the caller picks them up from there (a POP or
                // a further expression). Register 0 still gets the result
                // count, same as GET_SIZE/IND_READ/PTR_DRF's register-0
                // writes.
                let n_rets = func.n_rets();
                run_function(ctx, &func, depth + 1)?;
                regs.set(0, Value::Int(n_rets as i64))?;
            }

            Opcode::PtrDrf => {
                let reg_src = next_int(code, &mut ip)?;
                let target = regs.get(reg_src)?.clone();
                let Value::StackRef { target, .. } = target else {
                    return Err(ScriptError::bad_type("PTR_DRF target is not a stack-reference value"));
                };
                let value = match target {
                    StackRef::Slot(offset) => {
                        let slot = absolute_slot(frame_base, offset)?;
                        ctx.stack.get(slot)?.clone()
                    }
                    StackRef::Global(key) => ctx
                        .globals
                        .get(&key)
                        .cloned()
                        .ok_or_else(|| ScriptError::undef(format!("undefined global '{key}'")))?,
                };
                regs.set(0, value)?;
            }

            Opcode::GetSize => {
                let reg_src = next_int(code, &mut ip)?;
                let size = match regs.get(reg_src)? {
                    Value::Array(a) => a.len() as i64,
                    Value::String(s) => s.len() as i64,
                    _ => return Err(ScriptError::bad_type("GET_SIZE target is not an array or string")),
                };
                regs.set(0, Value::Int(size))?;
            }

            Opcode::IndRead => {
                let reg_arr = next_int(code, &mut ip)?;
                let reg_idx = next_int(code, &mut ip)?;
                let array = regs.get(reg_arr)?.clone();
                let Value::Array(arr) = array else {
                    return Err(ScriptError::bad_type("IND_READ target is not an array"));
                };
                let idx = as_index(regs.get(reg_idx)?)?;
                let value = resolve_index(&arr, idx)
                    .and_then(|i| arr.get(i).cloned())
                    .ok_or_else(|| ScriptError::bad_val(format!("index {idx} out of bounds")))?;
                regs.set(0, value)?;
            }

            Opcode::IndWrite => {
                let reg_idx = next_int(code, &mut ip)?;
                let idx = as_index(regs.get(reg_idx)?)?;
                let value = regs.get(0)?.clone();
                match dst_mode {
                    OperandMode::Stack => {
                        let offset = next_int(code, &mut ip)?;
                        let slot = absolute_slot(frame_base, offset)?;
                        let target = ctx.stack.get_mut(slot)?;
                        write_index(target, idx, value)?;
                    }
                    OperandMode::Global => {
                        let key = match next_word(code, &mut ip)? {
                            Word::GlobalKey(k) => k,
                            _ => return Err(ScriptError::bad_type("expected a global-key operand word")),
                        };
                        let target = ctx
                            .globals
                            .get_mut(&key)
                            .ok_or_else(|| ScriptError::undef(format!("undefined global '{key}'")))?;
                        write_index(target, idx, value)?;
                    }
                    _ => return Err(ScriptError::bad_type("IND_WRITE target must be a stack or global array")),
                }
            }

            Opcode::MakePtr => {
                let dst_reg = next_int(code, &mut ip)?;
                let target = match src_mode {
                    OperandMode::Stack => StackRef::Slot(next_int(code, &mut ip)?),
                    OperandMode::Global => match next_word(code, &mut ip)? {
                        Word::GlobalKey(key) => StackRef::Global(key),
                        _ => return Err(ScriptError::bad_type("expected a global-key operand word")),
                    },
                    _ => return Err(ScriptError::bad_type("MAKE_PTR source must be a stack slot or a global")),
                };
                regs.set(
                    dst_reg,
                    Value::StackRef {
                        target,
                        unresolved_name: false,
                    },
                )?;
            }

            Opcode::MakeArr => {
                let dst_reg = next_int(code, &mut ip)?;
                regs.set(dst_reg, Value::Array(scripty_core::array::SArray::new()))?;
            }

            Opcode::MakeStr => {
                let dst_reg = next_int(code, &mut ip)?;
                regs.set(dst_reg, Value::String(scripty_core::scstring::ScString::new()))?;
            }

            Opcode::MakeVal => {
                let dst_reg = next_int(code, &mut ip)?;
                let tag_word = next_int(code, &mut ip)?;
                let tag = tag_from_i64(tag_word).ok_or_else(|| ScriptError::bad_type("unrecognized value-tag code"))?;
                regs.set(dst_reg, Value::zero_for_tag(tag))?;
            }

            Opcode::Return => {
                let mut values = Vec::with_capacity(n_rets);
                for _ in 0..n_rets {
                    values.push(ctx.stack.pop()?.1);
                }
                values.reverse();
                return finish_frame(ctx, frame_base, values);
            }

            Opcode::Ext | Opcode::FlOpen | Opcode::FlClose | Opcode::FlRead | Opcode::FlWrite => {
                return Err(ScriptError::undef(format!("{opcode:?} is a reserved, unimplemented opcode")));
            }
        }
    }
}

/// Truncates the frame's locals away and leaves exactly `values` on top of
/// `ctx.stack`, in order — the net call-stack depth change equals
/// `n_rets - n_args`.
fn finish_frame(ctx: &mut Context, frame_base: usize, values: Vec<Value>) -> ScriptResult<Vec<Value>> {
    ctx.stack.truncate(frame_base);
    for v in &values {
        ctx.stack.push(String::new(), v.clone());
    }
    Ok(values)
}

fn resolve_index(arr: &scripty_core::array::SArray, idx: i64) -> Option<usize> {
    let len = arr.len() as i64;
    let real = if idx < 0 { idx + len } else { idx };
    if real < 0 || real >= len {
        None
    } else {
        Some(real as usize)
    }
}

fn write_index(target: &mut Value, idx: i64, value: Value) -> ScriptResult<()> {
    let Value::Array(arr) = target else {
        return Err(ScriptError::bad_type("IND_WRITE target is not an array"));
    };
    let real = resolve_index(arr, idx).ok_or_else(|| ScriptError::bad_val(format!("index {idx} out of bounds")))?;
    arr.set(real, value);
    Ok(())
}

fn apply_unary(op: TreeOp, a: &Value) -> ScriptResult<Value> {
    match op {
        TreeOp::Neg => value_ops::op_neg(a),
        TreeOp::Not => Ok(Value::Bool(value_ops::op_not(a)?)),
        _ => unreachable!("apply_unary called with a non-unary TreeOp"),
    }
}

fn apply_binary(op: TreeOp, a: &Value, b: &Value) -> ScriptResult<Value> {
    use value_ops::*;
    Ok(match op {
        TreeOp::Add => op_add(a, b)?,
        TreeOp::Sub => op_sub(a, b)?,
        TreeOp::Mul => op_mul(a, b)?,
        TreeOp::Div => op_div(a, b)?,
        TreeOp::Eq => Value::Bool(op_eq(a, b)?),
        TreeOp::Gt => Value::Bool(op_gt(a, b)?),
        TreeOp::Lt => Value::Bool(op_lt(a, b)?),
        TreeOp::Ge => Value::Bool(op_ge(a, b)?),
        TreeOp::Le => Value::Bool(op_le(a, b)?),
        TreeOp::And => Value::Bool(op_and(a, b)?),
        TreeOp::Or => Value::Bool(op_or(a, b)?),
        TreeOp::Neg | TreeOp::Not => unreachable!("apply_binary called with a unary TreeOp"),
    })
}

fn tag_from_i64(v: i64) -> Option<ValueTag> {
    Some(match v {
        0 => ValueTag::Undefined,
        1 => ValueTag::Error,
        2 => ValueTag::Char,
        3 => ValueTag::Bool,
        4 => ValueTag::Int,
        5 => ValueTag::Float,
        6 => ValueTag::String,
        7 => ValueTag::Array,
        8 => ValueTag::Function,
        9 => ValueTag::StackRef,
        10 => ValueTag::OpRef,
        _ => return None,
    })
}

/// Resolves `name` through `ctx` and invokes the function it names with
/// `args` — a convenience used by the CLI and by tests that want to call a
/// global-table function by name rather than holding an `Rc<Function>`.
pub fn call_global(ctx: &mut Context, name: &str, args: Vec<Value>) -> ScriptResult<Vec<Value>> {
    let resolution = ctx.lookup(name);
    let value = match resolution {
        Resolution::NotFound => return Err(ScriptError::undef(format!("undefined function '{name}'"))),
        _ => ctx.get(name).cloned().ok_or_else(|| ScriptError::undef(format!("undefined function '{name}'")))?,
    };
    let Value::Function(func) = value else {
        return Err(ScriptError::bad_type(format!("'{name}' is not a function")));
    };
    call_function(ctx, &func, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scripty_compiler::compile_function;

    fn compile(ctx: &mut Context, src: &str) -> Function {
        compile_function(ctx, src).unwrap()
    }

    #[test]
    fn integer_arithmetic_function_returns_expected_value() {
        let mut ctx = Context::new();
        let f = compile(&mut ctx, "(int a, int b) => (int) { int c = a+b; c = c+1; return c; }");
        let before = ctx.stack.len();
        let result = call_function(&mut ctx, &f, vec![Value::Int(3), Value::Int(4)]).unwrap();
        assert_eq!(result, vec![Value::Int(8)]);
        assert_eq!(ctx.stack.len() as i64 - before as i64, 1);
    }

    #[test]
    fn if_else_selects_the_right_branch() {
        let mut ctx = Context::new();
        let f = compile(
            &mut ctx,
            "(int a) => (int) { if (a > 0) { return 1; } else if (a < 0) { return -1; } else { return 0; } }",
        );
        assert_eq!(call_function(&mut ctx, &f, vec![Value::Int(5)]).unwrap(), vec![Value::Int(1)]);
        assert_eq!(call_function(&mut ctx, &f, vec![Value::Int(-5)]).unwrap(), vec![Value::Int(-1)]);
        assert_eq!(call_function(&mut ctx, &f, vec![Value::Int(0)]).unwrap(), vec![Value::Int(0)]);
    }

    #[test]
    fn while_loop_accumulates() {
        let mut ctx = Context::new();
        let f = compile(&mut ctx, "(int n) => (int) { int i = 0; int sum = 0; while (i < n) { sum = sum+i; i = i+1; } return sum; }");
        assert_eq!(call_function(&mut ctx, &f, vec![Value::Int(5)]).unwrap(), vec![Value::Int(10)]);
    }

    #[test]
    fn nested_function_call_via_globals() {
        let mut ctx = Context::new();
        let add = compile(&mut ctx, "(int a, int b) => (int) { return a+b; }");
        ctx.globals.insert("add", Value::Function(Rc::new(add)));
        let caller = compile(&mut ctx, "(int x) => (int) { return add(x, 10); }");
        assert_eq!(call_function(&mut ctx, &caller, vec![Value::Int(5)]).unwrap(), vec![Value::Int(15)]);
        assert_eq!(ctx.stack.len(), 0);
    }

    #[test]
    fn division_by_zero_is_bad_val_and_leaves_stack_consistent() {
        let mut ctx = Context::new();
        let f = compile(&mut ctx, "(int a, int b) => (int) { return a/b; }");
        let depth_before = ctx.stack.len();
        let err = call_function(&mut ctx, &f, vec![Value::Int(1), Value::Int(0)]).unwrap_err();
        assert_eq!(err.kind, scripty_core::error::ErrorKind::BadVal);
        // The fault abandons the frame; earlier state is untouched.
        assert_eq!(ctx.stack.len(), depth_before);
    }

    #[test]
    fn assignment_count_mismatch_is_rejected_at_compile_time() {
        let mut ctx = Context::new();
        let err = compile_function(&mut ctx, "(int a) => (int) { int b; a, b = 1; return a; }").unwrap_err();
        assert_eq!(err.kind, scripty_core::error::ErrorKind::BadVal);
    }

    #[test]
    fn call_global_resolves_by_name() {
        let mut ctx = Context::new();
        let double = compile(&mut ctx, "(int a) => (int) { return a*2; }");
        ctx.globals.insert("double", Value::Function(Rc::new(double)));
        assert_eq!(call_global(&mut ctx, "double", vec![Value::Int(21)]).unwrap(), vec![Value::Int(42)]);
    }

    #[test]
    fn ind_read_and_write_round_trip() {
        use scripty_core::instr::{cell, InstructionBuffer};
        // Hand-assembled body: push [1,2,3] as the function's one local,
        // write 99 at index 1 (IND_WRITE, array addressed by frame-relative
        // stack slot 0), then read index 1 back and return it.
        let mut ctx = Context::new();
        let mut buf = InstructionBuffer::new();
        let arr = Value::Array(scripty_core::array::SArray::from_vec(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
        buf.emit_control(Opcode::Push, OperandMode::Constant, OperandMode::Register);
        buf.emit_word(Word::Const(cell(arr)));

        buf.emit_control(Opcode::Mov, OperandMode::Register, OperandMode::Constant);
        buf.emit_int(2);
        buf.emit_word(Word::Const(cell(Value::Int(1)))); // reg2 = index 1
        buf.emit_control(Opcode::Mov, OperandMode::Register, OperandMode::Constant);
        buf.emit_int(0);
        buf.emit_word(Word::Const(cell(Value::Int(99)))); // reg0 = value to write

        buf.emit_control(Opcode::IndWrite, OperandMode::Stack, OperandMode::Register);
        buf.emit_int(2); // reg holding the index
        buf.emit_int(0); // frame-relative slot of the array local

        buf.emit_control(Opcode::Mov, OperandMode::Register, OperandMode::Stack);
        buf.emit_int(1);
        buf.emit_int(0); // reg1 = the array itself
        buf.emit_control(Opcode::IndRead, OperandMode::Register, OperandMode::Register);
        buf.emit_int(1);
        buf.emit_int(2); // reg0 = arr[1]

        buf.emit_control(Opcode::Push, OperandMode::Register, OperandMode::Register);
        buf.emit_int(0);
        buf.emit_control(Opcode::Return, OperandMode::Register, OperandMode::Register);

        let f = Function::new(vec![], vec![ValueTag::Int], buf);
        let result = call_function(&mut ctx, &f, vec![]).unwrap();
        assert_eq!(result, vec![Value::Int(99)]);
    }

    #[test]
    fn array_index_out_of_bounds_is_bad_val() {
        use scripty_core::instr::{cell, InstructionBuffer};
        let mut ctx = Context::new();
        let mut buf = InstructionBuffer::new();
        let arr = Value::Array(scripty_core::array::SArray::from_vec(vec![Value::Int(1)]));
        buf.emit_control(Opcode::Mov, OperandMode::Register, OperandMode::Constant);
        buf.emit_int(1);
        buf.emit_word(Word::Const(cell(arr)));
        buf.emit_control(Opcode::Mov, OperandMode::Register, OperandMode::Constant);
        buf.emit_int(2);
        buf.emit_word(Word::Const(cell(Value::Int(5))));
        buf.emit_control(Opcode::IndRead, OperandMode::Register, OperandMode::Register);
        buf.emit_int(1);
        buf.emit_int(2);
        buf.emit_control(Opcode::Return, OperandMode::Register, OperandMode::Register);
        let f = Function::new(vec![], vec![], buf);
        let err = call_function(&mut ctx, &f, vec![]).unwrap_err();
        assert_eq!(err.kind, scripty_core::error::ErrorKind::BadVal);
    }

    #[test]
    fn dereferencing_a_non_reference_value_is_bad_type() {
        use scripty_core::instr::{cell, InstructionBuffer};
        let mut ctx = Context::new();
        let mut buf = InstructionBuffer::new();
        buf.emit_control(Opcode::Mov, OperandMode::Register, OperandMode::Constant);
        buf.emit_int(1);
        buf.emit_word(Word::Const(cell(Value::Int(7))));
        buf.emit_control(Opcode::PtrDrf, OperandMode::Register, OperandMode::Register);
        buf.emit_int(1);
        buf.emit_control(Opcode::Return, OperandMode::Register, OperandMode::Register);
        let f = Function::new(vec![], vec![], buf);
        let err = call_function(&mut ctx, &f, vec![]).unwrap_err();
        assert_eq!(err.kind, scripty_core::error::ErrorKind::BadType);
    }

    #[test]
    fn reserved_file_io_opcode_is_undef() {
        let mut buf = InstructionBuffer::new();
        buf.emit_control(Opcode::FlOpen, OperandMode::Register, OperandMode::Register);
        let f = Function::new(vec![], vec![], buf);
        let mut ctx = Context::new();
        let err = call_function(&mut ctx, &f, vec![]).unwrap_err();
        assert_eq!(err.kind, scripty_core::error::ErrorKind::Undef);
    }
}
