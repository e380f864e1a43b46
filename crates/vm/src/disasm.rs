//! A listing printer for `scripty check`: walks the same control-word/
//! operand-word shapes `vm::run` decodes, but only formats them — it never
//! touches a `Context` or a register file.

use scripty_core::instr::{decode_control, InstructionBuffer, Opcode, OperandMode, Word};

/// Renders one line per instruction as `<word-index>: OPCODE(dst,src) words...`.
pub fn disassemble(code: &InstructionBuffer) -> String {
    let mut out = String::new();
    let mut ip = 0usize;
    while ip < code.len() {
        let start = ip;
        let Some(control) = code.get(ip).and_then(Word::as_int) else {
            out.push_str(&format!("{start}: <non-control word at this position>\n"));
            break;
        };
        ip += 1;
        let (opcode, dst_mode, src_mode) = decode_control(control);
        let operand_count = operand_word_count(opcode, dst_mode, src_mode);
        let mut operands = Vec::with_capacity(operand_count);
        for _ in 0..operand_count {
            match code.get(ip) {
                Some(word) => operands.push(format_word(word)),
                None => {
                    operands.push("<missing>".to_string());
                    break;
                }
            }
            ip += 1;
        }
        out.push_str(&format!(
            "{start:4}: {opcode:?}(dst={dst_mode:?}, src={src_mode:?}) {}\n",
            operands.join(" ")
        ));
    }
    out
}

/// How many operand words follow a control word for `opcode`, mirroring
/// exactly what `vm::run`'s handler for that opcode consumes. `MakePtr` and
/// `IndWrite` are mode-dependent (a `Global` operand spends one word on a
/// `GlobalKey` where a `Stack`/`Register` operand spends one word on an
/// int), but both shapes are a single word, so the count here doesn't need
/// to branch on mode.
fn operand_word_count(opcode: Opcode, _dst_mode: OperandMode, _src_mode: OperandMode) -> usize {
    match opcode {
        Opcode::Nop | Opcode::Return => 0,
        Opcode::Mov => 2,
        Opcode::Push | Opcode::Pop => 1,
        Opcode::OpEval => 3,
        Opcode::Jump => 1,
        Opcode::JumpCnd => 1,
        Opcode::FnEval => 1,
        Opcode::PtrDrf => 1,
        Opcode::GetSize => 1,
        Opcode::IndRead => 2,
        Opcode::IndWrite => 2,
        Opcode::MakePtr => 2,
        Opcode::MakeArr | Opcode::MakeStr => 1,
        Opcode::MakeVal => 2,
        Opcode::Ext | Opcode::FlOpen | Opcode::FlClose | Opcode::FlRead | Opcode::FlWrite => 0,
    }
}

fn format_word(word: &Word) -> String {
    match word {
        Word::Int(i) => i.to_string(),
        Word::Const(cell) => format!("const({:?})", cell.borrow()),
        Word::GlobalKey(key) => format!("global({key})"),
        Word::Func(_) => "func(...)".to_string(),
    }
}
