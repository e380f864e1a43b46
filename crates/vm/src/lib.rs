//! `scripty-vm` — the fetch-decode-execute loop that walks a
//! `scripty_core::Function`'s instruction buffer against a shared
//! `scripty_core::Context`.

pub mod disasm;
pub mod registers;
pub mod vm;

pub use disasm::disassemble;
pub use registers::Registers;
pub use vm::{call_function, call_global, DEFAULT_MAX_CALL_DEPTH};
