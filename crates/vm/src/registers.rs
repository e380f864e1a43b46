//! The VM's fixed-size register file: four slots. Register 0 is the
//! implicit destination of several opcodes; the others are scratch space
//! the compiler allocates by convention (see `scripty-compiler::funcomp`'s
//! `emit_*` helpers).
//!
//! Each call frame gets its own fresh register file (see `vm::run`) — a
//! single shared file would let a callee's register writes clobber values
//! the caller still needs across a nested `FN_EVAL`.

use scripty_core::error::ScriptError;
use scripty_core::value::Value;

pub const REGISTER_COUNT: usize = 4;

#[derive(Debug, Clone)]
pub struct Registers {
    slots: [Value; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Self {
        Self {
            slots: [Value::Undefined, Value::Undefined, Value::Undefined, Value::Undefined],
        }
    }

    pub fn get(&self, index: i64) -> Result<&Value, ScriptError> {
        self.resolve(index).map(|i| &self.slots[i])
    }

    pub fn set(&mut self, index: i64, value: Value) -> Result<(), ScriptError> {
        let i = self.resolve(index)?;
        self.slots[i] = value;
        Ok(())
    }

    fn resolve(&self, index: i64) -> Result<usize, ScriptError> {
        if index < 0 || index as usize >= REGISTER_COUNT {
            return Err(ScriptError::range(format!("register index {index} out of range")));
        }
        Ok(index as usize)
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_registers_are_undefined() {
        let r = Registers::new();
        assert_eq!(r.get(0).unwrap(), &Value::Undefined);
    }

    #[test]
    fn out_of_range_index_is_a_range_error() {
        let r = Registers::new();
        assert!(r.get(4).is_err());
        assert!(r.get(-1).is_err());
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut r = Registers::new();
        r.set(2, Value::Int(7)).unwrap();
        assert_eq!(r.get(2).unwrap(), &Value::Int(7));
    }
}
