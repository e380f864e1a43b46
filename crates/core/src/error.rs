//! Error kinds shared across the value model, compiler and VM.
//!
//! Every fallible operation returns one of these kinds plus a short,
//! bounded diagnostic message.

use std::fmt;

/// Maximum number of bytes kept in a [`ScriptError`] message before truncation.
pub const MAX_MSG_LEN: usize = 127;

/// Stable, externally visible error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No error occurred. Rarely constructed directly; most call sites use
    /// `Result::Ok` instead, but some APIs need a sentinel "no error" value.
    Success,
    /// Allocation failure (e.g. a requested capacity overflows `usize`).
    NoMem,
    /// Index, slice or buffer-size out of bounds.
    Range,
    /// Operation undefined for the operand type(s) involved.
    Undef,
    /// Parser could not recognize the input.
    Syntax,
    /// Value rejected by an operation (division by zero, unresolved name, ...).
    BadVal,
    /// Operand has a type the operation does not accept.
    BadType,
    /// A stack invariant (`top <= bottom`) would be violated by growth.
    StackOverflow,
    /// Pop or peek attempted on an empty stack region.
    StackUnderflow,
    /// Unexpected character encountered in a specific parser context.
    UnexpectChar,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Success => "success",
            ErrorKind::NoMem => "out of memory",
            ErrorKind::Range => "out of range",
            ErrorKind::Undef => "undefined operation",
            ErrorKind::Syntax => "syntax error",
            ErrorKind::BadVal => "bad value",
            ErrorKind::BadType => "bad type",
            ErrorKind::StackOverflow => "stack overflow",
            ErrorKind::StackUnderflow => "stack underflow",
            ErrorKind::UnexpectChar => "unexpected character",
        };
        f.write_str(s)
    }
}

/// A failed operation: a kind plus a bounded diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    pub kind: ErrorKind,
    message: String,
}

impl ScriptError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.len() > MAX_MSG_LEN {
            // Truncate on a char boundary so the message stays valid UTF-8.
            let mut end = MAX_MSG_LEN;
            while end > 0 && !message.is_char_boundary(end) {
                end -= 1;
            }
            message.truncate(end);
        }
        Self { kind, message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for ScriptError {}

/// Shorthand constructors, one per kind, used throughout core/compiler/vm.
macro_rules! error_ctor {
    ($name:ident, $kind:ident) => {
        impl ScriptError {
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        }
    };
}

error_ctor!(no_mem, NoMem);
error_ctor!(range, Range);
error_ctor!(undef, Undef);
error_ctor!(syntax, Syntax);
error_ctor!(bad_val, BadVal);
error_ctor!(bad_type, BadType);
error_ctor!(stack_overflow, StackOverflow);
error_ctor!(stack_underflow, StackUnderflow);
error_ctor!(unexpect_char, UnexpectChar);

pub type ScriptResult<T> = Result<T, ScriptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_truncated_and_stays_valid_utf8() {
        let long = "x".repeat(500);
        let err = ScriptError::bad_val(long);
        assert!(err.message().len() <= MAX_MSG_LEN);
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = ScriptError::syntax("unexpected token");
        assert_eq!(err.to_string(), "syntax error: unexpected token");
    }
}
