//! The tagged `Value` type — the one unit of operand the VM ever moves
//! around.
//!
//! One variant per tag; the flag bits a packed tagged union would overlay
//! onto a shared word are instead explicit boolean fields on the reference
//! variants.

use crate::array::SArray;
use crate::error::ScriptError;
use crate::function::Function;
use crate::scstring::ScString;
use std::rc::Rc;

/// The `Valtype_e` analogue: one entry per `Value` variant, used for
/// declared argument/return types and informational array element hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTag {
    Undefined,
    Error,
    Char,
    Bool,
    Int,
    Float,
    String,
    Array,
    Function,
    StackRef,
    OpRef,
}

impl ValueTag {
    /// Parses one of the surface-syntax type names
    /// (`bool|char|int|float|string|array|func`). `array` correctly yields
    /// `ValueTag::Array` here, not `Float`.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Some(match name {
            "bool" => ValueTag::Bool,
            "char" => ValueTag::Char,
            "int" => ValueTag::Int,
            "float" => ValueTag::Float,
            "string" => ValueTag::String,
            "array" => ValueTag::Array,
            "func" => ValueTag::Function,
            _ => return None,
        })
    }
}

/// A reference to another value: either a bottom-relative call-stack slot
/// or a global-table key.
#[derive(Debug, Clone, PartialEq)]
pub enum StackRef {
    /// Offset from the bottom of the call stack that owns the slot.
    Slot(i64),
    /// A global variable, named by key.
    Global(Rc<str>),
}

#[derive(Debug, Clone)]
pub enum Value {
    /// Unresolved/empty value.
    Undefined,
    /// A failed operation's result, kept distinct from `Undefined` for
    /// clarity even though callers often treat both as "nothing useful".
    Error(ScriptError),
    Char(char),
    Bool(bool),
    Int(i64),
    Float(f64),
    String(ScString),
    Array(SArray),
    Function(Rc<Function>),
    StackRef {
        target: StackRef,
        /// Set when a name looked like an identifier but could not yet be
        /// resolved to a literal; lets a later pass retry resolution.
        unresolved_name: bool,
    },
    /// A leaf in an operation tree that refers to a named-stack slot,
    /// resolved against the stack supplied to `eval`.
    OpRef(usize),
}

/// Rust-level structural equality, used by tests and by container code
/// (e.g. hash table key comparison). This is deliberately distinct from
/// the language's `==` operator semantics in `value_ops::op_eq`, which
/// applies its own type coercions.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.as_slice() == b.as_slice(),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::StackRef { target: a, .. }, Value::StackRef { target: b, .. }) => a == b,
            (Value::OpRef(a), Value::OpRef(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Undefined => ValueTag::Undefined,
            Value::Error(_) => ValueTag::Error,
            Value::Char(_) => ValueTag::Char,
            Value::Bool(_) => ValueTag::Bool,
            Value::Int(_) => ValueTag::Int,
            Value::Float(_) => ValueTag::Float,
            Value::String(_) => ValueTag::String,
            Value::Array(_) => ValueTag::Array,
            Value::Function(_) => ValueTag::Function,
            Value::StackRef { .. } => ValueTag::StackRef,
            Value::OpRef(_) => ValueTag::OpRef,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn error(err: ScriptError) -> Self {
        Value::Error(err)
    }

    /// Primitives copy by value; heap payloads (string, array) are cloned
    /// independently so the result owns disjoint memory.
    pub fn deep_copy(&self) -> Self {
        match self {
            Value::Array(a) => Value::Array(a.deep_copy()),
            Value::String(s) => Value::String(s.clone()),
            other => other.clone(),
        }
    }

    /// The zero-initialized value for a declared type name — declarations
    /// push a new named slot already zero-initialized. Functions have no
    /// meaningful zero value; `Undefined` stands in until the slot is
    /// assigned.
    pub fn zero_for_tag(tag: ValueTag) -> Self {
        match tag {
            ValueTag::Bool => Value::Bool(false),
            ValueTag::Char => Value::Char('\0'),
            ValueTag::Int => Value::Int(0),
            ValueTag::Float => Value::Float(0.0),
            ValueTag::String => Value::String(ScString::new()),
            ValueTag::Array => Value::Array(SArray::new()),
            _ => Value::Undefined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_type_name_maps_to_array_tag_not_float() {
        assert_eq!(ValueTag::from_type_name("array"), Some(ValueTag::Array));
    }

    #[test]
    fn deep_copy_of_primitive_is_identical() {
        let v = Value::Int(42);
        match v.deep_copy() {
            Value::Int(42) => {}
            _ => panic!("expected Int(42)"),
        }
    }
}
