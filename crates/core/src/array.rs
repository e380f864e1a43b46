//! Heterogeneous growable array: a capacity, a size, and an informational
//! element-type hint. Element slots hold full tagged `Value`s, so an array
//! can freely mix types; `elem_type` is never enforced on insertion.

use crate::value::{Value, ValueTag};

#[derive(Debug, Clone, PartialEq)]
pub struct SArray {
    elems: Vec<Value>,
    /// Informational nominal element type, set when the array was produced
    /// by a declaration with a known element type. `None` for arrays built
    /// from a literal or from heterogeneous operations.
    elem_type: Option<ValueTag>,
}

impl SArray {
    pub fn new() -> Self {
        Self {
            elems: Vec::new(),
            elem_type: None,
        }
    }

    pub fn with_elem_type(elem_type: ValueTag) -> Self {
        Self {
            elems: Vec::new(),
            elem_type: Some(elem_type),
        }
    }

    pub fn from_vec(elems: Vec<Value>) -> Self {
        Self {
            elems,
            elem_type: None,
        }
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.elems.capacity()
    }

    pub fn elem_type(&self) -> Option<ValueTag> {
        self.elem_type
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elems.get(index)
    }

    pub fn set(&mut self, index: usize, value: Value) -> Option<Value> {
        let slot = self.elems.get_mut(index)?;
        Some(std::mem::replace(slot, value))
    }

    pub fn push(&mut self, value: Value) {
        self.elems.push(value);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elems.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.elems
    }

    /// A fresh, disjoint copy: element-wise equal to the original but owning
    /// independent heap payloads.
    pub fn deep_copy(&self) -> Self {
        Self {
            elems: self.elems.iter().map(Value::deep_copy).collect(),
            elem_type: self.elem_type,
        }
    }

    /// Python-style slicing with negative-wraparound, used by the indexing
    /// `name[start:end:step]` form in the function compiler.
    pub fn slice(&self, start: i64, end: i64, step: i64) -> Result<Vec<Value>, crate::error::ScriptError> {
        if step == 0 {
            return Err(crate::error::ScriptError::bad_val("slice step cannot be zero"));
        }
        let len = self.elems.len() as i64;
        let wrap = |i: i64| -> i64 {
            if i < 0 { (i + len).max(0) } else { i.min(len) }
        };
        let mut out = Vec::new();
        if step > 0 {
            let mut i = wrap(start);
            let end = wrap(end);
            while i < end {
                if i >= 0 && i < len {
                    out.push(self.elems[i as usize].clone());
                }
                i += step;
            }
        } else {
            let mut i = wrap(start).min(len - 1);
            let end = wrap(end);
            while i > end {
                if i >= 0 && i < len {
                    out.push(self.elems[i as usize].clone());
                }
                i += step;
            }
        }
        Ok(out)
    }
}

impl Default for SArray {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_copy_is_elementwise_equal_and_disjoint() {
        let mut a = SArray::new();
        a.push(Value::Int(1));
        a.push(Value::String(crate::scstring::ScString::from_str("x")));
        let b = a.deep_copy();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!(crate::value_ops::op_eq(x, y).unwrap_or(false));
        }
    }

    #[test]
    fn slice_honors_negative_wraparound() {
        let mut a = SArray::new();
        for i in 0..5 {
            a.push(Value::Int(i));
        }
        let s = a.slice(-3, 5, 1).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s[0], Value::Int(2));
    }
}
