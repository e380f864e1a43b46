//! Binary/unary operator semantics for the language's `+`/`-`/`*`/`/`,
//! comparisons, and logical operators. Distinct from Rust's derived
//! `Value` equality used by containers and tests.

use crate::array::SArray;
use crate::error::ScriptError;
use crate::scstring::ScString;
use crate::value::Value;

/// `+`: numeric addition with int/float coercion, char+int yields char,
/// and any operand pairing with a string coerces the other side to its
/// canonical string form and concatenates.
pub fn op_add(a: &Value, b: &Value) -> Result<Value, ScriptError> {
    use Value::*;
    Ok(match (a, b) {
        (Int(x), Int(y)) => Int(x + y),
        (Float(x), Float(y)) => Float(x + y),
        (Int(x), Float(y)) | (Float(y), Int(x)) => Float(*x as f64 + y),
        (Char(c), Int(i)) | (Int(i), Char(c)) => {
            char::from_u32((*c as i64 + i) as u32)
                .map(Char)
                .ok_or_else(|| ScriptError::bad_val("char addition out of range"))?
        }
        (String(_), _) | (_, String(_)) => {
            String(ScString::from_str(&format!("{}{}", crate::format::format_value(a), crate::format::format_value(b))))
        }
        _ => return Err(ScriptError::bad_type("'+' not defined for these operand types")),
    })
}

pub fn op_sub(a: &Value, b: &Value) -> Result<Value, ScriptError> {
    use Value::*;
    Ok(match (a, b) {
        (Int(x), Int(y)) => Int(x - y),
        (Float(x), Float(y)) => Float(x - y),
        (Int(x), Float(y)) => Float(*x as f64 - y),
        (Float(x), Int(y)) => Float(x - *y as f64),
        (Char(c), Int(i)) => char::from_u32((*c as i64 - i) as u32)
            .map(Char)
            .ok_or_else(|| ScriptError::bad_val("char subtraction out of range"))?,
        _ => return Err(ScriptError::bad_type("'-' not defined for these operand types")),
    })
}

pub fn op_mul(a: &Value, b: &Value) -> Result<Value, ScriptError> {
    use Value::*;
    Ok(match (a, b) {
        (Int(x), Int(y)) => Int(x * y),
        (Float(x), Float(y)) => Float(x * y),
        (Int(x), Float(y)) | (Float(y), Int(x)) => Float(*x as f64 * y),
        _ => return Err(ScriptError::bad_type("'*' not defined for these operand types")),
    })
}

pub fn op_div(a: &Value, b: &Value) -> Result<Value, ScriptError> {
    use Value::*;
    Ok(match (a, b) {
        (Int(_), Int(0)) => return Err(ScriptError::bad_val("division by zero")),
        (Int(x), Int(y)) => Int(x / y),
        (Float(x), Float(y)) => {
            if *y == 0.0 {
                return Err(ScriptError::bad_val("division by zero"));
            }
            Float(x / y)
        }
        (Int(x), Float(y)) => {
            if *y == 0.0 {
                return Err(ScriptError::bad_val("division by zero"));
            }
            Float(*x as f64 / y)
        }
        (Float(x), Int(y)) => {
            if *y == 0 {
                return Err(ScriptError::bad_val("division by zero"));
            }
            Float(x / *y as f64)
        }
        _ => return Err(ScriptError::bad_type("'/' not defined for these operand types")),
    })
}

/// `==`: structural equality, except comparing an array against a
/// non-array (or element-wise mismatches inside a would-be array compare)
/// answers `false` rather than raising a type error — array comparisons
/// never error.
pub fn op_eq(a: &Value, b: &Value) -> Result<bool, ScriptError> {
    use Value::*;
    Ok(match (a, b) {
        (Array(x), Array(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|(e1, e2)| op_eq(e1, e2).unwrap_or(false))
        }
        (Array(_), _) | (_, Array(_)) => false,
        (Int(x), Float(y)) | (Float(y), Int(x)) => (*x as f64) == *y,
        (Bool(_), Int(_)) | (Int(_), Bool(_)) => truthy(a)? == truthy(b)?,
        _ => a == b,
    })
}

pub fn op_ne(a: &Value, b: &Value) -> Result<bool, ScriptError> {
    Ok(!op_eq(a, b)?)
}

/// `>`: numeric/char/string ordering. `<` and `<=` are sugar that swap
/// operands and dispatch to `>`/`>=`.
pub fn op_gt(a: &Value, b: &Value) -> Result<bool, ScriptError> {
    Ok(compare(a, b)?.is_gt())
}

pub fn op_ge(a: &Value, b: &Value) -> Result<bool, ScriptError> {
    Ok(!compare(a, b)?.is_lt())
}

pub fn op_lt(a: &Value, b: &Value) -> Result<bool, ScriptError> {
    op_gt(b, a)
}

pub fn op_le(a: &Value, b: &Value) -> Result<bool, ScriptError> {
    op_ge(b, a)
}

fn compare(a: &Value, b: &Value) -> Result<std::cmp::Ordering, ScriptError> {
    use Value::*;
    match (a, b) {
        (Int(x), Int(y)) => Ok(x.cmp(y)),
        (Float(x), Float(y)) => x.partial_cmp(y).ok_or_else(|| ScriptError::bad_val("NaN comparison")),
        (Int(x), Float(y)) => (*x as f64).partial_cmp(y).ok_or_else(|| ScriptError::bad_val("NaN comparison")),
        (Float(x), Int(y)) => x.partial_cmp(&(*y as f64)).ok_or_else(|| ScriptError::bad_val("NaN comparison")),
        (Char(x), Char(y)) => Ok(x.cmp(y)),
        (String(x), String(y)) => Ok(x.as_str().cmp(y.as_str())),
        _ => Err(ScriptError::bad_type("ordering not defined for these operand types")),
    }
}

/// `&&`/`||`: bools compare directly; ints coerce through "nonzero is
/// truthy".
pub fn op_and(a: &Value, b: &Value) -> Result<bool, ScriptError> {
    Ok(truthy(a)? && truthy(b)?)
}

pub fn op_or(a: &Value, b: &Value) -> Result<bool, ScriptError> {
    Ok(truthy(a)? || truthy(b)?)
}

pub fn op_not(a: &Value) -> Result<bool, ScriptError> {
    Ok(!truthy(a)?)
}

pub fn truthy(v: &Value) -> Result<bool, ScriptError> {
    match v {
        Value::Bool(b) => Ok(*b),
        Value::Int(i) => Ok(*i != 0),
        _ => Err(ScriptError::bad_type("operand is not bool/int-coercible")),
    }
}

/// Unary `-`: numeric negation only.
pub fn op_neg(a: &Value) -> Result<Value, ScriptError> {
    match a {
        Value::Int(i) => Ok(Value::Int(-i)),
        Value::Float(f) => Ok(Value::Float(-f)),
        _ => Err(ScriptError::bad_type("unary '-' not defined for this operand type")),
    }
}

/// Builds a fresh array by concatenating two sequences element-wise.
pub fn array_concat(a: &SArray, b: &SArray) -> SArray {
    let mut out: Vec<Value> = a.iter().cloned().collect();
    out.extend(b.iter().cloned());
    SArray::from_vec(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_coerces_int_and_float() {
        assert_eq!(op_add(&Value::Int(2), &Value::Float(0.5)).unwrap(), Value::Float(2.5));
    }

    #[test]
    fn add_rejects_array_plus_int() {
        let arr = Value::Array(SArray::new());
        assert!(op_add(&arr, &Value::Int(1)).is_err());
    }

    #[test]
    fn div_by_zero_is_bad_val() {
        let err = op_div(&Value::Int(1), &Value::Int(0)).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::BadVal);
    }

    #[test]
    fn array_equality_never_errors_on_type_mismatch() {
        let arr = Value::Array(SArray::new());
        assert_eq!(op_eq(&arr, &Value::Int(1)).unwrap(), false);
    }

    #[test]
    fn lt_is_swapped_gt() {
        assert!(op_lt(&Value::Int(1), &Value::Int(2)).unwrap());
        assert!(!op_lt(&Value::Int(2), &Value::Int(1)).unwrap());
    }

    #[test]
    fn string_concat_stringifies_other_operand() {
        let s = Value::String(ScString::from_str("n="));
        let v = op_add(&s, &Value::Int(3)).unwrap();
        assert_eq!(v, Value::String(ScString::from_str("n=3")));
    }

    #[test]
    fn string_concat_with_bool_and_array_coercion() {
        let greeting = Value::String(ScString::from_str("test "));
        assert_eq!(op_add(&greeting, &Value::Bool(true)).unwrap(), Value::String(ScString::from_str("test true")));

        let foo = Value::String(ScString::from_str("foo"));
        let arr = Value::Array(SArray::from_vec(vec![Value::Int(1), Value::Float(1.0), Value::String(ScString::from_str("test"))]));
        assert_eq!(op_add(&foo, &arr).unwrap(), Value::String(ScString::from_str("foo[1, 1, test]")));
    }
}
