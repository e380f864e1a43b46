//! Canonical value → string formatting, used both by string concatenation
//! (`+`) and by any explicit stringification.

use crate::value::Value;

const HI_SCIENTIFIC_THRESHOLD: f64 = 1_000_000_000.0;
const LO_SCIENTIFIC_THRESHOLD: f64 = 0.000_001;

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Undefined => String::new(),
        Value::Error(e) => e.to_string(),
        Value::Char(c) => c.to_string(),
        Value::Bool(b) => {
            if *b { "true".to_string() } else { "false".to_string() }
        }
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::String(s) => s.as_str().to_string(),
        Value::Array(a) => {
            let parts: Vec<String> = a.iter().map(format_value).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Function(_) => "<function>".to_string(),
        Value::StackRef { .. } => "<ref>".to_string(),
        Value::OpRef(_) => "<opref>".to_string(),
    }
}

/// Decimal by default; scientific notation (`<mantissa>E<+|-><exp>`) once
/// the magnitude crosses the high/low thresholds.
fn format_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let mag = f.abs();
    if mag >= HI_SCIENTIFIC_THRESHOLD || mag < LO_SCIENTIFIC_THRESHOLD {
        let exp = mag.log10().floor() as i32;
        let mantissa = f / 10f64.powi(exp);
        format!("{}E{}{}", trim_trailing_zeros(mantissa), if exp >= 0 { "+" } else { "-" }, exp.abs())
    } else {
        trim_trailing_zeros(f)
    }
}

fn trim_trailing_zeros(f: f64) -> String {
    let s = format!("{:.6}", f);
    let s = s.trim_end_matches('0');
    let s = s.trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::SArray;

    #[test]
    fn bool_formats_as_true_false() {
        assert_eq!(format_value(&Value::Bool(true)), "true");
        assert_eq!(format_value(&Value::Bool(false)), "false");
    }

    #[test]
    fn array_formats_with_comma_space_separators() {
        let mut a = SArray::new();
        a.push(Value::Int(1));
        a.push(Value::Float(1.0));
        a.push(Value::String(crate::scstring::ScString::from_str("test")));
        assert_eq!(format_value(&Value::Array(a)), "[1, 1, test]");
    }

    #[test]
    fn large_float_uses_scientific_notation() {
        let s = format_value(&Value::Float(2_000_000_000.0));
        assert!(s.contains('E'));
    }
}
