//! Literal parsing — `read_value_string` infers or coerces one literal's
//! runtime value from its surface-syntax text.

use crate::array::SArray;
use crate::error::ScriptError;
use crate::scstring::ScString;
use crate::value::{Value, ValueTag};

/// Result of parsing one literal: either a concrete value, or an
/// identifier-looking token that a later compiler pass should try to
/// resolve against a named stack (the "unresolved-name" flag).
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLiteral {
    Value(Value),
    UnresolvedName(String),
}

/// Parses one literal from `input`. With `hint = None` the type is
/// inferred; with a hint, coercion is forced.
pub fn read_value_string(input: &str, hint: Option<ValueTag>) -> Result<ParsedLiteral, ScriptError> {
    let trimmed = input.trim();
    match hint {
        Some(ValueTag::Bool) => parse_bool(trimmed).map(ParsedLiteral::Value),
        Some(ValueTag::Int) => parse_numeric(trimmed).map(ParsedLiteral::Value),
        Some(ValueTag::Char) => parse_numeric(trimmed).map(|v| match v {
            Value::Int(i) => ParsedLiteral::Value(Value::Char(char::from_u32(i as u32).unwrap_or('\0'))),
            other => ParsedLiteral::Value(other),
        }),
        Some(ValueTag::Float) => trimmed
            .parse::<f64>()
            .map(|f| ParsedLiteral::Value(Value::Float(f)))
            .map_err(|_| ScriptError::bad_val(format!("invalid float literal '{trimmed}'"))),
        Some(ValueTag::String) => Ok(ParsedLiteral::Value(Value::String(ScString::from_str(trimmed)))),
        Some(ValueTag::Array) => parse_array_body(strip_brackets(trimmed).unwrap_or(trimmed)).map(ParsedLiteral::Value),
        Some(other) => Err(ScriptError::bad_type(format!("unsupported literal hint {other:?}"))),
        None => infer(trimmed),
    }
}

fn infer(trimmed: &str) -> Result<ParsedLiteral, ScriptError> {
    if trimmed.is_empty() {
        return Err(ScriptError::syntax("empty literal"));
    }
    if trimmed.starts_with('"') {
        let content = parse_quoted(trimmed)?;
        return Ok(ParsedLiteral::Value(Value::String(ScString::from_str(&content))));
    }
    if trimmed.starts_with('[') {
        let body = strip_brackets(trimmed).ok_or_else(|| ScriptError::syntax("unbalanced '['"))?;
        return parse_array_body(body).map(ParsedLiteral::Value);
    }
    if let Ok(v) = parse_numeric(trimmed) {
        return Ok(ParsedLiteral::Value(v));
    }
    if is_identifier(trimmed) {
        return Ok(ParsedLiteral::UnresolvedName(trimmed.to_string()));
    }
    Err(ScriptError::syntax(format!("unrecognized literal '{trimmed}'")))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn parse_bool(s: &str) -> Result<Value, ScriptError> {
    match s {
        "1" | "true" => Ok(Value::Bool(true)),
        "0" | "false" => Ok(Value::Bool(false)),
        other => Err(ScriptError::syntax(format!("unrecognized keyword {other}"))),
    }
}

/// Integer/float literal acceptance: optional sign,
/// `0x`/`0X` hex, `0b`/`0B` binary, leading `0` with further digits octal,
/// otherwise decimal; `.` or `e`/`E` switches to float.
fn parse_numeric(s: &str) -> Result<Value, ScriptError> {
    if s.is_empty() {
        return Err(ScriptError::syntax("empty numeric literal"));
    }
    let negative = s.starts_with('-');
    let unsigned = s.trim_start_matches(['+', '-']);
    if unsigned.is_empty() {
        return Err(ScriptError::syntax("missing digits after sign"));
    }

    let looks_float = unsigned.contains('.') || unsigned.to_ascii_lowercase().contains('e');
    if looks_float {
        return s
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ScriptError::bad_val(format!("invalid float literal '{s}'")));
    }

    let (base, body) = if let Some(b) = unsigned.strip_prefix("0x").or_else(|| unsigned.strip_prefix("0X")) {
        (16, b)
    } else if let Some(b) = unsigned.strip_prefix("0b").or_else(|| unsigned.strip_prefix("0B")) {
        (2, b)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };
    if body.is_empty() {
        return Err(ScriptError::syntax("missing digits"));
    }
    let magnitude = i64::from_str_radix(body, base)
        .map_err(|_| ScriptError::bad_val(format!("invalid integer literal '{s}'")))?;
    Ok(Value::Int(if negative { -magnitude } else { magnitude }))
}

/// Extracts the content between a leading `"` and its matching unescaped
/// closing `"`, applying `\n`, `\t`, `\\`, `\"` escapes.
fn parse_quoted(s: &str) -> Result<String, ScriptError> {
    let mut chars = s.char_indices();
    let (_, open) = chars.next().ok_or_else(|| ScriptError::syntax("empty string literal"))?;
    debug_assert_eq!(open, '"');
    let mut out = String::new();
    let mut escaped = false;
    for (_, c) in chars {
        if escaped {
            out.push(match c {
                'n' => '\n',
                't' => '\t',
                '\\' => '\\',
                '"' => '"',
                other => other,
            });
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => return Ok(out),
            other => out.push(other),
        }
    }
    Err(ScriptError::unexpect_char("unterminated string literal"))
}

/// Strips one leading `[`/`(` and its balanced closing bracket, returning
/// the interior text. Returns `None` if the brackets don't balance.
fn strip_brackets(s: &str) -> Option<&str> {
    let s = s.trim();
    let (open, close) = (s.chars().next()?, matching_close(s.chars().next()?)?);
    let mut depth = 0i32;
    let mut in_string = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_string = !in_string,
            c if !in_string && c == open => depth += 1,
            c if !in_string && c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[1..i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn matching_close(open: char) -> Option<char> {
    match open {
        '[' => Some(']'),
        '(' => Some(')'),
        '{' => Some('}'),
        _ => None,
    }
}

fn parse_array_body(body: &str) -> Result<Value, ScriptError> {
    let mut arr = SArray::new();
    for token in split_top_level_commas(body) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match read_value_string(token, None)? {
            ParsedLiteral::Value(v) => arr.push(v),
            ParsedLiteral::UnresolvedName(name) => {
                return Err(ScriptError::bad_val(format!(
                    "unresolved name '{name}' in array literal"
                )));
            }
        }
    }
    Ok(Value::Array(arr))
}

/// Splits `s` on commas that are not nested inside `[]`, `()`, `{}` or a
/// quoted string — needed so array literals can hold nested arrays/strings.
fn split_top_level_commas(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '[' | '(' | '{' if !in_string => depth += 1,
            ']' | ')' | '}' if !in_string => depth -= 1,
            ',' if !in_string && depth == 0 => {
                out.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start <= s.len() {
        out.push(&s[start..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_hex_binary_octal_decimal() {
        assert_eq!(read_value_string("0x10", None).unwrap(), ParsedLiteral::Value(Value::Int(16)));
        assert_eq!(read_value_string("0b101", None).unwrap(), ParsedLiteral::Value(Value::Int(5)));
        assert_eq!(read_value_string("010", None).unwrap(), ParsedLiteral::Value(Value::Int(8)));
        assert_eq!(read_value_string("42", None).unwrap(), ParsedLiteral::Value(Value::Int(42)));
        assert_eq!(read_value_string("-7", None).unwrap(), ParsedLiteral::Value(Value::Int(-7)));
    }

    #[test]
    fn infers_float_on_dot_or_exponent() {
        assert_eq!(read_value_string("1.5", None).unwrap(), ParsedLiteral::Value(Value::Float(1.5)));
        match read_value_string("1e3", None).unwrap() {
            ParsedLiteral::Value(Value::Float(f)) => assert!((f - 1000.0).abs() < 1e-9),
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[test]
    fn identifier_like_input_is_unresolved_name() {
        assert_eq!(
            read_value_string("test_a", None).unwrap(),
            ParsedLiteral::UnresolvedName("test_a".to_string())
        );
    }

    #[test]
    fn string_literal_unescapes() {
        let v = read_value_string("\"a\\nb\"", None).unwrap();
        match v {
            ParsedLiteral::Value(Value::String(s)) => assert_eq!(s.as_str(), "a\nb"),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn array_literal_parses_nested_elements() {
        let v = read_value_string("[1, 2.0, \"x\"]", None).unwrap();
        match v {
            ParsedLiteral::Value(Value::Array(a)) => assert_eq!(a.len(), 3),
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn bool_hint_accepts_1_0_true_false() {
        assert_eq!(read_value_string("1", Some(ValueTag::Bool)).unwrap(), ParsedLiteral::Value(Value::Bool(true)));
        assert_eq!(read_value_string("false", Some(ValueTag::Bool)).unwrap(), ParsedLiteral::Value(Value::Bool(false)));
    }
}
