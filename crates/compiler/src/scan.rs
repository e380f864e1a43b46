//! Small lexical helpers shared by `optree` and `funcomp`: splitting on a
//! top-level delimiter while respecting `()`/`[]`/`{}` nesting and quoted
//! strings. Neither module tokenizes up front — both the expression
//! compiler and the statement splitter scan the source text directly.

/// Splits `s` on top-level commas (not nested inside brackets/parens/braces
/// or a quoted string). Used for argument lists, return lists and array
/// literal element lists.
pub fn split_top_level(s: &str, delim: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '(' | '[' | '{' if !in_string => depth += 1,
            ')' | ']' | '}' if !in_string => depth -= 1,
            c if !in_string && depth == 0 && c == delim => {
                out.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    out.push(&s[start..]);
    out
}

/// Finds the byte offset just past the bracket opened at byte offset `open`
/// (exclusive of the closing bracket itself), honoring nesting and quoted
/// strings. Returns `None` if the brackets never balance.
pub fn find_matching(s: &str, open_idx: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let open = bytes[open_idx] as char;
    let close = match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        _ => return None,
    };
    let mut depth = 0i32;
    let mut in_string = false;
    for (i, c) in s.char_indices().skip_while(|(i, _)| *i < open_idx) {
        match c {
            '"' => in_string = !in_string,
            c if !in_string && c == open => depth += 1,
            c if !in_string && c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Strips one leading/trailing bracket pair if `s` (trimmed) is wrapped in
/// one, returning the interior text. Returns `None` if `s` isn't a single
/// balanced bracketed group spanning the whole string.
pub fn strip_wrapping(s: &str, open: char, close: char) -> Option<&str> {
    let s = s.trim();
    if !s.starts_with(open) || !s.ends_with(close) || s.len() < 2 {
        return None;
    }
    let end = find_matching(s, 0)?;
    if end == s.len() - close.len_utf8() {
        Some(&s[open.len_utf8()..end])
    } else {
        None
    }
}

/// Splits `body` into top-level statements terminated by `;` or a newline,
/// without splitting inside a `{ ... }` block (a block statement's body is
/// kept attached to its head so the caller can recognize `if`/`while`/`else`
/// and recurse into the block separately).
pub fn split_statements(body: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut paren_depth = 0i32;
    let mut in_string = false;
    let mut start = 0usize;
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => in_string = !in_string,
            '(' if !in_string => paren_depth += 1,
            ')' if !in_string => paren_depth -= 1,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 && paren_depth == 0 {
                    out.push(body[start..=i].trim());
                    start = i + 1;
                }
            }
            ';' | '\n' if !in_string && depth == 0 && paren_depth == 0 => {
                let piece = body[start..i].trim();
                if !piece.is_empty() {
                    out.push(piece);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    let tail = body[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_top_level_ignores_nested_commas() {
        let parts = split_top_level("a, [1, 2], b", ',');
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].trim(), "[1, 2]");
    }

    #[test]
    fn strip_wrapping_requires_whole_string_wrapped() {
        assert_eq!(strip_wrapping("(a+b)", '(', ')'), Some("a+b"));
        assert_eq!(strip_wrapping("(a)+(b)", '(', ')'), None);
    }

    #[test]
    fn split_statements_keeps_block_body_attached() {
        let stmts = split_statements("int a = 1\nif (a > 0) { a = 2 }\nreturn a");
        assert_eq!(stmts.len(), 3);
        assert!(stmts[1].starts_with("if"));
    }
}
