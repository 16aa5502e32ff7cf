//! Quote-style normalization for JS-flavored literals
//!
//! Scraper output is written in object-literal notation, not JSON: bare
//! keys, single-quoted and template strings, trailing commas, the odd
//! comment. `jsonify` rewrites such a snippet into strict JSON in one pass
//! so the standard parser can take it from there. Interpolations inside
//! template strings are flattened to their source text.

/// Rewrite a JS-flavored literal snippet into strict JSON
pub(crate) fn jsonify(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' | '`' => {
                i = copy_string(&chars, i, c, &mut out);
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i = (i + 2).min(chars.len());
            }
            ',' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                // trailing comma before a closer is dropped
                if !matches!(chars.get(j), Some(&'}') | Some(&']')) {
                    out.push(',');
                }
                i += 1;
            }
            c if c == '_' || c == '$' || c.is_ascii_alphabetic() => {
                let start = i;
                let mut j = i;
                while j < chars.len()
                    && (chars[j] == '_' || chars[j] == '$' || chars[j].is_ascii_alphanumeric())
                {
                    j += 1;
                }
                let ident: String = chars[start..j].iter().collect();

                let mut k = j;
                while k < chars.len() && chars[k].is_whitespace() {
                    k += 1;
                }
                if chars.get(k) == Some(&':') && in_key_position(&out) {
                    out.push('"');
                    out.push_str(&ident);
                    out.push('"');
                } else {
                    out.push_str(&ident);
                }
                i = j;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// A bare identifier is a key when the last significant output char opened
/// an object or separated two members.
fn in_key_position(out: &str) -> bool {
    matches!(out.trim_end().chars().last(), Some('{') | Some(',') | None)
}

/// Copy one string literal, re-quoting it as a JSON string. Returns the
/// index just past the closing quote.
fn copy_string(chars: &[char], start: usize, quote: char, out: &mut String) -> usize {
    out.push('"');
    let mut i = start + 1;

    while i < chars.len() {
        let c = chars[i];
        if c == quote {
            out.push('"');
            return i + 1;
        }
        match c {
            '\\' if i + 1 < chars.len() => {
                let esc = chars[i + 1];
                match esc {
                    '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u' => {
                        out.push('\\');
                        out.push(esc);
                    }
                    // escapes JSON has no use for lose the backslash
                    _ => out.push(esc),
                }
                i += 2;
            }
            '$' if quote == '`' && chars.get(i + 1) == Some(&'{') => {
                // flatten the interpolation to its source text
                let mut depth = 1;
                let mut j = i + 2;
                let expr_start = j;
                while j < chars.len() && depth > 0 {
                    match chars[j] {
                        '{' => depth += 1,
                        '}' => depth -= 1,
                        _ => {}
                    }
                    j += 1;
                }
                let expr_end = if depth == 0 { j - 1 } else { j };
                for &e in &chars[expr_start..expr_end] {
                    push_escaped(out, e);
                }
                i = j;
            }
            _ => {
                push_escaped(out, c);
                i += 1;
            }
        }
    }

    // unterminated string; close it and let the parser complain downstream
    out.push('"');
    i
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '"' => out.push_str("\\\""),
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        _ => out.push(c),
    }
}
