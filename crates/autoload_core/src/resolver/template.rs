//! `$name` / `${name}` placeholder substitution.
//!
//! Substitution is safe: placeholders without a value stay in the output
//! verbatim. `$$` produces a literal `$`. A `${` that doesn't close over a
//! valid identifier is rejected.

use std::collections::HashMap;

use super::error::{ResolveError, ResolveResult};

/// Substitute placeholders in `pattern` with entries from `values`.
pub fn substitute(pattern: &str, values: &HashMap<String, String>) -> ResolveResult<String> {
    let mut output = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(pos) = rest.find('$') {
        output.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            output.push('$');
            rest = tail;
        } else if let Some(braced) = after.strip_prefix('{') {
            let Some(end) = braced.find('}') else {
                return Err(ResolveError::malformed(pattern, "unterminated '${' placeholder"));
            };
            let name = &braced[..end];
            if identifier_len(name) != name.len() || name.is_empty() {
                return Err(ResolveError::malformed(
                    pattern,
                    format!("invalid placeholder name '{}'", name),
                ));
            }
            match values.get(name) {
                Some(value) => output.push_str(value),
                None => {
                    output.push_str("${");
                    output.push_str(name);
                    output.push('}');
                }
            }
            rest = &braced[end + 1..];
        } else {
            let len = identifier_len(after);
            let name = &after[..len];
            match values.get(name) {
                Some(value) if len > 0 => output.push_str(value),
                _ => {
                    output.push('$');
                    output.push_str(name);
                }
            }
            rest = &after[len..];
        }
    }

    output.push_str(rest);
    Ok(output)
}

/// Length of the ASCII identifier (`[_a-zA-Z][_a-zA-Z0-9]*`) at the start of `s`.
fn identifier_len(s: &str) -> usize {
    let mut len = 0;
    for (i, c) in s.char_indices() {
        let valid = c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit());
        if !valid {
            break;
        }
        len = i + c.len_utf8();
    }
    len
}
