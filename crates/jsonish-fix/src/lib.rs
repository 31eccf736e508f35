//! The eight-step textual repair pass applied before a standard JSON parse
//! is retried.
//!
//! Every step operates on the whole document and skips quoted regions
//! (tracked by a simple escape-aware quote toggle), so repairs compose:
//! the output of one step is the input to the next, in the fixed order
//! below. None of this allocates more than one rewritten copy of the text
//! per step; there is no backtracking.

use std::fmt::Write as _;

/// Run all eight repair steps in order, returning the repaired text and a
/// fix descriptor per repair applied (also emitted via `tracing::debug!`
/// on the `jsonish::fix` target).
#[must_use]
pub fn fix(input: &str) -> (String, Vec<String>) {
    let mut notes = Vec::new();
    let mut text = step1_triple_quoted(input, &mut notes);
    text = step2_comma_grouped_numbers(&text, &mut notes);
    text = step3_array_elements(&text, &mut notes);
    text = step4_unquoted_values(&text, &mut notes);
    text = step5_unquoted_keys(&text, &mut notes);
    text = step6_trailing_commas(&text, &mut notes);
    text = step7_mixed_quote_repair(&text, &mut notes);
    text = step8_auto_close(&text, &mut notes);
    (text, notes)
}

fn note(notes: &mut Vec<String>, offset: usize, text: &str) {
    tracing::debug!(target: "jsonish::fix", offset, fix = text, "applied textual repair");
    notes.push(format!("{offset}: {text}"));
}

/// 1. Triple-quoted strings become ordinary quoted strings with any
/// interior `"` escaped.
fn step1_triple_quoted(input: &str, notes: &mut Vec<String>) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '"' && chars.get(i + 1) == Some(&'"') && chars.get(i + 2) == Some(&'"') {
            let start = i;
            i += 3;
            let mut interior = String::new();
            let mut closed = false;
            while i < chars.len() {
                if chars[i] == '"' && chars.get(i + 1) == Some(&'"') && chars.get(i + 2) == Some(&'"')
                {
                    i += 3;
                    closed = true;
                    break;
                }
                if chars[i] == '"' {
                    interior.push_str("\\\"");
                } else {
                    interior.push(chars[i]);
                }
                i += 1;
            }
            note(
                notes,
                start,
                if closed {
                    "converted triple-quoted string to a quoted string"
                } else {
                    "triple-quoted string missing closing delimiter"
                },
            );
            out.push('"');
            out.push_str(&interior);
            out.push('"');
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Naive quote state for a char buffer: true where the position sits
/// inside a single- or double-quoted span (escapes respected).
fn quote_mask(chars: &[char]) -> Vec<bool> {
    let mut mask = vec![false; chars.len()];
    let mut quote: Option<char> = None;
    let mut escape = false;
    for (i, &c) in chars.iter().enumerate() {
        if let Some(q) = quote {
            mask[i] = true;
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == q {
                quote = None;
            }
        } else if c == '"' || c == '\'' {
            mask[i] = true;
            quote = Some(c);
        }
    }
    mask
}

/// 2. Collapse thousands-grouped digits (`1,234.56` -> `1234.56`) outside
/// quoted regions; only fires when every group after the first comma is
/// exactly three digits.
fn step2_comma_grouped_numbers(input: &str, notes: &mut Vec<String>) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mask = quote_mask(&chars);
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        if mask[i] || !chars[i].is_ascii_digit() {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let start = i;
        let mut j = i;
        while chars.get(j).is_some_and(char::is_ascii_digit) {
            j += 1;
        }
        let mut end = j;
        let mut groups = 0;
        while chars.get(end) == Some(&',')
            && chars
                .get(end + 1..end + 4)
                .is_some_and(|g| g.iter().all(char::is_ascii_digit))
            && !chars.get(end + 4).is_some_and(char::is_ascii_digit)
        {
            end += 4;
            groups += 1;
        }
        if groups == 0 {
            out.extend(&chars[start..j]);
            i = j;
            continue;
        }
        if chars.get(end) == Some(&'.') && chars.get(end + 1).is_some_and(char::is_ascii_digit) {
            end += 1;
            while chars.get(end).is_some_and(char::is_ascii_digit) {
                end += 1;
            }
        }
        note(notes, start, "collapsed comma-grouped digits in numeric literal");
        out.extend(chars[start..end].iter().filter(|&&c| c != ','));
        i = end;
    }
    out
}

fn is_numeric_literal(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    let mut parts = s.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    if int_part.is_empty() || !int_part.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match parts.next() {
        Some(frac) => !frac.is_empty() && frac.chars().all(|c| c.is_ascii_digit()),
        None => true,
    }
}

/// Index of the bracket matching the opener at `open_idx`, skipping quoted
/// regions and nested brackets of the same kind.
fn match_bracket(chars: &[char], open_idx: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escape = false;
    let mut i = open_idx;
    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == q {
                quote = None;
            }
        } else if c == '"' || c == '\'' {
            quote = Some(c);
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Split on top-level commas, respecting nested `(){}[]` and quotes.
fn split_top_level(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escape = false;
    for c in s.chars() {
        if let Some(q) = quote {
            current.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '{' | '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            '}' | ']' | ')' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() || !parts.is_empty() {
        parts.push(current);
    }
    parts
}

/// 3. Within every `[...]` span (any depth, innermost first), scalar
/// elements are normalized: `'x'` and `""x""` become `"x"`, bare
/// `true`/`false`/`null` are lower-cased, anything else unquoted is
/// quoted. Nested object/array elements are left for other steps.
fn step3_array_elements(input: &str, notes: &mut Vec<String>) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    let mut quote: Option<char> = None;
    let mut escape = false;
    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
            out.push(c);
            i += 1;
            continue;
        }
        if c == '[' {
            let close = match_bracket(&chars, i, '[', ']');
            let inner_end = close.unwrap_or(chars.len());
            let inner: String = chars[i + 1..inner_end].iter().collect();
            let fixed_inner = step3_array_elements(&inner, notes);
            let elements: Vec<String> = split_top_level(&fixed_inner)
                .iter()
                .map(|e| fix_scalar_element(e.trim(), notes, i))
                .collect();
            out.push('[');
            out.push_str(&elements.join(", "));
            if let Some(close_idx) = close {
                out.push(']');
                i = close_idx + 1;
            } else {
                i = chars.len();
            }
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

fn fix_scalar_element(elem: &str, notes: &mut Vec<String>, offset: usize) -> String {
    if elem.is_empty() || elem.starts_with('{') || elem.starts_with('[') {
        return elem.to_string();
    }
    let lower = elem.to_ascii_lowercase();
    if lower == "true" || lower == "false" || lower == "null" {
        if elem != lower {
            note(notes, offset, "lower-cased literal array element");
        }
        return lower;
    }
    if is_numeric_literal(elem) {
        return elem.to_string();
    }
    if elem.len() >= 2 && elem.starts_with('\'') && elem.ends_with('\'') {
        note(notes, offset, "converted single-quoted array element to double-quoted");
        return format!("\"{}\"", elem[1..elem.len() - 1].replace('"', "\\\""));
    }
    if elem.len() >= 4 && elem.starts_with("\"\"") && elem.ends_with("\"\"") {
        note(notes, offset, "collapsed doubled quotes around array element");
        return format!("\"{}\"", &elem[2..elem.len() - 2]);
    }
    if elem.len() >= 2 && elem.starts_with('"') && elem.ends_with('"') {
        return elem.to_string();
    }
    note(notes, offset, "quoted unquoted array element");
    format!("\"{}\"", elem.replace('"', "\\\""))
}

/// 4. An unquoted token following a top-level `:` is quoted unless it is
/// `true`/`false`/`null` or a signed number.
fn step4_unquoted_values(input: &str, notes: &mut Vec<String>) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    let mut quote: Option<char> = None;
    let mut escape = false;
    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
            out.push(c);
            i += 1;
            continue;
        }
        out.push(c);
        i += 1;
        if c != ':' {
            continue;
        }
        while chars.get(i).is_some_and(|ch| ch.is_whitespace() && *ch != '\n') {
            out.push(chars[i]);
            i += 1;
        }
        if matches!(chars.get(i), Some('"' | '\'' | '{' | '[') | None) {
            continue;
        }
        let start = i;
        let mut depth = 0i32;
        let mut tquote: Option<char> = None;
        let mut tescape = false;
        while i < chars.len() {
            let tc = chars[i];
            if let Some(q) = tquote {
                if tescape {
                    tescape = false;
                } else if tc == '\\' {
                    tescape = true;
                } else if tc == q {
                    tquote = None;
                }
                i += 1;
                continue;
            }
            match tc {
                '"' | '\'' => {
                    tquote = Some(tc);
                    i += 1;
                }
                '(' | '[' | '{' => {
                    depth += 1;
                    i += 1;
                }
                ')' | ']' | '}' if depth > 0 => {
                    depth -= 1;
                    i += 1;
                }
                ',' | ']' | '}' | '\n' if depth == 0 => break,
                _ => i += 1,
            }
        }
        let token: String = chars[start..i].iter().collect();
        let trimmed = token.trim();
        let lower = trimmed.to_ascii_lowercase();
        if trimmed.is_empty() {
            continue;
        }
        if lower == "true" || lower == "false" || lower == "null" || is_numeric_literal(trimmed) {
            out.push_str(trimmed);
        } else {
            note(notes, start, "quoted unquoted object value");
            let _ = write!(out, "\"{}\"", trimmed.replace('"', "\\\""));
        }
    }
    out
}

/// 5. An identifier at a key position (right after `{` or `,`, across
/// whitespace) followed by `:` is quoted.
fn step5_unquoted_keys(input: &str, notes: &mut Vec<String>) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    let mut quote: Option<char> = None;
    let mut escape = false;
    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
            out.push(c);
            i += 1;
            continue;
        }
        let preceding_ok = matches!(out.trim_end().chars().last(), None | Some('{') | Some(','));
        if preceding_ok && (c.is_alphabetic() || c == '_' || c == '$') {
            let start = i;
            let mut j = i;
            while chars
                .get(j)
                .is_some_and(|ch| ch.is_alphanumeric() || *ch == '_' || *ch == '$')
            {
                j += 1;
            }
            let mut k = j;
            while chars.get(k).is_some_and(|ch| ch.is_whitespace()) {
                k += 1;
            }
            if chars.get(k) == Some(&':') {
                let ident: String = chars[start..j].iter().collect();
                note(notes, start, "quoted unquoted object key");
                out.push('"');
                out.push_str(&ident);
                out.push('"');
                i = j;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}

/// 6. A comma followed (across whitespace) only by `]` or `}` is dropped.
fn step6_trailing_commas(input: &str, notes: &mut Vec<String>) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    let mut quote: Option<char> = None;
    let mut escape = false;
    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
            out.push(c);
            i += 1;
            continue;
        }
        if c == ',' {
            let mut k = i + 1;
            while chars.get(k).is_some_and(|ch| ch.is_whitespace()) {
                k += 1;
            }
            if matches!(chars.get(k), Some(']') | Some('}')) {
                note(notes, i, "dropped trailing comma");
                i += 1;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}

/// 7. A quote character met while inside a string is only treated as the
/// closing delimiter if what follows (across whitespace) is `, } ]` or
/// end of input; otherwise it's content and gets escaped.
fn step7_mixed_quote_repair(input: &str, notes: &mut Vec<String>) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    let mut quote: Option<char> = None;
    let mut escape = false;
    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            if escape {
                out.push(c);
                escape = false;
                i += 1;
                continue;
            }
            if c == '\\' {
                out.push(c);
                escape = true;
                i += 1;
                continue;
            }
            if c == q {
                if plausible_string_end(&chars, i + 1) {
                    out.push(c);
                    quote = None;
                } else {
                    note(notes, i, "escaped embedded quote not at a plausible string end");
                    out.push('\\');
                    out.push(c);
                }
                i += 1;
                continue;
            }
            out.push(c);
            i += 1;
            continue;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
        }
        out.push(c);
        i += 1;
    }
    out
}

fn plausible_string_end(chars: &[char], from: usize) -> bool {
    let mut k = from;
    while chars.get(k).is_some_and(|c| c.is_whitespace()) {
        k += 1;
    }
    // `:` is also accepted here, beyond the value-terminator set, so a key's
    // closing quote (immediately followed by its colon) is never mistaken
    // for an embedded quote needing escape.
    matches!(chars.get(k), None | Some(',') | Some('}') | Some(']') | Some(':'))
}

/// 8. Unbalanced `{`/`[` and a still-open trailing quote are closed.
fn step8_auto_close(input: &str, notes: &mut Vec<String>) -> String {
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escape = false;
    for c in input.chars() {
        if let Some(q) = quote {
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.last() == Some(&c) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }
    let mut out = input.to_string();
    if let Some(q) = quote {
        note(notes, out.chars().count(), "closed unterminated trailing quote");
        out.push(q);
    }
    while let Some(close) = stack.pop() {
        note(notes, out.chars().count(), "auto-closed unbalanced bracket");
        out.push(close);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_triple_quoted_strings() {
        let (fixed, notes) = fix(r#""""hello "world"""""#);
        assert!(fixed.starts_with(r#""hello \"world\""#));
        assert!(!notes.is_empty());
    }

    #[test]
    fn collapses_comma_grouped_numbers() {
        let (fixed, _) = fix(r#"{"a": 1,234.56}"#);
        assert_eq!(fixed, r#"{"a": 1234.56}"#);
    }

    #[test]
    fn does_not_collapse_four_digit_groups() {
        let (fixed, _) = fix(r#"1,2345"#);
        assert_eq!(fixed, "1,2345");
    }

    #[test]
    fn normalizes_array_elements() {
        let (fixed, _) = fix(r#"['a', ""b"", TRUE, c]"#);
        assert_eq!(fixed, r#"["a", "b", true, "c"]"#);
    }

    #[test]
    fn quotes_unquoted_object_values_and_keys() {
        let (fixed, _) = fix(r#"{name: John Smith, age: 30}"#);
        assert_eq!(fixed, r#"{"name": "John Smith", "age": 30}"#);
    }

    #[test]
    fn drops_trailing_commas() {
        let (fixed, _) = fix(r#"{"a": 1, "b": [1, 2,],}"#);
        assert_eq!(fixed, r#"{"a": 1, "b": [1, 2]}"#);
    }

    #[test]
    fn escapes_embedded_quote_not_at_boundary() {
        let (fixed, _) = fix(r#"{"a": "she said "hi" to me"}"#);
        assert_eq!(fixed, r#"{"a": "she said \"hi\" to me"}"#);
    }

    #[test]
    fn auto_closes_unbalanced_brackets_and_trailing_quote() {
        let (fixed, notes) = fix(r#"{"a": [1, 2, "b"#);
        assert_eq!(fixed, r#"{"a": [1, 2, "b""#.to_string() + "]}");
        assert_eq!(notes.len(), 3);
    }
}
