//! Helpers for pulling scalars out of free-form text: the fallback path
//! every coercer reaches for once a `Value` doesn't already carry the
//! expected shape natively.

/// The first substring that looks like a decimal number (optional sign,
/// digits, optional fractional part), or `None` if the text has none.
#[must_use]
pub fn first_decimal_number(text: &str) -> Option<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut i = 0;
    while i < chars.len() {
        let (start_byte, c) = chars[i];
        if c.is_ascii_digit() || (c == '-' && chars.get(i + 1).is_some_and(|(_, n)| n.is_ascii_digit())) {
            let mut j = i + 1;
            while chars.get(j).is_some_and(|(_, c)| c.is_ascii_digit()) {
                j += 1;
            }
            if chars.get(j).is_some_and(|(_, c)| *c == '.')
                && chars.get(j + 1).is_some_and(|(_, c)| c.is_ascii_digit())
            {
                j += 1;
                while chars.get(j).is_some_and(|(_, c)| c.is_ascii_digit()) {
                    j += 1;
                }
            }
            let end_byte = chars.get(j).map_or(text.len(), |(b, _)| *b);
            return Some(&text[start_byte..end_byte]);
        }
        i += 1;
    }
    None
}

/// Whether `text` (after trimming) is *only* a number, i.e. nothing else to
/// extract around it.
#[must_use]
pub fn is_standalone_number(text: &str) -> bool {
    let trimmed = text.trim();
    first_decimal_number(trimmed).is_some_and(|n| n == trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_decimal_number_in_prose() {
        assert_eq!(first_decimal_number("about 42.5 units left"), Some("42.5"));
        assert_eq!(first_decimal_number("no digits here"), None);
    }

    #[test]
    fn standalone_number_detects_exact_match_only() {
        assert!(is_standalone_number("  42.5  "));
        assert!(!is_standalone_number("42.5 units"));
    }
}
