use jsonish_schema::LiteralValue;
use jsonish_value::Value;
use unicode_normalization::UnicodeNormalization;

use crate::error::{CoerceError, CoerceResult};

/// §4.5.5: match a string `Value` (or text rendering of a scalar/Array) to
/// one of `variants`, first strategy to succeed wins.
pub fn coerce_enum(value: &Value, variants: &[String]) -> CoerceResult<serde_json::Value> {
    if let Value::Array(items, _) = value {
        for item in items {
            if let Ok(v) = coerce_enum(item, variants) {
                return Ok(v);
            }
        }
        return Err(CoerceError::type_mismatch("no array element matched an enum variant"));
    }

    let text = match value {
        Value::String(s, _) => s.clone(),
        Value::Markdown(_, inner, _) | Value::FixedJson(inner, _) => {
            return coerce_enum(inner, variants)
        }
        Value::Null => return Err(CoerceError::type_mismatch("null does not match any enum variant")),
        other => other.to_json().to_string(),
    };

    if let Some(exact) = variants.iter().find(|v| v.as_str() == text) {
        return Ok(serde_json::Value::String(exact.clone()));
    }

    let dequoted = dequote(&text);
    if let Some(exact) = variants.iter().find(|v| v.as_str() == dequoted) {
        return Ok(serde_json::Value::String(exact.clone()));
    }

    if let Some(ci) = variants.iter().find(|v| v.eq_ignore_ascii_case(dequoted)) {
        return Ok(serde_json::Value::String(ci.clone()));
    }

    search_variants_in_text(&text, variants)
}

fn search_variants_in_text(text: &str, variants: &[String]) -> CoerceResult<serde_json::Value> {
    let stripped = jsonish_match::strip_markdown_emphasis(text);

    let mut exact_hits: Vec<&String> = Vec::new();
    let mut ci_hits: Vec<&String> = Vec::new();
    for variant in variants {
        if jsonish_match::find_all_whole_words(stripped, variant).is_empty() {
            if jsonish_match::contains_whole_word_ci(stripped, variant) {
                ci_hits.push(variant);
            }
            continue;
        }
        exact_hits.push(variant);
    }

    if exact_hits.len() == 1 {
        return Ok(serde_json::Value::String(exact_hits[0].clone()));
    }
    if exact_hits.is_empty() && ci_hits.len() == 1 {
        return Ok(serde_json::Value::String(ci_hits[0].clone()));
    }

    let hits = if exact_hits.is_empty() { ci_hits } else { exact_hits };
    if hits.len() > 1 {
        if let Some(first) = earliest_variant_with_marker(stripped, &hits) {
            return Ok(serde_json::Value::String(first.clone()));
        }
        return Err(CoerceError::ambiguous(format!(
            "multiple enum variants found in text: {hits:?}"
        )));
    }

    Err(CoerceError::type_mismatch(format!(
        "no enum variant found in {text:?}"
    )))
}

/// If the earliest-occurring candidate is immediately followed by a `:` or
/// `-` description marker and no other candidate occurs later in the text,
/// treat it as the intended selection rather than ambiguous.
fn earliest_variant_with_marker<'a>(text: &str, hits: &[&'a String]) -> Option<&'a String> {
    let mut best: Option<(usize, &String)> = None;
    for hit in hits {
        if let Some(pos) = jsonish_match::find_all_whole_words(text, hit).into_iter().min() {
            if best.is_none_or(|(p, _)| pos < p) {
                best = Some((pos, hit));
            }
        }
    }
    let (pos, winner) = best?;
    let after = &text[pos + winner.len()..];
    let trimmed = after.trim_start();
    if !trimmed.starts_with(':') && !trimmed.starts_with('-') {
        return None;
    }
    let others_after: usize = hits
        .iter()
        .filter(|h| h.as_str() != winner.as_str())
        .filter(|h| {
            jsonish_match::find_all_whole_words(text, h)
                .into_iter()
                .any(|p| p > pos)
        })
        .count();
    if others_after == 0 { Some(winner) } else { None }
}

fn dequote(s: &str) -> &str {
    let trimmed = s.trim();
    for (open, close) in [('"', '"'), ('\'', '\'')] {
        if trimmed.len() >= 2
            && trimmed.starts_with(open)
            && trimmed.ends_with(close)
        {
            return &trimmed[open.len_utf8()..trimmed.len() - close.len_utf8()];
        }
    }
    trimmed
}

/// §4.5.6: literal matching, layered from exact equality down to
/// text-extraction, with a streaming guard against truncated quoted
/// strings.
pub fn coerce_literal(value: &Value, expected: &LiteralValue) -> CoerceResult<serde_json::Value> {
    if let Value::String(_, jsonish_value::Completion::Incomplete) = value {
        return Err(CoerceError::incomplete("incomplete quoted string"));
    }

    match (expected, value) {
        (LiteralValue::String(expected), Value::String(s, _)) if s == expected => {
            Ok(serde_json::Value::String(expected.clone()))
        }
        (LiteralValue::Number(expected), Value::Number(n, _)) if (n - expected).abs() < f64::EPSILON => {
            serde_json::Number::from_f64(*expected)
                .map(serde_json::Value::Number)
                .ok_or_else(|| CoerceError::type_mismatch("non-finite literal"))
        }
        (LiteralValue::Boolean(expected), Value::Boolean(b)) if b == expected => {
            Ok(serde_json::Value::Bool(*expected))
        }
        (LiteralValue::String(expected), Value::String(s, _)) => match_string_literal(expected, s),
        (_, Value::Object(entries, _)) if entries.resolved().len() == 1 => {
            let (_, inner) = entries.resolved()[0];
            coerce_literal(inner, expected)
        }
        (_, Value::Markdown(_, inner, _) | Value::FixedJson(inner, _)) => {
            coerce_literal(inner, expected)
        }
        (expected, other) => extract_literal_from_text(expected, &other.to_json().to_string()),
    }
}

fn match_string_literal(expected: &str, actual: &str) -> CoerceResult<serde_json::Value> {
    let dequoted = dequote(actual);
    if dequoted.eq_ignore_ascii_case(expected) {
        return Ok(serde_json::Value::String(expected.to_string()));
    }
    if normalize_for_literal(dequoted) == normalize_for_literal(expected) {
        return Ok(serde_json::Value::String(expected.to_string()));
    }
    extract_literal_from_text(&LiteralValue::String(expected.to_string()), actual)
}

/// Punctuation-stripped, Unicode-decomposed, combining-mark-stripped,
/// lowercased form used for the loosest literal comparison tier.
fn normalize_for_literal(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F)
}

fn extract_literal_from_text(expected: &LiteralValue, text: &str) -> CoerceResult<serde_json::Value> {
    match expected {
        LiteralValue::String(expected) => {
            if jsonish_match::contains_whole_word_ci(text, expected) {
                Ok(serde_json::Value::String(expected.clone()))
            } else {
                Err(CoerceError::type_mismatch(format!(
                    "literal {expected:?} not found in {text:?}"
                )))
            }
        }
        LiteralValue::Number(expected) => {
            let token = format_number_token(*expected);
            if jsonish_match::contains_whole_word_ci(text, &token) {
                serde_json::Number::from_f64(*expected)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| CoerceError::type_mismatch("non-finite literal"))
            } else {
                Err(CoerceError::type_mismatch(format!(
                    "literal {expected} not found in {text:?}"
                )))
            }
        }
        LiteralValue::Boolean(expected) => {
            let token = if *expected { "true" } else { "false" };
            if jsonish_match::contains_whole_word_ci(text, token) {
                Ok(serde_json::Value::Bool(*expected))
            } else {
                Err(CoerceError::type_mismatch(format!(
                    "literal {expected} not found in {text:?}"
                )))
            }
        }
    }
}

fn format_number_token(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonish_value::Completion;

    fn s(text: &str) -> Value {
        Value::String(text.to_string(), Completion::Complete)
    }

    #[test]
    fn enum_exact_match() {
        let variants = vec!["RED".to_string(), "GREEN".to_string()];
        assert_eq!(
            coerce_enum(&s("RED"), &variants).unwrap(),
            serde_json::json!("RED")
        );
    }

    #[test]
    fn enum_case_insensitive_match() {
        let variants = vec!["Red".to_string(), "Green".to_string()];
        assert_eq!(
            coerce_enum(&s("red"), &variants).unwrap(),
            serde_json::json!("Red")
        );
    }

    #[test]
    fn enum_substring_search_in_prose() {
        let variants = vec!["RED".to_string(), "GREEN".to_string()];
        assert_eq!(
            coerce_enum(&s("the color is RED here"), &variants).unwrap(),
            serde_json::json!("RED")
        );
    }

    #[test]
    fn enum_two_variants_present_is_ambiguous() {
        let variants = vec!["RED".to_string(), "GREEN".to_string()];
        let err = coerce_enum(&s("it's either RED or GREEN"), &variants).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Ambiguous);
    }

    #[test]
    fn enum_second_variant_mentioned_later_is_still_ambiguous() {
        let variants = vec!["RED".to_string(), "GREEN".to_string()];
        let err = coerce_enum(&s("RED: the warning color, not GREEN"), &variants).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Ambiguous);
    }

    #[test]
    fn literal_exact_match() {
        let expected = LiteralValue::String("ok".to_string());
        assert_eq!(
            coerce_literal(&s("ok"), &expected).unwrap(),
            serde_json::json!("ok")
        );
    }

    #[test]
    fn literal_incomplete_quoted_string_fails() {
        let value = Value::String("\"ok".to_string(), Completion::Incomplete);
        let expected = LiteralValue::String("ok".to_string());
        let err = coerce_literal(&value, &expected).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Incomplete);
    }

    #[test]
    fn literal_normalized_match_strips_accents_and_punctuation() {
        let expected = LiteralValue::String("cafe".to_string());
        assert_eq!(
            coerce_literal(&s("Café!"), &expected).unwrap(),
            serde_json::json!("cafe")
        );
    }

    #[test]
    fn literal_single_key_object_unwraps() {
        let inner = Value::object(
            vec![("value".to_string(), s("ok"))],
            Completion::Complete,
        );
        let expected = LiteralValue::String("ok".to_string());
        assert_eq!(coerce_literal(&inner, &expected).unwrap(), serde_json::json!("ok"));
    }
}
