use jsonish_value::{Completion, Value};


use crate::error::{CoerceError, CoerceResult};
use crate::text_extract::first_decimal_number;

/// Render any value as its textual form (§4.5.1). The dispatcher bypasses
/// this for a top-level String schema (it returns the raw input verbatim
/// instead), so this path only runs for nested string fields.
pub fn coerce_string(value: &Value) -> CoerceResult<serde_json::Value> {
    let rendered = match value {
        Value::String(s, _) => s.clone(),
        Value::Number(n, _) => format_number(*n),
        Value::Boolean(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(_, _) | Value::Array(_, _) => value.to_json().to_string(),
        Value::Markdown(_, inner, _) | Value::FixedJson(inner, _) => return coerce_string(inner),
        Value::AnyOf(candidates, original) => {
            return candidates
                .first()
                .map(coerce_string)
                .unwrap_or_else(|| Ok(serde_json::Value::String(original.clone())))
        }
    };
    Ok(serde_json::Value::String(rendered))
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// §4.5.2: numbers accept commas, a leading `$`, `p/q` division, and a
/// dangling trailing `.`, beyond what `str::parse` tolerates natively.
pub fn coerce_number(value: &Value) -> CoerceResult<serde_json::Value> {
    match value {
        Value::Number(n, _) => to_json_number(*n),
        Value::Boolean(b) => to_json_number(if *b { 1.0 } else { 0.0 }),
        Value::String(s, _) => parse_number_text(s),
        Value::Markdown(_, inner, _) | Value::FixedJson(inner, _) => coerce_number(inner),
        Value::AnyOf(candidates, _) => candidates
            .first()
            .map(coerce_number)
            .unwrap_or_else(|| Err(CoerceError::type_mismatch("empty candidate set for number"))),
        other => Err(CoerceError::type_mismatch(format!(
            "cannot coerce {other:?} to number"
        ))),
    }
}

fn parse_number_text(raw: &str) -> CoerceResult<serde_json::Value> {
    let mut cleaned = raw.trim().replace(',', "");
    if let Some(stripped) = cleaned.strip_prefix('$') {
        cleaned = stripped.to_string();
    }
    cleaned = cleaned.trim().to_string();
    if let Some(slash) = cleaned.find('/') {
        let (p, q) = (&cleaned[..slash], &cleaned[slash + 1..]);
        if let (Ok(p), Ok(q)) = (p.trim().parse::<f64>(), q.trim().parse::<f64>()) {
            if q != 0.0 {
                return to_json_number(p / q);
            }
        }
    }
    if cleaned.ends_with('.') {
        cleaned.pop();
    }
    if let Ok(n) = cleaned.parse::<f64>() {
        return to_json_number(n);
    }
    // Not a standalone number on its own (e.g. "1 cup unsalted butter") —
    // fall back to pulling the first decimal-number substring out of it.
    first_decimal_number(raw.trim())
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| CoerceError::type_mismatch(format!("{raw:?} is not a number")))
        .and_then(to_json_number)
}

fn to_json_number(n: f64) -> CoerceResult<serde_json::Value> {
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .ok_or_else(|| CoerceError::type_mismatch("non-finite number"))
}

/// §4.5.3: booleans accept `true`/`false` case-insensitively, markdown
/// emphasis wrapping (`**true**`), or a bare whole-word occurrence in
/// surrounding prose; finding both words is an ambiguity failure.
pub fn coerce_boolean(value: &Value) -> CoerceResult<serde_json::Value> {
    match value {
        Value::Boolean(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Number(n, _) => Ok(serde_json::Value::Bool(*n != 0.0)),
        Value::String(s, _) => parse_boolean_text(s),
        Value::Markdown(_, inner, _) | Value::FixedJson(inner, _) => coerce_boolean(inner),
        Value::AnyOf(candidates, _) => candidates
            .first()
            .map(coerce_boolean)
            .unwrap_or_else(|| Err(CoerceError::type_mismatch("empty candidate set for boolean"))),
        other => Err(CoerceError::type_mismatch(format!(
            "cannot coerce {other:?} to boolean"
        ))),
    }
}

fn parse_boolean_text(raw: &str) -> CoerceResult<serde_json::Value> {
    let stripped = jsonish_match::strip_markdown_emphasis(raw);
    if stripped.eq_ignore_ascii_case("true") {
        return Ok(serde_json::Value::Bool(true));
    }
    if stripped.eq_ignore_ascii_case("false") {
        return Ok(serde_json::Value::Bool(false));
    }
    let has_true = jsonish_match::contains_whole_word_ci(raw, "true");
    let has_false = jsonish_match::contains_whole_word_ci(raw, "false");
    match (has_true, has_false) {
        (true, true) => Err(CoerceError::ambiguous(
            "both true and false appear as whole words",
        )),
        (true, false) => Ok(serde_json::Value::Bool(true)),
        (false, true) => Ok(serde_json::Value::Bool(false)),
        (false, false) => Err(CoerceError::type_mismatch(format!(
            "{raw:?} contains no boolean word"
        ))),
    }
}

/// §4.5.4: only a `Null` value (or the bare literal `null` discovered by
/// the parser) coerces here.
pub fn coerce_null(value: &Value) -> CoerceResult<serde_json::Value> {
    match value {
        Value::Null => Ok(serde_json::Value::Null),
        Value::String(s, _) if s.trim().eq_ignore_ascii_case("null") => Ok(serde_json::Value::Null),
        Value::Markdown(_, inner, _) | Value::FixedJson(inner, _) => coerce_null(inner),
        other => Err(CoerceError::type_mismatch(format!(
            "cannot coerce {other:?} to null"
        ))),
    }
}

/// Extracts the first decimal-number substring when the whole text isn't
/// already a standalone number; used by the text-extraction dispatcher
/// strategy rather than the primary scalar coercer.
#[must_use]
pub fn extract_number_from_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<f64>() {
        return Some(n);
    }
    first_decimal_number(trimmed).and_then(|s| s.parse::<f64>().ok())
}
