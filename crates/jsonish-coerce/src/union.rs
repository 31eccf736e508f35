use std::sync::Arc;

use jsonish_match::{best_scoring, Score};
use jsonish_schema::{ParsingContext, SchemaKind, SchemaShape};
use jsonish_value::{Completion, Value};

use crate::error::{CoerceError, CoerceResult};
use crate::Coercer;

/// §4.5.10: try every option, score each success, return the highest
/// scorer (first option wins ties). Falls back to progressively more
/// aggressive heuristics if every option fails outright.
pub fn coerce_union(
    coercer: &Coercer,
    value: &Value,
    options: &[Arc<dyn SchemaShape>],
    ctx: &mut ParsingContext,
) -> CoerceResult<serde_json::Value> {
    streaming_guard(value, options)?;
    ambiguity_guard(value, options)?;

    let mut successes: Vec<(Score, serde_json::Value)> = Vec::new();
    for option in options {
        let mut descended = ctx.descend()?;
        match coercer.coerce(value, option, &mut descended) {
            Ok(coerced) => {
                let score = score_candidate(value, option, &coerced);
                tracing::trace!(target: "jsonish::coerce", score, "union option succeeded");
                successes.push((score, coerced));
            }
            Err(err) => {
                tracing::trace!(target: "jsonish::coerce", %err, "union option failed");
            }
        }
    }

    if let Some((_, best)) = best_scoring(successes) {
        return Ok(best);
    }

    fallback(value, options)
}

fn streaming_guard(value: &Value, options: &[Arc<dyn SchemaShape>]) -> CoerceResult<()> {
    if let Value::String(_, Completion::Incomplete) = value {
        if options.iter().any(|o| matches!(o.kind(), SchemaKind::Literal(_))) {
            return Err(CoerceError::incomplete(
                "truncated string with a literal option present",
            ));
        }
    }
    Ok(())
}

fn ambiguity_guard(value: &Value, options: &[Arc<dyn SchemaShape>]) -> CoerceResult<()> {
    let Value::String(text, _) = value else {
        return Ok(());
    };
    let mut found = 0usize;
    for option in options {
        let SchemaKind::Literal(lit) = option.kind() else {
            continue;
        };
        let word = match lit {
            jsonish_schema::LiteralValue::String(_) => continue,
            jsonish_schema::LiteralValue::Number(n) => format_number(*n),
            jsonish_schema::LiteralValue::Boolean(b) => b.to_string(),
        };
        if jsonish_match::contains_whole_word_ci(text, &word) {
            found += 1;
        }
    }
    if found >= 2 {
        return Err(CoerceError::ambiguous(
            "multiple non-string literal options found as whole words",
        ));
    }
    Ok(())
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

fn score_candidate(input: &Value, schema: &Arc<dyn SchemaShape>, produced: &serde_json::Value) -> Score {
    let mut score = match schema.kind() {
        SchemaKind::Literal(_) => literal_score(input, produced),
        SchemaKind::Array(_) => jsonish_match::ARRAY_EXACT,
        SchemaKind::Object(_) => {
            if matches!(input, Value::Object(_, _)) {
                jsonish_match::OBJECT_EXACT
            } else {
                jsonish_match::OBJECT_CONVERTIBLE
            }
        }
        SchemaKind::Record { .. } => jsonish_match::RECORD_SCORE,
        SchemaKind::Number | SchemaKind::Boolean => {
            if matches!(input, Value::Number(_, _) | Value::Boolean(_)) {
                jsonish_match::NUMERIC_STRING
            } else {
                jsonish_match::GENERIC_COERCION
            }
        }
        _ => jsonish_match::GENERIC_COERCION,
    };
    if host_type_matches(produced, schema) {
        score += jsonish_match::HOST_TYPE_MATCH_BONUS;
    }
    score
}

fn literal_score(input: &Value, produced: &serde_json::Value) -> Score {
    let Value::String(s, _) = input else {
        return jsonish_match::LITERAL_CROSS_TYPE;
    };
    match produced.as_str() {
        Some(p) if p == s => jsonish_match::LITERAL_EXACT,
        Some(p) if p.eq_ignore_ascii_case(s) => jsonish_match::LITERAL_CASE_INSENSITIVE,
        Some(_) => jsonish_match::LITERAL_NORMALIZED,
        None => jsonish_match::LITERAL_ANY_STRING,
    }
}

fn host_type_matches(produced: &serde_json::Value, schema: &Arc<dyn SchemaShape>) -> bool {
    matches!(
        (schema.kind(), produced),
        (SchemaKind::String, serde_json::Value::String(_))
            | (SchemaKind::Number, serde_json::Value::Number(_))
            | (SchemaKind::Boolean, serde_json::Value::Bool(_))
            | (SchemaKind::Array(_), serde_json::Value::Array(_))
            | (SchemaKind::Object(_) | SchemaKind::Record { .. }, serde_json::Value::Object(_))
    )
}

fn fallback(value: &Value, options: &[Arc<dyn SchemaShape>]) -> CoerceResult<serde_json::Value> {
    if options.iter().any(|o| matches!(o.kind(), SchemaKind::String)) {
        return Ok(serde_json::Value::String(value.to_json().to_string()));
    }
    if options.iter().any(|o| matches!(o.kind(), SchemaKind::Number)) {
        if let Value::String(s, _) = value {
            if let Some(n) = crate::scalar::extract_number_from_text(s) {
                return serde_json::Number::from_f64(n)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| CoerceError::type_mismatch("non-finite number"));
            }
        }
    }
    if options.iter().any(|o| matches!(o.kind(), SchemaKind::Boolean)) {
        if let Value::String(s, _) = value {
            let affirmative = jsonish_match::contains_whole_word_ci(s, "yes")
                || jsonish_match::contains_whole_word_ci(s, "true");
            let negative = jsonish_match::contains_whole_word_ci(s, "no")
                || jsonish_match::contains_whole_word_ci(s, "false");
            if affirmative && !negative {
                return Ok(serde_json::Value::Bool(true));
            }
            if negative && !affirmative {
                return Ok(serde_json::Value::Bool(false));
            }
        }
    }
    Err(CoerceError::type_mismatch("no union option matched"))
}

/// §4.5.11: discriminated unions jump straight to the matching variant when
/// the discriminator key is present, falling back to plain union scoring
/// otherwise.
pub fn coerce_discriminated_union(
    coercer: &Coercer,
    value: &Value,
    discriminator: &str,
    variants: &[(String, Arc<dyn SchemaShape>)],
    ctx: &mut ParsingContext,
) -> CoerceResult<serde_json::Value> {
    if let Value::Object(entries, _) = value {
        if let Some(tag_value) = entries.get(discriminator) {
            if let Value::String(tag, _) = tag_value {
                if let Some((_, schema)) = variants.iter().find(|(name, _)| name == tag) {
                    let mut descended = ctx.descend()?;
                    return coercer.coerce(value, schema, &mut descended);
                }
            }
        }
    }
    let options: Vec<Arc<dyn SchemaShape>> = variants.iter().map(|(_, s)| s.clone()).collect();
    coerce_union(coercer, value, &options, ctx)
}
