//! The ordered strategy ladder (§4.8). Each strategy either produces a
//! value, declines (falls through to the next), or — for ambiguity and
//! incomplete-streaming failures only — aborts the whole parse immediately,
//! since those represent genuine irreconcilable input rather than "this
//! particular strategy didn't apply."

use std::sync::Arc;

use jsonish_coerce::Coercer;
use jsonish_schema::{ParsingContext, SchemaKind, SchemaShape};
use jsonish_value::{Completion, Value};

use crate::error::{ErrorKind, ParseError};
use crate::options::ParseOptions;
use crate::partial;

pub fn parse(
    input: &str,
    schema: &Arc<dyn SchemaShape>,
    options: &ParseOptions,
) -> Result<serde_json::Value, ParseError> {
    let coercer = Coercer::new();

    if is_unterminated_quote(input) && schema_involves_literal(schema) {
        return Err(ParseError::new(
            ErrorKind::Incomplete,
            "incomplete quoted string",
        ));
    }

    if matches!(schema.kind(), SchemaKind::String) {
        trace("string_shortcut", true);
        return Ok(serde_json::Value::String(input.to_string()));
    }

    if let SchemaKind::Union(union_options) = schema.kind() {
        if is_quoted(input) && has_string_option_only(union_options) {
            let value = Value::String(input.to_string(), Completion::Complete);
            if let Some(v) = attempt(&coercer, &value, schema, options, "union_string_shortcut")? {
                return Ok(v);
            }
        }
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(input) {
        let value = Value::from_json(json);
        if let Some(v) = attempt(&coercer, &value, schema, options, "standard_json")? {
            return Ok(v);
        }
    }

    if options.is_markdown_json_allowed() && is_container_kind(&schema.kind()) {
        if let SchemaKind::Array(_) = schema.kind() {
            let multi = jsonish_extract::multi_object_candidates(input);
            if multi.len() >= 2 {
                let arr = Value::Array(multi, Completion::Complete);
                if let Some(v) = attempt(&coercer, &arr, schema, options, "multi_object_array")? {
                    return Ok(v);
                }
            }
        }
        for candidate in jsonish_extract::extract(input) {
            if let Some(v) = attempt(&coercer, &candidate, schema, options, "extracted_candidate")? {
                return Ok(v);
            }
        }
    }

    if options.is_fixes_allowed() {
        let (fixed, fixes) = jsonish_fix::fix(input);
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&fixed) {
            let inner = Value::from_json(json);
            let value = if fixes.is_empty() {
                inner
            } else {
                Value::FixedJson(Box::new(inner), fixes)
            };
            if let Some(v) = attempt(&coercer, &value, schema, options, "fixed_json")? {
                return Ok(v);
            }
        }
    }

    if options.is_malformed_allowed() && is_container_kind(&schema.kind()) {
        let value = jsonish_parser::parse(input);
        if let Some(v) = attempt(&coercer, &value, schema, options, "state_machine")? {
            return Ok(v);
        }
    }

    if is_text_extractable_kind(&schema.kind()) {
        let value = Value::String(input.to_string(), Completion::Complete);
        if let Some(v) = attempt(&coercer, &value, schema, options, "text_extraction")? {
            return Ok(v);
        }
    }

    if options.is_partial_allowed() && is_container_kind(&schema.kind()) {
        if let Some(v) = partial::partial_fill(&coercer, input, schema, options) {
            trace("partial_fill", true);
            return Ok(v);
        }
    }

    if options.is_as_string_allowed() {
        let value = Value::String(input.to_string(), Completion::Complete);
        if let Some(v) = attempt(&coercer, &value, schema, options, "raw_string_fallback")? {
            return Ok(v);
        }
    }

    Err(ParseError::new(
        ErrorKind::ParseFailure,
        "no strategy produced a value matching the schema",
    ))
}

/// Run one coercion attempt. `Ok(Some(_))` is a strategy success, `Ok(None)`
/// means fall through, and `Err` means an ambiguity/incomplete-streaming
/// failure that must abort the whole dispatch per §7's propagation policy.
fn attempt(
    coercer: &Coercer,
    value: &Value,
    schema: &Arc<dyn SchemaShape>,
    options: &ParseOptions,
    strategy: &str,
) -> Result<Option<serde_json::Value>, ParseError> {
    let mut ctx = ParsingContext::new(options.get_max_depth(), options.is_partial_allowed());
    match coercer.coerce(value, schema, &mut ctx) {
        Ok(v) => {
            trace(strategy, true);
            Ok(Some(v))
        }
        Err(err) => {
            let mapped: ParseError = err.into();
            if matches!(mapped.kind(), ErrorKind::Ambiguous | ErrorKind::Incomplete) {
                trace(strategy, false);
                return Err(mapped);
            }
            trace(strategy, false);
            Ok(None)
        }
    }
}

fn trace(strategy: &str, succeeded: bool) {
    tracing::trace!(target: "jsonish::dispatch", strategy, succeeded, "strategy attempt");
}

/// §4.4 streaming guard: raw text that opens a quote but never closes it,
/// fed to a schema where a literal match is in play, is truncated
/// mid-stream rather than a genuine bare string — this runs ahead of the
/// fixing layer so an auto-closed quote can't paper over the truncation.
fn is_unterminated_quote(input: &str) -> bool {
    let trimmed = input.trim();
    let mut chars = trimmed.chars();
    let Some(quote @ ('"' | '\'')) = chars.next() else {
        return false;
    };
    let mut escape = false;
    for c in chars {
        if escape {
            escape = false;
            continue;
        }
        match c {
            '\\' => escape = true,
            c if c == quote => return false,
            _ => {}
        }
    }
    true
}

fn schema_involves_literal(schema: &Arc<dyn SchemaShape>) -> bool {
    match schema.kind() {
        SchemaKind::Literal(_) => true,
        SchemaKind::Union(options) => options.iter().any(|o| matches!(o.kind(), SchemaKind::Literal(_))),
        SchemaKind::DiscriminatedUnion { variants, .. } => {
            variants.iter().any(|(_, v)| matches!(v.kind(), SchemaKind::Literal(_)))
        }
        _ => false,
    }
}

fn is_quoted(input: &str) -> bool {
    let trimmed = input.trim();
    (trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2)
        || (trimmed.starts_with('\'') && trimmed.ends_with('\'') && trimmed.len() >= 2)
}

fn has_string_option_only(options: &[Arc<dyn SchemaShape>]) -> bool {
    let mut has_string = false;
    for option in options {
        match option.kind() {
            SchemaKind::String => has_string = true,
            SchemaKind::Array(_) | SchemaKind::Object(_) | SchemaKind::Record { .. } => {
                return false
            }
            _ => {}
        }
    }
    has_string
}

fn is_container_kind(kind: &SchemaKind<'_>) -> bool {
    matches!(
        kind,
        SchemaKind::Object(_) | SchemaKind::Array(_) | SchemaKind::Record { .. }
    )
}

fn is_text_extractable_kind(kind: &SchemaKind<'_>) -> bool {
    matches!(
        kind,
        SchemaKind::Number
            | SchemaKind::Boolean
            | SchemaKind::Enum(_)
            | SchemaKind::Literal(_)
            | SchemaKind::Union(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonish_schema::test_schema::TestSchema;

    #[test]
    fn string_schema_shortcut_returns_raw_input_verbatim() {
        let schema = TestSchema::String.arc();
        let options = ParseOptions::new();
        let out = parse("  \"quoted\"  ", &schema, &options).unwrap();
        assert_eq!(out, serde_json::json!("  \"quoted\"  "));
    }

    #[test]
    fn prose_wrapped_json_is_extracted_for_object_schema() {
        let fields = vec![TestSchema::field(
            "hi",
            TestSchema::Array(TestSchema::String.arc()).arc(),
            false,
        )];
        let schema = TestSchema::Object(fields).arc();
        let options = ParseOptions::new();
        let out = parse(
            r#"The output is: {"hi": ["a", "b"]}"#,
            &schema,
            &options,
        )
        .unwrap();
        assert_eq!(out, serde_json::json!({"hi": ["a", "b"]}));
    }

    #[test]
    fn ambiguous_enum_match_propagates_immediately() {
        let schema = TestSchema::Enum(vec!["ONE".to_string(), "TWO".to_string()]).arc();
        let options = ParseOptions::new();
        let err = parse(r#""Two" is one of the correct answers."#, &schema, &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Ambiguous);
    }

    #[test]
    fn number_schema_tolerates_comma_grouping_and_dollar_sign() {
        let schema = TestSchema::Number.arc();
        let options = ParseOptions::new();
        let out = parse("$1,234.56", &schema, &options).unwrap();
        assert_eq!(out, serde_json::json!(1234.56));
    }

    #[test]
    fn truncated_quoted_literal_union_input_fails_as_incomplete() {
        let schema = TestSchema::Union(vec![
            TestSchema::literal_string("pay").arc(),
            TestSchema::literal_string("pay_without_credit_card").arc(),
        ])
        .arc();
        let options = ParseOptions::new();
        let err = parse("\n \"pay\n ", &schema, &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Incomplete);
    }
}
