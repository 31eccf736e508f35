//! Tolerant, schema-directed parsing of messy LLM output into typed JSON.
//!
//! [`parse`] is the single entry point: given free-form text, a
//! [`SchemaShape`], and [`ParseOptions`], it runs the strategy ladder
//! (§4.8) — standard JSON, extraction, textual repair, the state-machine
//! parser, text-extraction, and (optionally) partial fill — returning the
//! first candidate that coerces cleanly into the requested shape.

mod dispatch;
mod error;
mod options;
mod partial;

pub use error::{ErrorKind, ParseError};
pub use options::ParseOptions;

pub use jsonish_schema::{
    test_schema, Field, LazySchema, LiteralValue, ParsingContext, SchemaKind, SchemaShape,
};
pub use jsonish_value::{Completion, Object, Value as JsonishValue};

use std::sync::Arc;

/// Parse `input` against `schema`, per the strategy ladder described in the
/// module docs.
///
/// # Errors
///
/// Returns [`ParseError`] when every strategy declines, or immediately when
/// a strategy's coercion raises an ambiguity or incomplete-streaming
/// failure (those never fall through to a later, possibly-misleading
/// strategy).
pub fn parse(
    input: &str,
    schema: &Arc<dyn SchemaShape>,
    options: ParseOptions,
) -> Result<serde_json::Value, ParseError> {
    dispatch::parse(input, schema, &options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonish_schema::test_schema::TestSchema;

    #[test]
    fn identity_on_clean_json_matching_schema() {
        let fields = vec![TestSchema::field("a", TestSchema::Number.arc(), false)];
        let schema = TestSchema::Object(fields).arc();
        let out = parse(r#"{"a": 1}"#, &schema, ParseOptions::new()).unwrap();
        assert_eq!(out, serde_json::json!({"a": 1.0}));
    }

    #[test]
    fn determinism_same_input_same_output() {
        let schema = TestSchema::Number.arc();
        let a = parse("$1,234.56", &schema, ParseOptions::new()).unwrap();
        let b = parse("$1,234.56", &schema, ParseOptions::new()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cycle_detection_on_self_referential_schema() {
        let lazy_ref = jsonish_schema::test_schema::LazyRef::new();
        let recursive_fields = vec![TestSchema::field(
            "next",
            TestSchema::Lazy(lazy_ref.clone()).arc(),
            true,
        )];
        let recursive_schema = TestSchema::Object(recursive_fields).arc();
        lazy_ref.set(recursive_schema.clone());

        let mut ctx = ParsingContext::new(100, false);
        let coercer = jsonish_coerce::Coercer::new();
        let looping_value = {
            let mut entries = jsonish_value::Object::new();
            entries.push("next", jsonish_value::Value::Null);
            jsonish_value::Value::Object(entries, Completion::Complete)
        };
        // Simulate a back-reference by entering the same (schema, value)
        // pair before recursing into it.
        ctx.enter(recursive_schema.identity(), &looping_value).unwrap();
        let err = coercer
            .coerce(&looping_value, &recursive_schema, &mut ctx)
            .unwrap_err();
        assert_eq!(err.kind(), jsonish_coerce::ErrorKind::CycleDetected);
    }
}
