use std::sync::Arc;

use jsonish_schema::{ParsingContext, SchemaShape};
use jsonish_value::Value;

use crate::error::CoerceResult;
use crate::Coercer;

/// §4.5.9: a record (dynamic-key map) coerces each key through `key_schema`
/// and each value through `value_schema`. Trivial string inputs that carry
/// no structure (`""`, `"null"`, prose with no brackets) degrade gracefully
/// to an empty record rather than failing.
pub fn coerce_record(
    coercer: &Coercer,
    value: &Value,
    key_schema: &Arc<dyn SchemaShape>,
    value_schema: &Arc<dyn SchemaShape>,
    ctx: &mut ParsingContext,
) -> CoerceResult<serde_json::Value> {
    match value {
        Value::Object(entries, _) => {
            let mut map = serde_json::Map::new();
            for (key, v) in entries.resolved() {
                let mut key_ctx = ctx.descend()?;
                let key_value = Value::string(key);
                let coerced_key = coercer.coerce(&key_value, key_schema, &mut key_ctx)?;
                let key_str = coerced_key.as_str().map_or_else(|| key.to_string(), String::from);

                let mut val_ctx = ctx.descend()?;
                let coerced_val = coercer.coerce(v, value_schema, &mut val_ctx)?;
                map.insert(key_str, coerced_val);
            }
            Ok(serde_json::Value::Object(map))
        }
        Value::Markdown(_, inner, _) | Value::FixedJson(inner, _) => {
            coerce_record(coercer, inner, key_schema, value_schema, ctx)
        }
        Value::String(s, _) if looks_structured(s) => {
            match jsonish_extract::extract(s).into_iter().next() {
                Some(candidate) => coerce_record(coercer, &candidate, key_schema, value_schema, ctx),
                None => Ok(serde_json::Value::Object(serde_json::Map::new())),
            }
        }
        _ => Ok(serde_json::Value::Object(serde_json::Map::new())),
    }
}

fn looks_structured(s: &str) -> bool {
    let trimmed = s.trim();
    !trimmed.is_empty()
        && !trimmed.eq_ignore_ascii_case("null")
        && (trimmed.contains('{') || trimmed.contains('['))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonish_schema::test_schema::TestSchema;
    use jsonish_value::Completion;

    #[test]
    fn record_coerces_every_entry() {
        let coercer = Coercer::new();
        let key_schema = TestSchema::String.arc();
        let value_schema = TestSchema::Number.arc();
        let obj = Value::object(
            vec![("a".to_string(), Value::Number(1.0, Completion::Complete))],
            Completion::Complete,
        );
        let mut ctx = ParsingContext::new(100, false);
        let out = coerce_record(&coercer, &obj, &key_schema, &value_schema, &mut ctx).unwrap();
        assert_eq!(out, serde_json::json!({"a": 1.0}));
    }

    #[test]
    fn trivial_string_input_degrades_to_empty_record() {
        let coercer = Coercer::new();
        let key_schema = TestSchema::String.arc();
        let value_schema = TestSchema::Number.arc();
        let mut ctx = ParsingContext::new(100, false);
        let out = coerce_record(&coercer, &Value::string("null"), &key_schema, &value_schema, &mut ctx).unwrap();
        assert_eq!(out, serde_json::json!({}));
    }
}
