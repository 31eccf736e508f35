use std::sync::Arc;

use jsonish_schema::{Field, ParsingContext, SchemaShape};
use jsonish_value::{Completion, Object, Value};

use crate::error::{CoerceError, CoerceResult};
use crate::Coercer;

/// §4.5.7: object coercion, field-matched via [`jsonish_match::resolve_field`],
/// with single-field wrapping for a bare primitive and a standard-JSON
/// reparse when the `Value` is actually a JSON-looking string.
pub fn coerce_object(
    coercer: &Coercer,
    value: &Value,
    self_schema: &Arc<dyn SchemaShape>,
    fields: &[Field],
    ctx: &mut ParsingContext,
) -> CoerceResult<serde_json::Value> {
    match value {
        Value::Object(entries, _) => coerce_object_entries(coercer, entries, self_schema, fields, ctx),
        Value::Markdown(_, inner, _) | Value::FixedJson(inner, _) => {
            coerce_object(coercer, inner, self_schema, fields, ctx)
        }
        Value::String(s, _) if looks_like_structured(s) => {
            let reparsed = jsonish_extract::extract(s);
            match reparsed.into_iter().next() {
                Some(candidate) => coerce_object(coercer, &candidate, self_schema, fields, ctx),
                None => Err(CoerceError::type_mismatch("string did not reparse into structured data")),
            }
        }
        primitive if fields.len() == 1 => {
            let field = &fields[0];
            let mut descended = ctx.descend()?;
            let coerced = coercer.coerce(primitive, &field.schema, &mut descended)?;
            let mut map = serde_json::Map::new();
            map.insert(field.name.clone(), coerced);
            Ok(serde_json::Value::Object(map))
        }
        other => Err(CoerceError::type_mismatch(format!(
            "cannot coerce {other:?} into an object"
        ))),
    }
}

fn coerce_object_entries(
    coercer: &Coercer,
    entries: &Object,
    self_schema: &Arc<dyn SchemaShape>,
    fields: &[Field],
    ctx: &mut ParsingContext,
) -> CoerceResult<serde_json::Value> {
    let identity = self_schema.identity();
    ctx.enter(identity, &Value::Object(entries.clone(), Completion::Complete))?;

    let mut map = serde_json::Map::new();
    for field in fields {
        let found = entries.resolved().into_iter().find_map(|(key, v)| {
            jsonish_match::resolve_field(fields, key)
                .filter(|f| f.name == field.name)
                .map(|_| v)
        });

        match found {
            Some(input_value) => {
                if let jsonish_schema::SchemaKind::Optional(inner) = field.schema.kind() {
                    let mut descended = ctx.descend()?;
                    if let Some(coerced) =
                        coercer.coerce_optional_field(input_value, inner, &mut descended)
                    {
                        map.insert(field.name.clone(), coerced);
                    }
                    continue;
                }
                let mut descended = ctx.descend()?;
                match coercer.coerce(input_value, &field.schema, &mut descended) {
                    Ok(coerced) => {
                        map.insert(field.name.clone(), coerced);
                    }
                    Err(_) if field.optional => {}
                    Err(err) => {
                        ctx.leave(identity, &Value::Object(entries.clone(), Completion::Complete));
                        return Err(err);
                    }
                }
            }
            None if !field.optional => {
                tracing::debug!(target: "jsonish::coerce", field = %field.name, "missing required field left absent");
            }
            None => {}
        }
    }

    ctx.leave(identity, &Value::Object(entries.clone(), Completion::Complete));
    Ok(serde_json::Value::Object(map))
}

fn looks_like_structured(s: &str) -> bool {
    let trimmed = s.trim();
    trimmed.starts_with('{') || trimmed.starts_with('[')
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonish_schema::test_schema::TestSchema;
    use jsonish_value::Completion;

    fn num(n: f64) -> Value {
        Value::Number(n, Completion::Complete)
    }

    #[test]
    fn single_field_wrapping_promotes_primitive() {
        let coercer = Coercer::new();
        let schema = TestSchema::Object(vec![TestSchema::field("value", TestSchema::Number.arc(), false)]).arc();
        let fields = vec![TestSchema::field("value", TestSchema::Number.arc(), false)];
        let mut ctx = ParsingContext::new(100, false);
        let out = coerce_object(&coercer, &num(5.0), &schema, &fields, &mut ctx).unwrap();
        assert_eq!(out, serde_json::json!({"value": 5.0}));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let coercer = Coercer::new();
        let fields = vec![TestSchema::field("a", TestSchema::Number.arc(), false)];
        let schema = TestSchema::Object(fields.clone()).arc();
        let obj = Value::object(
            vec![
                ("a".to_string(), num(1.0)),
                ("unused".to_string(), num(2.0)),
            ],
            Completion::Complete,
        );
        let mut ctx = ParsingContext::new(100, false);
        let out = coerce_object(&coercer, &obj, &schema, &fields, &mut ctx).unwrap();
        assert_eq!(out, serde_json::json!({"a": 1.0}));
    }

    #[test]
    fn field_matched_via_alias() {
        let coercer = Coercer::new();
        let fields = vec![TestSchema::field("description", TestSchema::String.arc(), false)];
        let schema = TestSchema::Object(fields.clone()).arc();
        let obj = Value::object(
            vec![("desc".to_string(), Value::string("hello"))],
            Completion::Complete,
        );
        let mut ctx = ParsingContext::new(100, false);
        let out = coerce_object(&coercer, &obj, &schema, &fields, &mut ctx).unwrap();
        assert_eq!(out, serde_json::json!({"description": "hello"}));
    }
}
