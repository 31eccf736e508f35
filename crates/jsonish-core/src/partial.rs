//! Partial-fill for truncated streaming input (§4.9): instead of failing
//! outright on an object/array/record whose source was cut off mid-stream,
//! fill whatever structure was recovered and default the rest.
//!
//! The state-machine parser (`jsonish-parser`) already does the bracket
//! auto-close synthesis this step would otherwise need to perform itself —
//! every unclosed `{`/`[` it sees is force-closed and the result tagged
//! [`Completion::Incomplete`] — so this module's job is narrower: walk the
//! schema shape and decide, field by field, whether to keep what parsed or
//! fall back to a kind-appropriate default.

use std::sync::Arc;

use jsonish_coerce::Coercer;
use jsonish_schema::{Field, ParsingContext, SchemaKind, SchemaShape};
use jsonish_value::{Completion, Object, Value};

use crate::options::ParseOptions;

pub fn partial_fill(
    coercer: &Coercer,
    input: &str,
    schema: &Arc<dyn SchemaShape>,
    options: &ParseOptions,
) -> Option<serde_json::Value> {
    let value = jsonish_parser::parse(input);
    match schema.kind() {
        SchemaKind::Object(fields) => Some(partial_object(coercer, &value, fields, options)),
        SchemaKind::Array(elem) => Some(partial_top_level_array(coercer, &value, elem, options)),
        SchemaKind::Record { value: val, .. } => Some(partial_record(coercer, &value, val, options)),
        _ => None,
    }
}

fn object_entries(value: &Value) -> Option<&Object> {
    match value {
        Value::Object(entries, _) => Some(entries),
        Value::Markdown(_, inner, _) | Value::FixedJson(inner, _) => object_entries(inner),
        _ => None,
    }
}

fn partial_object(
    coercer: &Coercer,
    value: &Value,
    fields: &[Field],
    options: &ParseOptions,
) -> serde_json::Value {
    let entries = object_entries(value);
    let mut map = serde_json::Map::new();

    for field in fields {
        let is_optional = field.optional || matches!(field.schema.kind(), SchemaKind::Optional(_));
        let found = entries.and_then(|entries| {
            entries.resolved().into_iter().find_map(|(key, v)| {
                jsonish_match::resolve_field(fields, key)
                    .filter(|f| f.name == field.name)
                    .map(|_| v)
            })
        });

        match found {
            Some(input_value) => {
                let coerced = coerce_field(coercer, input_value, field, options);
                match coerced {
                    Some(v) => {
                        map.insert(field.name.clone(), v);
                    }
                    None if !is_optional => {
                        map.insert(field.name.clone(), default_for(&field.schema.kind()));
                    }
                    None => {}
                }
            }
            None if !is_optional => {
                map.insert(field.name.clone(), default_for(&field.schema.kind()));
            }
            None => {}
        }
    }

    serde_json::Value::Object(map)
}

/// Coerce one field, substituting an empty array when the field is itself
/// an array schema and any element came back structurally incomplete —
/// the narrower in-object counterpart of the top-level Array rule below.
fn coerce_field(
    coercer: &Coercer,
    input_value: &Value,
    field: &Field,
    options: &ParseOptions,
) -> Option<serde_json::Value> {
    if let SchemaKind::Array(elem) = field.schema.kind() {
        if let Value::Array(items, _) = input_value {
            if items.iter().any(|item| item.completion() == Completion::Incomplete) {
                tracing::debug!(target: "jsonish::dispatch", field = %field.name, "array field has incomplete elements, substituting empty array");
                return Some(serde_json::Value::Array(Vec::new()));
            }
            let mut ctx = ParsingContext::new(options.get_max_depth(), true);
            return Some(coerce_array_prefix(coercer, items, elem, &mut ctx));
        }
    }
    let mut ctx = ParsingContext::new(options.get_max_depth(), true);
    coercer.coerce(input_value, &field.schema, &mut ctx).ok()
}

/// §4.9 Array rule: any structurally incomplete element forces the whole
/// array to default empty; otherwise the complete prefix is kept.
fn partial_top_level_array(
    coercer: &Coercer,
    value: &Value,
    elem_schema: &Arc<dyn SchemaShape>,
    options: &ParseOptions,
) -> serde_json::Value {
    let items = match value {
        Value::Array(items, _) => items.as_slice(),
        Value::Markdown(_, inner, _) | Value::FixedJson(inner, _) => {
            return partial_top_level_array(coercer, inner, elem_schema, options)
        }
        _ => &[],
    };
    if items.iter().any(|item| item.completion() == Completion::Incomplete) {
        return serde_json::Value::Array(Vec::new());
    }
    let mut ctx = ParsingContext::new(options.get_max_depth(), true);
    coerce_array_prefix(coercer, items, elem_schema, &mut ctx)
}

fn coerce_array_prefix(
    coercer: &Coercer,
    items: &[Value],
    elem_schema: &Arc<dyn SchemaShape>,
    ctx: &mut ParsingContext,
) -> serde_json::Value {
    let mut out = Vec::new();
    for item in items {
        let Ok(mut descended) = ctx.descend() else {
            break;
        };
        match coercer.coerce(item, elem_schema, &mut descended) {
            Ok(v) => out.push(v),
            Err(_) => break,
        }
    }
    serde_json::Value::Array(out)
}

fn partial_record(
    coercer: &Coercer,
    value: &Value,
    value_schema: &Arc<dyn SchemaShape>,
    options: &ParseOptions,
) -> serde_json::Value {
    let Some(entries) = object_entries(value) else {
        return serde_json::Value::Object(serde_json::Map::new());
    };
    let mut map = serde_json::Map::new();
    for (key, v) in entries.resolved() {
        if v.completion() == Completion::Incomplete {
            continue;
        }
        let mut ctx = ParsingContext::new(options.get_max_depth(), true);
        if let Ok(coerced) = coercer.coerce(v, value_schema, &mut ctx) {
            map.insert(key.to_string(), coerced);
        }
    }
    serde_json::Value::Object(map)
}

/// Kind-appropriate default used when a required field couldn't be
/// recovered from truncated input at all.
fn default_for(kind: &SchemaKind<'_>) -> serde_json::Value {
    match kind {
        SchemaKind::String => serde_json::Value::String(String::new()),
        SchemaKind::Number => serde_json::Value::Number(0.into()),
        SchemaKind::Boolean => serde_json::Value::Bool(false),
        SchemaKind::Array(_) => serde_json::Value::Array(Vec::new()),
        SchemaKind::Object(_) | SchemaKind::Record { .. } => {
            serde_json::Value::Object(serde_json::Map::new())
        }
        SchemaKind::Nullable(_) | SchemaKind::Null => serde_json::Value::Null,
        _ => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonish_schema::test_schema::TestSchema;

    #[test]
    fn missing_required_fields_get_kind_defaults() {
        let coercer = Coercer::new();
        let fields = vec![
            TestSchema::field("name", TestSchema::String.arc(), false),
            TestSchema::field("tags", TestSchema::Array(TestSchema::String.arc()).arc(), false),
        ];
        let schema = TestSchema::Object(fields).arc();
        let options = ParseOptions::new().allow_partial(true);
        let out = partial_fill(&coercer, r#"{"name": "Ann""#, &schema, &options).unwrap();
        assert_eq!(out, serde_json::json!({"name": "Ann", "tags": []}));
    }

    #[test]
    fn array_with_incomplete_trailing_element_substitutes_empty() {
        let coercer = Coercer::new();
        let elem = TestSchema::String.arc();
        let schema = TestSchema::Array(elem).arc();
        let options = ParseOptions::new().allow_partial(true);
        let out = partial_fill(&coercer, r#"["a", "b", "c"#, &schema, &options).unwrap();
        assert_eq!(out, serde_json::json!([]));
    }

    #[test]
    fn complete_array_prefix_is_kept() {
        let coercer = Coercer::new();
        let elem = TestSchema::String.arc();
        let schema = TestSchema::Array(elem).arc();
        let options = ParseOptions::new().allow_partial(true);
        let out = partial_fill(&coercer, r#"["a", "b"]"#, &schema, &options).unwrap();
        assert_eq!(out, serde_json::json!(["a", "b"]));
    }
}
