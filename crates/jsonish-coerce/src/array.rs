use std::sync::Arc;

use jsonish_schema::{ParsingContext, SchemaKind, SchemaShape};
use jsonish_value::Value;

use crate::error::{CoerceError, CoerceResult};
use crate::Coercer;

/// §4.5.8: array coercion. A bare non-array value is wrapped as a
/// single-element array; the union-wrapper pattern handles an array of
/// objects destined for a single-field-union element schema.
pub fn coerce_array(
    coercer: &Coercer,
    value: &Value,
    elem_schema: &Arc<dyn SchemaShape>,
    ctx: &mut ParsingContext,
) -> CoerceResult<serde_json::Value> {
    match value {
        Value::Array(items, _) => coerce_items(coercer, items, elem_schema, ctx),
        Value::Markdown(_, inner, _) | Value::FixedJson(inner, _) => {
            coerce_array(coercer, inner, elem_schema, ctx)
        }
        other => {
            let mut descended = ctx.descend()?;
            let coerced = coercer.coerce(other, elem_schema, &mut descended)?;
            Ok(serde_json::Value::Array(vec![coerced]))
        }
    }
}

fn coerce_items(
    coercer: &Coercer,
    items: &[Value],
    elem_schema: &Arc<dyn SchemaShape>,
    ctx: &mut ParsingContext,
) -> CoerceResult<serde_json::Value> {
    if let Some(wrapped) = try_union_wrapper(coercer, items, elem_schema, ctx) {
        return wrapped;
    }

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let mut descended = ctx.descend()?;
        out.push(coercer.coerce(item, elem_schema, &mut descended)?);
    }
    Ok(serde_json::Value::Array(out))
}

/// If `elem_schema` is a single-field object whose field is a union, and
/// every array element is itself an object, wrap each element under that
/// field name before coercing — this lets a flat array of heterogeneous
/// objects satisfy a schema that models each element as `{ kind: A | B }`.
fn try_union_wrapper(
    coercer: &Coercer,
    items: &[Value],
    elem_schema: &Arc<dyn SchemaShape>,
    ctx: &mut ParsingContext,
) -> Option<CoerceResult<serde_json::Value>> {
    let SchemaKind::Object(fields) = elem_schema.kind() else {
        return None;
    };
    let [field] = fields else { return None };
    if !matches!(field.schema.kind(), SchemaKind::Union(_)) {
        return None;
    }
    if items.is_empty() || !items.iter().all(|item| matches!(item, Value::Object(_, _))) {
        return None;
    }

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let wrapped = jsonish_value::Value::object(
            vec![(field.name.clone(), item.clone())],
            item.completion(),
        );
        let mut descended = match ctx.descend() {
            Ok(d) => d,
            Err(e) => return Some(Err(e.into())),
        };
        match coercer.coerce(&wrapped, elem_schema, &mut descended) {
            Ok(v) => out.push(v),
            Err(err) => {
                tracing::debug!(target: "jsonish::coerce", %err, "union-wrapper pattern failed, falling back to direct element coercion");
                return None;
            }
        }
    }
    Some(Ok(serde_json::Value::Array(out)))
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
    fn array_coerces_each_element() {
        let coercer = Coercer::new();
        let elem = TestSchema::Number.arc();
        let arr = Value::Array(vec![num(1.0), num(2.0)], Completion::Complete);
        let mut ctx = ParsingContext::new(100, false);
        let out = coerce_array(&coercer, &arr, &elem, &mut ctx).unwrap();
        assert_eq!(out, serde_json::json!([1.0, 2.0]));
    }

    #[test]
    fn single_value_wraps_into_one_element_array() {
        let coercer = Coercer::new();
        let elem = TestSchema::Number.arc();
        let mut ctx = ParsingContext::new(100, false);
        let out = coerce_array(&coercer, &num(5.0), &elem, &mut ctx).unwrap();
        assert_eq!(out, serde_json::json!([5.0]));
    }
}
