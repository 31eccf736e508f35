use std::sync::Arc;

use jsonish_schema::{LazySchema, ParsingContext, SchemaShape};
use jsonish_value::Value;

use crate::error::CoerceResult;
use crate::Coercer;

/// §4.5.12: `Optional` absorbs a coercion failure into absence rather than
/// propagating the error; the caller (object coercion) is the one that
/// actually omits the field from its map on `None`.
pub fn coerce_optional(
    coercer: &Coercer,
    value: &Value,
    inner: &Arc<dyn SchemaShape>,
    ctx: &mut ParsingContext,
) -> Option<CoerceResult<serde_json::Value>> {
    if is_fenced_null(value) {
        return None;
    }
    let mut descended = match ctx.descend() {
        Ok(d) => d,
        Err(e) => return Some(Err(e.into())),
    };
    coercer.coerce(value, inner, &mut descended).ok().map(Ok)
}

/// §4.5.12: `Nullable` maps a `Null` value straight to JSON null without
/// consulting `inner` at all; otherwise delegates.
pub fn coerce_nullable(
    coercer: &Coercer,
    value: &Value,
    inner: &Arc<dyn SchemaShape>,
    ctx: &mut ParsingContext,
) -> CoerceResult<serde_json::Value> {
    if value.is_null() || is_fenced_null(value) {
        return Ok(serde_json::Value::Null);
    }
    let mut descended = ctx.descend()?;
    coercer.coerce(value, inner, &mut descended)
}

fn is_fenced_null(value: &Value) -> bool {
    match value {
        Value::Markdown(_, inner, _) => matches!(inner.as_ref(), Value::Null)
            || matches!(inner.as_ref(), Value::String(s, _) if s.trim().eq_ignore_ascii_case("null")),
        _ => false,
    }
}

/// §4.5.12: `Lazy` resolves its thunk then recurses; the caller's
/// [`ParsingContext`] already guards against infinite recursion through
/// cyclic schemas via the visited set.
pub fn coerce_lazy(
    coercer: &Coercer,
    value: &Value,
    lazy: &dyn LazySchema,
    ctx: &mut ParsingContext,
) -> CoerceResult<serde_json::Value> {
    let resolved = lazy.resolve();
    let mut descended = ctx.descend()?;
    coercer.coerce(value, &resolved, &mut descended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonish_schema::test_schema::TestSchema;
    use jsonish_value::Completion;

    #[test]
    fn optional_absorbs_failure_into_none() {
        let coercer = Coercer::new();
        let inner = TestSchema::Number.arc();
        let mut ctx = ParsingContext::new(100, false);
        let out = coerce_optional(&coercer, &Value::string("not a number"), &inner, &mut ctx);
        assert!(out.is_none());
    }

    #[test]
    fn optional_passes_through_success() {
        let coercer = Coercer::new();
        let inner = TestSchema::Number.arc();
        let mut ctx = ParsingContext::new(100, false);
        let out = coerce_optional(&coercer, &Value::Number(3.0, Completion::Complete), &inner, &mut ctx);
        assert_eq!(out.unwrap().unwrap(), serde_json::json!(3.0));
    }

    #[test]
    fn nullable_maps_null_value_directly() {
        let coercer = Coercer::new();
        let inner = TestSchema::Number.arc();
        let mut ctx = ParsingContext::new(100, false);
        let out = coerce_nullable(&coercer, &Value::Null, &inner, &mut ctx).unwrap();
        assert_eq!(out, serde_json::Value::Null);
    }
}
