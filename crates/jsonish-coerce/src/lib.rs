//! Schema-directed coercion: turns a parsed [`jsonish_value::Value`] into a
//! `serde_json::Value` shaped like the caller's [`SchemaShape`], applying
//! the same tolerance the parser itself applies to syntax (§4.5).
//!
//! This crate has no notion of "the input text" — by the time anything
//! here runs, extraction and fixing have already happened upstream. Its job
//! is solely: given *a* value and *a* schema, produce the closest-fitting
//! typed JSON, or fail with enough detail to explain why no fit exists.

mod array;
mod enum_literal;
mod error;
mod object;
mod record;
mod scalar;
mod text_extract;
mod union;
mod wrapper;

pub use error::{CoerceError, CoerceResult, ErrorKind};

use std::sync::Arc;

use jsonish_schema::{ParsingContext, SchemaKind, SchemaShape};
use jsonish_value::Value;

/// Stateless entry point for schema-directed coercion. A unit struct rather
/// than a free function so helper modules can take `&Coercer` and call back
/// into `coerce` for their own recursive sub-values without an import cycle.
#[derive(Debug, Default, Clone, Copy)]
pub struct Coercer;

impl Coercer {
    #[must_use]
    pub fn new() -> Self {
        Coercer
    }

    /// Coerce `value` into the shape described by `schema` (§4.5.1–§4.5.12).
    ///
    /// # Errors
    ///
    /// Returns a [`CoerceError`] describing why no fit was found, including
    /// depth/cycle guard trips threaded through `ctx`.
    pub fn coerce(
        &self,
        value: &Value,
        schema: &Arc<dyn SchemaShape>,
        ctx: &mut ParsingContext,
    ) -> CoerceResult<serde_json::Value> {
        let result = match schema.kind() {
            SchemaKind::String => scalar::coerce_string(value),
            SchemaKind::Number => scalar::coerce_number(value),
            SchemaKind::Boolean => scalar::coerce_boolean(value),
            SchemaKind::Null => scalar::coerce_null(value),
            SchemaKind::Enum(variants) => enum_literal::coerce_enum(value, variants),
            SchemaKind::Literal(expected) => enum_literal::coerce_literal(value, expected),
            SchemaKind::Object(fields) => {
                object::coerce_object(self, value, schema, fields, ctx)
            }
            SchemaKind::Array(elem) => array::coerce_array(self, value, elem, ctx),
            SchemaKind::Record { key, value: val } => {
                record::coerce_record(self, value, key, val, ctx)
            }
            SchemaKind::Union(options) => union::coerce_union(self, value, options, ctx),
            SchemaKind::DiscriminatedUnion {
                discriminator,
                variants,
            } => union::coerce_discriminated_union(self, value, discriminator, variants, ctx),
            SchemaKind::Optional(inner) => wrapper::coerce_optional(self, value, inner, ctx)
                .unwrap_or_else(|| Ok(serde_json::Value::Null)),
            SchemaKind::Nullable(inner) => wrapper::coerce_nullable(self, value, inner, ctx),
            SchemaKind::Lazy(lazy) => wrapper::coerce_lazy(self, value, lazy, ctx),
        };
        if let Ok(candidate) = &result {
            if let Err(message) = schema.validate(candidate) {
                return Err(CoerceError::validation_failed(message));
            }
        }
        result
    }

    /// Whether `field.schema` is an `Optional(inner)` wrapper, for callers
    /// (object coercion) that need to omit the key entirely rather than
    /// write a `null` placeholder on failure.
    #[must_use]
    pub fn coerce_optional_field(
        &self,
        value: &Value,
        inner: &Arc<dyn SchemaShape>,
        ctx: &mut ParsingContext,
    ) -> Option<serde_json::Value> {
        wrapper::coerce_optional(self, value, inner, ctx).and_then(Result::ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonish_schema::test_schema::TestSchema;
    use jsonish_value::Completion;

    #[test]
    fn top_level_dispatch_handles_scalars() {
        let coercer = Coercer::new();
        let mut ctx = ParsingContext::new(100, false);
        let schema = TestSchema::Number.arc();
        let out = coercer
            .coerce(&Value::string("$42.00"), &schema, &mut ctx)
            .unwrap();
        assert_eq!(out, serde_json::json!(42.0));
    }

    #[test]
    fn validate_hook_runs_after_successful_coercion() {
        #[derive(Debug)]
        struct AlwaysRejects;
        impl SchemaShape for AlwaysRejects {
            fn kind(&self) -> jsonish_schema::SchemaKind<'_> {
                jsonish_schema::SchemaKind::Number
            }
            fn validate(&self, _candidate: &serde_json::Value) -> Result<(), String> {
                Err("always rejected".to_string())
            }
        }
        let coercer = Coercer::new();
        let mut ctx = ParsingContext::new(100, false);
        let schema: Arc<dyn SchemaShape> = Arc::new(AlwaysRejects);
        let err = coercer
            .coerce(&Value::Number(1.0, Completion::Complete), &schema, &mut ctx)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[test]
    fn depth_limit_is_enforced_through_recursive_object_nesting() {
        let inner = TestSchema::Number.arc();
        let schema = TestSchema::Object(vec![TestSchema::field("x", inner, false)]).arc();
        let mut ctx = ParsingContext::new(0, false);
        let coercer = Coercer::new();
        let err = coercer
            .coerce(
                &Value::object(
                    vec![("x".to_string(), Value::Number(1.0, Completion::Complete))],
                    Completion::Complete,
                ),
                &schema,
                &mut ctx,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DepthExceeded);
    }
}
