//! A dependency-free reference [`SchemaShape`] implementation.
//!
//! Nothing downstream of `jsonish-schema` needs a real schema library to
//! exercise coercion: this module builds schema trees directly out of the
//! [`SchemaKind`] vocabulary, the way a test fixture would. Facades that
//! wrap a real schema system (json-schema, a derive macro, ...) translate
//! into this same shape; they just don't live in this crate.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::{Field, LazySchema, LiteralValue, SchemaKind, SchemaShape};

/// A schema tree built by hand, for tests and examples.
#[derive(Debug, Clone)]
pub enum TestSchema {
    String,
    Number,
    Boolean,
    Null,
    Array(Arc<dyn SchemaShape>),
    Object(Vec<Field>),
    Record {
        key: Arc<dyn SchemaShape>,
        value: Arc<dyn SchemaShape>,
    },
    Enum(Vec<String>),
    Literal(LiteralValue),
    Union(Vec<Arc<dyn SchemaShape>>),
    DiscriminatedUnion {
        discriminator: String,
        variants: Vec<(String, Arc<dyn SchemaShape>)>,
    },
    Optional(Arc<dyn SchemaShape>),
    Nullable(Arc<dyn SchemaShape>),
    Lazy(LazyRef),
}

impl TestSchema {
    #[must_use]
    pub fn arc(self) -> Arc<dyn SchemaShape> {
        Arc::new(self)
    }

    #[must_use]
    pub fn field(name: impl Into<String>, schema: Arc<dyn SchemaShape>, optional: bool) -> Field {
        Field {
            name: name.into(),
            schema,
            optional,
        }
    }

    #[must_use]
    pub fn literal_string(s: impl Into<String>) -> Self {
        TestSchema::Literal(LiteralValue::String(s.into()))
    }

    #[must_use]
    pub fn literal_number(n: f64) -> Self {
        TestSchema::Literal(LiteralValue::Number(n))
    }

    #[must_use]
    pub fn literal_boolean(b: bool) -> Self {
        TestSchema::Literal(LiteralValue::Boolean(b))
    }
}

impl SchemaShape for TestSchema {
    fn kind(&self) -> SchemaKind<'_> {
        match self {
            TestSchema::String => SchemaKind::String,
            TestSchema::Number => SchemaKind::Number,
            TestSchema::Boolean => SchemaKind::Boolean,
            TestSchema::Null => SchemaKind::Null,
            TestSchema::Array(inner) => SchemaKind::Array(inner),
            TestSchema::Object(fields) => SchemaKind::Object(fields),
            TestSchema::Record { key, value } => SchemaKind::Record { key, value },
            TestSchema::Enum(variants) => SchemaKind::Enum(variants),
            TestSchema::Literal(value) => SchemaKind::Literal(value),
            TestSchema::Union(options) => SchemaKind::Union(options),
            TestSchema::DiscriminatedUnion {
                discriminator,
                variants,
            } => SchemaKind::DiscriminatedUnion {
                discriminator,
                variants,
            },
            TestSchema::Optional(inner) => SchemaKind::Optional(inner),
            TestSchema::Nullable(inner) => SchemaKind::Nullable(inner),
            TestSchema::Lazy(lazy) => SchemaKind::Lazy(lazy),
        }
    }
}

/// A deferred self-reference for recursive test schemas, set once after the
/// cycle is fully constructed.
///
/// ```
/// use std::sync::Arc;
/// use jsonish_schema::test_schema::{LazyRef, TestSchema};
///
/// let lazy = LazyRef::new();
/// let node = TestSchema::Object(vec![TestSchema::field(
///     "child",
///     TestSchema::Optional(TestSchema::Lazy(lazy.clone()).arc()).arc(),
///     false,
/// )])
/// .arc();
/// lazy.set(node);
/// ```
#[derive(Clone, Default)]
pub struct LazyRef(Arc<OnceLock<Arc<dyn SchemaShape>>>);

impl LazyRef {
    #[must_use]
    pub fn new() -> Self {
        LazyRef(Arc::new(OnceLock::new()))
    }

    /// Bind the deferred target. Only the first call has any effect.
    pub fn set(&self, schema: Arc<dyn SchemaShape>) {
        let _ = self.0.set(schema);
    }
}

impl fmt::Debug for LazyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyRef")
            .field("bound", &self.0.get().is_some())
            .finish()
    }
}

impl LazySchema for LazyRef {
    fn resolve(&self) -> Arc<dyn SchemaShape> {
        self.0
            .get()
            .cloned()
            .expect("LazyRef resolved before being set")
    }
}
