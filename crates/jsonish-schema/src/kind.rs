use core::fmt;
use std::sync::Arc;

use crate::SchemaShape;

/// A named field of an [`SchemaKind::Object`], with its own optionality flag
/// (schemas model "optional" at the field level, distinct from the
/// `Optional(inner)` wrapper kind used for standalone values).
#[derive(Clone)]
pub struct Field {
    pub name: String,
    pub schema: Arc<dyn SchemaShape>,
    pub optional: bool,
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("optional", &self.optional)
            .field("schema", &self.schema)
            .finish()
    }
}

/// A scalar literal a [`SchemaKind::Literal`] schema expects exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

/// Resolves to a schema lazily, breaking the infinite-size cycle a
/// self-referential schema (e.g. a recursive `Json` or tree type) would
/// otherwise require.
pub trait LazySchema: fmt::Debug {
    fn resolve(&self) -> Arc<dyn SchemaShape>;
}

/// The kind discriminator returned by [`SchemaShape::kind`] (§3.2).
#[derive(Debug)]
pub enum SchemaKind<'a> {
    String,
    Number,
    Boolean,
    Null,
    Array(&'a Arc<dyn SchemaShape>),
    Object(&'a [Field]),
    Record {
        key: &'a Arc<dyn SchemaShape>,
        value: &'a Arc<dyn SchemaShape>,
    },
    /// An ordered set of string variants.
    Enum(&'a [String]),
    Literal(&'a LiteralValue),
    /// An ordered list of candidate schemas, tried in declaration order.
    Union(&'a [Arc<dyn SchemaShape>]),
    DiscriminatedUnion {
        discriminator: &'a str,
        variants: &'a [(String, Arc<dyn SchemaShape>)],
    },
    Optional(&'a Arc<dyn SchemaShape>),
    Nullable(&'a Arc<dyn SchemaShape>),
    Lazy(&'a dyn LazySchema),
}
