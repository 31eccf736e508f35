//! The abstract schema-shape contract the coercer targets (§3.2), plus the
//! [`ParsingContext`] threaded through coercion for cycle and depth
//! tracking (§3.3).
//!
//! This crate never depends on a concrete schema representation library.
//! Callers implement [`SchemaShape`] for whatever schema type their
//! façade uses; `jsonish-coerce` only ever talks to `dyn SchemaShape`.

mod context;
mod kind;
pub mod test_schema;

pub use context::{ContextError, ParsingContext};
pub use kind::{Field, LazySchema, LiteralValue, SchemaKind};

use core::fmt;

/// The polymorphic schema capability set the coercer targets.
///
/// Implementors own their sub-schemas (fields, union options, array element
/// type, ...) and hand out borrows of them through [`SchemaShape::kind`].
pub trait SchemaShape: fmt::Debug {
    /// The kind discriminator and its payload (§3.2).
    fn kind(&self) -> SchemaKind<'_>;

    /// Boundary validation hook (§6.2): refinements the core doesn't model
    /// (length bounds, regex, email, ...). Runs once, after coercion
    /// succeeds; failure here is terminal, never retried.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message describing why `candidate` failed
    /// the refinement.
    fn validate(&self, candidate: &serde_json::Value) -> Result<(), String> {
        let _ = candidate;
        Ok(())
    }

    /// A stable per-node identity used as half of the cycle-detection key
    /// in [`ParsingContext`] (§3.3). The default is the schema object's data
    /// pointer, which stays stable for the one `parse` call cycle detection
    /// needs to cover; implementations backed by an interned/shared table
    /// may override this with a cheaper table index.
    fn identity(&self) -> usize {
        core::ptr::addr_of!(*self).cast::<()>() as usize
    }
}
