use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use jsonish_value::Value;

/// State threaded through every recursive coercion call (§3.3): cycle
/// detection, the recursion bound, and the `allow_partial` flag so deeply
/// nested coercion doesn't need to re-read `ParseOptions`.
#[derive(Debug, Clone)]
pub struct ParsingContext {
    visited: HashSet<(usize, u64)>,
    depth: usize,
    max_depth: usize,
    allow_partial: bool,
}

/// The error a depth/cycle check raises; kept crate-local since
/// `jsonish-coerce` maps it onto the richer `jsonish-core` error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    DepthExceeded,
    CycleDetected,
}

impl ParsingContext {
    #[must_use]
    pub fn new(max_depth: usize, allow_partial: bool) -> Self {
        ParsingContext {
            visited: HashSet::new(),
            depth: 0,
            max_depth,
            allow_partial,
        }
    }

    #[must_use]
    pub fn allow_partial(&self) -> bool {
        self.allow_partial
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Enter one level of recursion, checking the depth bound.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::DepthExceeded`] once `max_depth` would be
    /// exceeded.
    pub fn descend(&self) -> Result<ParsingContext, ContextError> {
        if self.depth + 1 > self.max_depth {
            return Err(ContextError::DepthExceeded);
        }
        let mut next = self.clone();
        next.depth += 1;
        Ok(next)
    }

    /// Record a (schema, value) pair as being in progress, failing if it was
    /// already being visited higher up the call stack — i.e. a cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::CycleDetected`] if this exact pair is already
    /// in the visited set.
    pub fn enter(&mut self, schema_identity: usize, value: &Value) -> Result<(), ContextError> {
        let key = (schema_identity, fingerprint(value));
        if !self.visited.insert(key) {
            return Err(ContextError::CycleDetected);
        }
        Ok(())
    }

    pub fn leave(&mut self, schema_identity: usize, value: &Value) {
        self.visited.remove(&(schema_identity, fingerprint(value)));
    }
}

/// A cheap, collision-tolerant fingerprint of a `Value`'s structure and
/// content, used only to key the cycle-detection set. It is not a content
/// hash in any cryptographic sense — two structurally different values are
/// never required to fingerprint differently, they just usually do.
fn fingerprint(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    fingerprint_into(value, &mut hasher);
    hasher.finish()
}

fn fingerprint_into(value: &Value, hasher: &mut DefaultHasher) {
    match value {
        Value::Null => 0u8.hash(hasher),
        Value::Boolean(b) => {
            1u8.hash(hasher);
            b.hash(hasher);
        }
        Value::Number(n, _) => {
            2u8.hash(hasher);
            n.to_bits().hash(hasher);
        }
        Value::String(s, _) => {
            3u8.hash(hasher);
            s.hash(hasher);
        }
        Value::Array(items, _) => {
            4u8.hash(hasher);
            items.len().hash(hasher);
            for item in items {
                fingerprint_into(item, hasher);
            }
        }
        Value::Object(entries, _) => {
            5u8.hash(hasher);
            for (k, v) in entries.resolved() {
                k.hash(hasher);
                fingerprint_into(v, hasher);
            }
        }
        Value::Markdown(lang, inner, _) => {
            6u8.hash(hasher);
            lang.hash(hasher);
            fingerprint_into(inner, hasher);
        }
        Value::FixedJson(inner, _) => {
            7u8.hash(hasher);
            fingerprint_into(inner, hasher);
        }
        Value::AnyOf(candidates, _) => {
            8u8.hash(hasher);
            candidates.len().hash(hasher);
            for candidate in candidates {
                fingerprint_into(candidate, hasher);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonish_value::Completion;

    #[test]
    fn descend_fails_past_max_depth() {
        let ctx = ParsingContext::new(1, false);
        let deeper = ctx.descend().expect("first descend ok");
        assert_eq!(deeper.depth(), 1);
        assert_eq!(deeper.descend(), Err(ContextError::DepthExceeded));
    }

    #[test]
    fn enter_same_pair_twice_detects_cycle() {
        let mut ctx = ParsingContext::new(100, false);
        let value = Value::Null;
        ctx.enter(42, &value).expect("first enter ok");
        assert_eq!(ctx.enter(42, &value), Err(ContextError::CycleDetected));
    }

    #[test]
    fn leave_allows_revisiting_same_pair() {
        let mut ctx = ParsingContext::new(100, false);
        let value = Value::Boolean(true);
        ctx.enter(1, &value).expect("enter ok");
        ctx.leave(1, &value);
        assert!(ctx.enter(1, &value).is_ok());
    }

    #[test]
    fn fingerprint_distinguishes_different_values() {
        let a = fingerprint(&Value::Number(1.0, Completion::Complete));
        let b = fingerprint(&Value::Number(2.0, Completion::Complete));
        assert_ne!(a, b);
    }
}
