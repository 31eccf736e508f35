//! The intermediate value model threaded between the tolerant parser and the
//! schema-directed coercer.
//!
//! A [`Value`] is produced by the state-machine parser, by lifting a
//! `serde_json::Value` after a clean JSON parse, or by wrapping either of
//! those in the handful of bookkeeping variants (`Markdown`, `FixedJson`,
//! `AnyOf`) that record *how* a candidate was obtained. The coercer consumes
//! `Value`s and discards them; nothing downstream holds onto one.

mod completion;
mod object;

pub use completion::Completion;
pub use object::{Entry, Object};

use core::fmt;

/// A textual note describing a single repair the parser or fixing layer made
/// (e.g. `"auto-closed unterminated string"`). Kept as plain strings rather
/// than a closed enum because the fixing layer's repairs are inherently
/// free-form diagnostics, not branches any caller matches on.
pub type Fixes = Vec<String>;

/// The tagged union produced by parsing and consumed by coercion.
///
/// `Object` preserves insertion order and tolerates duplicate keys (the
/// parser may legitimately see the same key twice in malformed input); see
/// [`Object`] for how duplicates are resolved. `Markdown`, `FixedJson`, and
/// `AnyOf` never appear nested arbitrarily deep inside `Array`/`Object` —
/// they only ever wrap a value produced by one pass of the dispatcher, so
/// the coercer's recursion into `Array`/`Object` elements never has to worry
/// about re-entering them except at the top of a candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64, Completion),
    String(String, Completion),
    Array(Vec<Value>, Completion),
    Object(Object, Completion),
    /// The contents of a fenced code block: the language tag (empty if
    /// untagged) and the value extracted from inside the fence.
    Markdown(String, Box<Value>, Completion),
    /// A value recovered by the fixing layer, tagged with the repairs that
    /// were applied so callers can inspect what happened.
    FixedJson(Box<Value>, Fixes),
    /// Multiple candidate values extracted from one input (e.g. several
    /// balanced JSON spans found in prose). The coercer tries each in turn.
    AnyOf(Vec<Value>, String),
}

impl Value {
    #[must_use]
    pub fn object(entries: impl Into<Object>, completion: Completion) -> Self {
        Value::Object(entries.into(), completion)
    }

    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into(), Completion::Complete)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The completion state of this value, recursing into wrapper variants.
    #[must_use]
    pub fn completion(&self) -> Completion {
        match self {
            Value::Null | Value::Boolean(_) => Completion::Complete,
            Value::Number(_, c) | Value::String(_, c) | Value::Array(_, c) | Value::Object(_, c) => *c,
            Value::Markdown(_, inner, c) => c.combine(inner.completion()),
            Value::FixedJson(inner, _) => inner.completion(),
            Value::AnyOf(candidates, _) => {
                Completion::combine_all(candidates.iter().map(Value::completion))
            }
        }
    }

    /// Lift a `serde_json::Value` (the result of a clean standard-JSON
    /// parse) into our tagged model. Everything lifted this way is
    /// [`Completion::Complete`] — a value that round-tripped through
    /// `serde_json` by definition closed cleanly.
    #[must_use]
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => {
                Value::Number(n.as_f64().unwrap_or(0.0), Completion::Complete)
            }
            serde_json::Value::String(s) => Value::String(s, Completion::Complete),
            serde_json::Value::Array(items) => Value::Array(
                items.into_iter().map(Value::from_json).collect(),
                Completion::Complete,
            ),
            serde_json::Value::Object(map) => {
                let entries = map
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect::<Vec<_>>();
                Value::Object(Object::from(entries), Completion::Complete)
            }
        }
    }

    /// Lower back to a `serde_json::Value`, used when a schema coerces a
    /// structured value into its JSON-rendered string form (§4.5.1, §4.5.8).
    /// `Markdown`/`FixedJson` unwrap transparently; `AnyOf` picks its first
    /// candidate, since by the time rendering is needed a single candidate
    /// has already won.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n, _) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s, _) => serde_json::Value::String(s.clone()),
            Value::Array(items, _) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(entries, _) => {
                let map = entries
                    .resolved()
                    .into_iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect();
                serde_json::Value::Object(map)
            }
            Value::Markdown(_, inner, _) | Value::FixedJson(inner, _) => inner.to_json(),
            Value::AnyOf(candidates, original) => candidates
                .first()
                .map(Value::to_json)
                .unwrap_or_else(|| serde_json::Value::String(original.clone())),
        }
    }

    /// Collapse a single-candidate `AnyOf` down to its inner value. The
    /// dispatcher wraps every strategy's output in `AnyOf` uniformly; once
    /// only one candidate survives there is no ambiguity left to carry.
    #[must_use]
    pub fn simplify(self) -> Value {
        match self {
            Value::AnyOf(mut candidates, original) if candidates.len() == 1 => {
                candidates.pop().unwrap_or(Value::String(original, Completion::Incomplete))
            }
            other => other,
        }
    }
}

impl fmt::Display for Value {
    /// A JSON-ish textual rendering, used for debug output and as the basis
    /// for string coercion of compound values (the coercer applies its own
    /// canonical brace form on top of this for objects; see `jsonish-coerce`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_lifts_all_scalars_as_complete() {
        let v = Value::from_json(serde_json::json!({"a": 1, "b": [true, null, "x"]}));
        assert_eq!(v.completion(), Completion::Complete);
    }

    #[test]
    fn anyof_completion_is_complete_only_if_all_candidates_are() {
        let complete = Value::Number(1.0, Completion::Complete);
        let incomplete = Value::Number(2.0, Completion::Incomplete);

        let all_complete = Value::AnyOf(vec![complete.clone()], "1".into());
        assert_eq!(all_complete.completion(), Completion::Complete);

        let mixed = Value::AnyOf(vec![complete, incomplete], "1".into());
        assert_eq!(mixed.completion(), Completion::Incomplete);
    }

    #[test]
    fn markdown_and_fixedjson_inherit_inner_completion() {
        let inner = Value::String("x".into(), Completion::Incomplete);
        let md = Value::Markdown("json".into(), Box::new(inner.clone()), Completion::Complete);
        assert_eq!(md.completion(), Completion::Incomplete);

        let fixed = Value::FixedJson(Box::new(inner), vec!["auto-closed".into()]);
        assert_eq!(fixed.completion(), Completion::Incomplete);
    }

    #[test]
    fn simplify_unwraps_single_candidate_anyof() {
        let inner = Value::Boolean(true);
        let wrapped = Value::AnyOf(vec![inner.clone()], "true".into());
        assert_eq!(wrapped.simplify(), inner);
    }

    #[test]
    fn simplify_leaves_multi_candidate_anyof_alone() {
        let a = Value::Number(1.0, Completion::Complete);
        let b = Value::Number(2.0, Completion::Complete);
        let wrapped = Value::AnyOf(vec![a, b], "1 2".into());
        assert!(matches!(wrapped.simplify(), Value::AnyOf(candidates, _) if candidates.len() == 2));
    }

    #[test]
    fn to_json_renders_object_with_last_value_winning_duplicate_key() {
        let entries: Object = vec![
            ("a".to_string(), Value::Number(1.0, Completion::Complete)),
            ("a".to_string(), Value::Number(2.0, Completion::Complete)),
        ]
        .into();
        let v = Value::Object(entries, Completion::Complete);
        assert_eq!(v.to_json(), serde_json::json!({"a": 2.0}));
    }
}
