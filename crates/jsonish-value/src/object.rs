use crate::Value;

/// A single `(key, value)` pair inside an [`Object`].
pub type Entry = (String, Value);

/// An ordered object body that tolerates duplicate keys during parsing.
///
/// The state-machine parser appends every key it sees, including repeats —
/// malformed LLM output sometimes does emit the same field twice. `Object`
/// keeps all of them in insertion order; [`Object::resolved`] is where
/// "last value wins" (§3.1) actually happens, at the point something
/// downstream (the coercer, or `Value::to_json`) needs a proper map. The
/// resolved view keeps each key at its *first* occurrence's position but
/// takes the value from its *last* occurrence, matching how a standard JSON
/// parser folds duplicate object keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object(Vec<Entry>);

impl Object {
    #[must_use]
    pub fn new() -> Self {
        Object(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.0.push((key.into(), value));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw entries in insertion order, duplicates included.
    pub fn raw(&self) -> &[Entry] {
        &self.0
    }

    pub fn into_raw(self) -> Vec<Entry> {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Last-value-wins, first-position-kept view of the entries, as an
    /// ordered list. This is the view every coercion path should read from.
    #[must_use]
    pub fn resolved(&self) -> Vec<(&str, &Value)> {
        let mut order: Vec<&str> = Vec::with_capacity(self.0.len());
        let mut latest: std::collections::HashMap<&str, &Value> =
            std::collections::HashMap::with_capacity(self.0.len());
        for (k, v) in &self.0 {
            if !latest.contains_key(k.as_str()) {
                order.push(k.as_str());
            }
            latest.insert(k.as_str(), v);
        }
        order
            .into_iter()
            .map(|k| (k, *latest.get(k).expect("key was just inserted")))
            .collect()
    }

    /// Look up a key by exact match against the resolved (last-wins) view.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl From<Vec<Entry>> for Object {
    fn from(entries: Vec<Entry>) -> Self {
        Object(entries)
    }
}

impl FromIterator<Entry> for Object {
    fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
        Object(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a str, &'a Value);
    type IntoIter = std::vec::IntoIter<(&'a str, &'a Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter().collect::<Vec<_>>().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Completion;

    fn num(n: f64) -> Value {
        Value::Number(n, Completion::Complete)
    }

    #[test]
    fn resolved_keeps_first_position_last_value() {
        let obj: Object = vec![
            ("a".to_string(), num(1.0)),
            ("b".to_string(), num(2.0)),
            ("a".to_string(), num(3.0)),
        ]
        .into();

        let resolved = obj.resolved();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0], ("a", &num(3.0)));
        assert_eq!(resolved[1], ("b", &num(2.0)));
    }

    #[test]
    fn get_returns_last_occurrence() {
        let obj: Object = vec![("a".to_string(), num(1.0)), ("a".to_string(), num(9.0))].into();
        assert_eq!(obj.get("a"), Some(&num(9.0)));
        assert_eq!(obj.get("missing"), None);
    }

    #[test]
    fn raw_preserves_duplicates() {
        let obj: Object = vec![("a".to_string(), num(1.0)), ("a".to_string(), num(2.0))].into();
        assert_eq!(obj.raw().len(), 2);
    }
}
