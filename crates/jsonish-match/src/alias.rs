use std::sync::OnceLock;

/// A process-wide table of field-name equivalences, used once exact,
/// trimmed, and case-insensitive matches have all failed.
///
/// Built once behind a [`OnceLock`] rather than as a `lazy_static`-style ad
/// hoc global, and handed out through [`AliasTable::builder`] so an
/// embedder can layer its own domain vocabulary on top of the defaults
/// without forking this crate.
#[derive(Debug, Clone)]
pub struct AliasTable {
    groups: Vec<Vec<String>>,
}

impl AliasTable {
    #[must_use]
    pub fn builder() -> AliasTableBuilder {
        AliasTableBuilder::default()
    }

    /// The process-wide default table (signature/description/properties
    /// families), built once on first use.
    #[must_use]
    pub fn shared() -> &'static AliasTable {
        static TABLE: OnceLock<AliasTable> = OnceLock::new();
        TABLE.get_or_init(default_table)
    }

    /// Whether `a` and `b` name the same field under a known semantic
    /// alias grouping (case-insensitive).
    #[must_use]
    pub fn semantically_equivalent(&self, a: &str, b: &str) -> bool {
        if a.eq_ignore_ascii_case(b) {
            return true;
        }
        self.groups.iter().any(|group| {
            let has_a = group.iter().any(|name| name.eq_ignore_ascii_case(a));
            let has_b = group.iter().any(|name| name.eq_ignore_ascii_case(b));
            has_a && has_b
        })
    }
}

#[derive(Debug, Default)]
pub struct AliasTableBuilder {
    groups: Vec<Vec<String>>,
}

impl AliasTableBuilder {
    #[must_use]
    pub fn group<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.push(names.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn build(self) -> AliasTable {
        AliasTable { groups: self.groups }
    }
}

fn default_table() -> AliasTable {
    AliasTable::builder()
        .group(["signature", "function_signature", "func_signature", "method_signature"])
        .group(["description", "desc", "details", "summary"])
        .group(["properties", "props", "attributes", "fields"])
        .build()
}

/// Lowercase with `-`, `_`, and whitespace stripped, so `foo-bar`,
/// `foo_bar`, `Foo Bar`, and `foobar` all collapse to the same key.
#[must_use]
pub fn normalize_format(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_group_matches_across_members() {
        let table = AliasTable::shared();
        assert!(table.semantically_equivalent("signature", "func_signature"));
        assert!(table.semantically_equivalent("DESCRIPTION", "desc"));
        assert!(!table.semantically_equivalent("signature", "description"));
    }

    #[test]
    fn normalize_format_collapses_separators() {
        assert_eq!(normalize_format("foo-bar"), "foobar");
        assert_eq!(normalize_format("Foo_Bar"), "foobar");
        assert_eq!(normalize_format("Foo Bar"), "foobar");
    }

    #[test]
    fn builder_extends_without_losing_defaults_requires_explicit_groups() {
        let custom = AliasTable::builder().group(["id", "identifier", "uid"]).build();
        assert!(custom.semantically_equivalent("id", "uid"));
        assert!(!custom.semantically_equivalent("signature", "func_signature"));
    }
}
