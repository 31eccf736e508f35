use jsonish_schema::Field;

use crate::alias::{normalize_format, AliasTable};

/// Resolve `key` against a field list in four tiers, stopping at the first
/// that yields a match: exact, trimmed, case-insensitive, then alias (a
/// semantic group match or a format-normalized match, tried in that order).
#[must_use]
pub fn resolve_field<'a>(fields: &'a [Field], key: &str) -> Option<&'a Field> {
    resolve_field_with(AliasTable::shared(), fields, key)
}

/// As [`resolve_field`], but against a caller-supplied alias table.
#[must_use]
pub fn resolve_field_with<'a>(
    table: &AliasTable,
    fields: &'a [Field],
    key: &str,
) -> Option<&'a Field> {
    if let Some(field) = fields.iter().find(|f| f.name == key) {
        tracing::trace!(target: "jsonish::match", key, field = %field.name, tier = "exact");
        return Some(field);
    }

    let trimmed = key.trim();
    if let Some(field) = fields.iter().find(|f| f.name == trimmed) {
        tracing::trace!(target: "jsonish::match", key, field = %field.name, tier = "trimmed");
        return Some(field);
    }

    if let Some(field) = fields.iter().find(|f| f.name.eq_ignore_ascii_case(trimmed)) {
        tracing::trace!(target: "jsonish::match", key, field = %field.name, tier = "case_insensitive");
        return Some(field);
    }

    if let Some(field) = fields
        .iter()
        .find(|f| table.semantically_equivalent(&f.name, trimmed))
    {
        tracing::trace!(target: "jsonish::match", key, field = %field.name, tier = "alias_semantic");
        return Some(field);
    }

    let normalized_key = normalize_format(trimmed);
    let field = fields
        .iter()
        .find(|f| normalize_format(&f.name) == normalized_key);
    if let Some(field) = field {
        tracing::trace!(target: "jsonish::match", key, field = %field.name, tier = "alias_format");
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonish_schema::test_schema::TestSchema;

    fn fields() -> Vec<Field> {
        vec![
            Field {
                name: "function_signature".to_string(),
                schema: TestSchema::String.arc(),
                optional: false,
            },
            Field {
                name: "is-active".to_string(),
                schema: TestSchema::Boolean.arc(),
                optional: false,
            },
        ]
    }

    #[test]
    fn exact_match_wins_first() {
        let fs = fields();
        let found = resolve_field(&fs, "function_signature").unwrap();
        assert_eq!(found.name, "function_signature");
    }

    #[test]
    fn case_insensitive_tier_matches() {
        let fs = fields();
        let found = resolve_field(&fs, "IS-ACTIVE").unwrap();
        assert_eq!(found.name, "is-active");
    }

    #[test]
    fn alias_semantic_group_matches() {
        let fs = fields();
        let found = resolve_field(&fs, "signature").unwrap();
        assert_eq!(found.name, "function_signature");
    }

    #[test]
    fn alias_format_normalization_matches() {
        let fs = fields();
        let found = resolve_field(&fs, "is_active").unwrap();
        assert_eq!(found.name, "is-active");
    }

    #[test]
    fn no_match_returns_none() {
        let fs = fields();
        assert!(resolve_field(&fs, "totally_unrelated").is_none());
    }
}
