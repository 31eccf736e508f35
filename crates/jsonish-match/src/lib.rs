//! Field-name alias resolution, whole-word text search, and union-scoring
//! weights shared by the schema-directed coercer.
//!
//! None of this crate parses or coerces values itself; it supplies the
//! lookup and ranking primitives `jsonish-coerce` builds its object-field
//! and union-candidate logic on top of.

mod alias;
mod field_match;
mod score;
mod text_search;

pub use alias::{normalize_format, AliasTable, AliasTableBuilder};
pub use field_match::{resolve_field, resolve_field_with};
pub use score::{
    best_scoring, Score, ARRAY_ELEMENT_COERCIBLE_BONUS, ARRAY_ELEMENT_EXACT_BONUS,
    ARRAY_ELEMENT_POOR_FIT_PENALTY, ARRAY_EXACT, GENERIC_COERCION, HOST_TYPE_MATCH_BONUS,
    LITERAL_ANY_STRING, LITERAL_CASE_INSENSITIVE, LITERAL_CROSS_TYPE, LITERAL_EXACT,
    LITERAL_NORMALIZED, LITERAL_SINGLE_KEY_OBJECT, NUMERIC_STRING, OBJECT_CONVERTIBLE,
    OBJECT_EXACT, RECORD_SCORE,
};
pub use text_search::{contains_whole_word_ci, find_all_whole_words, strip_markdown_emphasis};
