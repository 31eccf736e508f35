//! End-to-end scenarios run through the public [`jsonish_core::parse`]
//! entry point, covering the concrete cases and cross-cutting invariants
//! that don't belong inside any single crate's unit tests.

use jsonish_core::test_schema::TestSchema;
use jsonish_core::{parse, ErrorKind, ParseOptions};

#[test]
fn literal_case_mismatch_is_normalized_to_the_declared_casing() {
    let schema = TestSchema::Enum(vec!["ONE".to_string(), "TWO".to_string()]).arc();
    let out = parse(r#""two""#, &schema, ParseOptions::new()).unwrap();
    assert_eq!(out, serde_json::json!("TWO"));
}

#[test]
fn truncated_array_field_inside_an_object_defaults_to_empty_under_partial_fill() {
    let fields = vec![
        TestSchema::field("name", TestSchema::String.arc(), false),
        TestSchema::field(
            "scores",
            TestSchema::Array(TestSchema::Number.arc()).arc(),
            false,
        ),
    ];
    let schema = TestSchema::Object(fields).arc();
    let options = ParseOptions::new().allow_partial(true);
    let out = parse(
        r#"{"name": "Ann", "scores": [1, 2, bad"#,
        &schema,
        options,
    )
    .unwrap();
    assert_eq!(out, serde_json::json!({"name": "Ann", "scores": []}));
}

#[test]
fn truncated_array_without_partial_fill_enabled_fails_outright() {
    let fields = vec![
        TestSchema::field("name", TestSchema::String.arc(), false),
        TestSchema::field(
            "scores",
            TestSchema::Array(TestSchema::Number.arc()).arc(),
            false,
        ),
    ];
    let schema = TestSchema::Object(fields).arc();
    let err = parse(
        r#"{"name": "Ann", "scores": [1, 2, bad"#,
        &schema,
        ParseOptions::new(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
}

#[test]
fn bare_number_schema_extracts_leading_quantity_from_prose() {
    let schema = TestSchema::Number.arc();
    let out = parse("1 cup unsalted butter", &schema, ParseOptions::new()).unwrap();
    assert_eq!(out, serde_json::json!(1.0));
}

#[test]
fn union_prefers_string_over_number_when_surrounded_by_words() {
    let schema = TestSchema::Union(vec![TestSchema::Number.arc(), TestSchema::String.arc()]).arc();
    let out = parse("1 cup unsalted butter", &schema, ParseOptions::new()).unwrap();
    assert_eq!(out, serde_json::json!("1 cup unsalted butter"));
}

#[test]
fn streaming_guard_fails_a_truncated_quote_in_a_literal_union() {
    let schema = TestSchema::Union(vec![
        TestSchema::literal_string("pay").arc(),
        TestSchema::literal_string("pay_without_credit_card").arc(),
    ])
    .arc();
    let err = parse("\n \"pay\n ", &schema, ParseOptions::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Incomplete);
}

#[test]
fn null_brace_corruption_recovers_the_payload_as_a_string_field() {
    let fields = vec![TestSchema::field("a", TestSchema::String.arc(), false)];
    let schema = TestSchema::Object(fields).arc();
    let out = parse(
        r#"{"a": null{"inner": "value"}}"#,
        &schema,
        ParseOptions::new(),
    )
    .unwrap();
    // The recovery folds the corrupted span up through the first balanced
    // quoted string only (`null{"inner"`); the dangling `: "value"}}` tail
    // is picked up as a second, unmatched top-level entry and dropped since
    // the schema only names field "a".
    assert_eq!(out, serde_json::json!({"a": "null{\"inner\""}));
}

#[test]
fn trailing_comma_and_unquoted_keys_still_parse_in_document_order() {
    let fields = vec![TestSchema::field(
        "tags",
        TestSchema::Array(TestSchema::String.arc()).arc(),
        false,
    )];
    let schema = TestSchema::Object(fields).arc();
    let out = parse(r#"{tags: ["a", "b", "c",]}"#, &schema, ParseOptions::new()).unwrap();
    assert_eq!(out, serde_json::json!({"tags": ["a", "b", "c"]}));
}

#[test]
fn prose_wrapped_markdown_fenced_json_is_extracted() {
    let fields = vec![
        TestSchema::field("name", TestSchema::String.arc(), false),
        TestSchema::field("age", TestSchema::Number.arc(), false),
    ];
    let schema = TestSchema::Object(fields).arc();
    let input = "Here's the record you asked for:\n```json\n{\"name\": \"Ann\", \"age\": 30}\n```\nLet me know if you need anything else.";
    let out = parse(input, &schema, ParseOptions::new()).unwrap();
    assert_eq!(out, serde_json::json!({"name": "Ann", "age": 30.0}));
}

#[test]
fn mixed_single_and_double_quotes_are_repaired() {
    let fields = vec![TestSchema::field("name", TestSchema::String.arc(), false)];
    let schema = TestSchema::Object(fields).arc();
    let out = parse(r#"{'name': 'Ann'}"#, &schema, ParseOptions::new()).unwrap();
    assert_eq!(out, serde_json::json!({"name": "Ann"}));
}

#[test]
fn field_name_aliases_resolve_across_naming_conventions() {
    let fields = vec![TestSchema::field(
        "function_signature",
        TestSchema::String.arc(),
        false,
    )];
    let schema = TestSchema::Object(fields).arc();
    let out = parse(
        r#"{"func_signature": "fn main()"}"#,
        &schema,
        ParseOptions::new(),
    )
    .unwrap();
    assert_eq!(out, serde_json::json!({"function_signature": "fn main()"}));
}

#[test]
fn array_element_order_is_preserved_through_extraction() {
    let schema = TestSchema::Array(TestSchema::Number.arc()).arc();
    let input = "The values are [3, 1, 4, 1, 5, 9] in that order.";
    let out = parse(input, &schema, ParseOptions::new()).unwrap();
    assert_eq!(out, serde_json::json!([3.0, 1.0, 4.0, 1.0, 5.0, 9.0]));
}

#[test]
fn clean_json_round_trips_identically_for_a_matching_schema() {
    let fields = vec![
        TestSchema::field("id", TestSchema::Number.arc(), false),
        TestSchema::field(
            "tags",
            TestSchema::Array(TestSchema::String.arc()).arc(),
            false,
        ),
    ];
    let schema = TestSchema::Object(fields).arc();
    let input = r#"{"id": 7, "tags": ["x", "y"]}"#;
    let out = parse(input, &schema, ParseOptions::new()).unwrap();
    assert_eq!(out, serde_json::json!({"id": 7.0, "tags": ["x", "y"]}));
}
