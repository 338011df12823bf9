//! End-to-end scenarios: build, transform, compile, parse.

use serde_json::json;
use shapeform::layout::{FormLayout, LayoutField, LayoutGroup, TableLayout};
use shapeform::{
    array, boolean, number, object, record, string, ArrayErrors, FieldMeta, Issue, PathStyle,
    ValidationError, ValidatorOptions,
};

// =============================================================================
// Transformations
// =============================================================================

#[test]
fn omit_drops_field_from_shape_and_output() {
    let schema = object([
        ("id", number()),
        ("name", string()),
        ("email", string().optional()),
    ])
    .omit(["email"]);

    assert_eq!(schema.keys(), vec!["id", "name"]);
    let parsed = schema
        .compile_to_validator()
        .parse(&json!({"id": 1, "name": "a", "email": "x"}))
        .unwrap();
    assert_eq!(parsed, json!({"id": 1, "name": "a"}));
}

#[test]
fn catchall_validates_and_keeps_extra_fields() {
    let validator = object([("a", string())]).catchall(number()).compile_to_validator();

    assert_eq!(
        validator.parse(&json!({"a": "x", "b": 5})).unwrap(),
        json!({"a": "x", "b": 5})
    );
    let err = validator.parse(&json!({"a": "x", "b": "y"})).unwrap_err();
    assert_eq!(err.issues(), &[Issue::new("b", "Expected number, received string")]);
}

#[test]
fn passthrough_keeps_extras_unvalidated() {
    let validator = object([("a", string())]).passthrough().compile_to_validator();
    assert_eq!(
        validator.parse(&json!({"a": "x", "b": [1, {"c": null}]})).unwrap(),
        json!({"a": "x", "b": [1, {"c": null}]})
    );
}

#[test]
fn catchall_wins_over_passthrough() {
    let validator = object([("a", string())])
        .passthrough()
        .catchall(number())
        .compile_to_validator();
    assert!(validator.parse(&json!({"a": "x", "b": "y"})).is_err());
}

#[test]
fn partial_accepts_empty_object() {
    let validator = object([("id", number())]).partial().compile_to_validator();
    assert_eq!(validator.parse(&json!({})).unwrap(), json!({}));
}

#[test]
fn partial_then_omit_composes() {
    let schema = object([("id", number()), ("name", string()), ("age", number())])
        .partial()
        .omit(["age"])
        .extend([("nickname", string())]);

    assert_eq!(schema.keys(), vec!["id", "name", "nickname"]);
    let validator = schema.compile_to_validator();
    assert!(validator.parse(&json!({"nickname": "n"})).is_ok());
    assert!(validator.parse(&json!({})).is_err());
}

#[test]
fn omit_filters_form_layout() {
    let schema = object([("a", string()), ("b", string())])
        .with_form_layouts([(
            "default",
            FormLayout::new().group(LayoutGroup::new().field("a").field("b")),
        )])
        .omit(["b"]);

    let layout = schema.layout("default").unwrap();
    assert_eq!(layout.groups.len(), 1);
    assert_eq!(layout.groups[0].fields, vec![LayoutField::new("a")]);
}

#[test]
fn layouts_survive_extend_and_resolve_titles() {
    let schema = object([
        ("createdAt", string()),
        ("total", number().with_meta(FieldMeta::new().with_label("Amount"))),
    ])
    .with_table_layouts([(
        "list",
        TableLayout::new()
            .field("createdAt")
            .field(LayoutField::new("total").with_width(120)),
    )])
    .extend([("note", string().optional())]);

    let layout = schema.layout("list").unwrap();
    let titles: Vec<String> = layout
        .fields()
        .map(|f| f.display_title(schema.static_meta(&f.name).as_ref()))
        .collect();
    assert_eq!(titles, vec!["Created At", "Amount"]);
    assert!(schema.dangling_layout_fields().is_empty());
}

// =============================================================================
// Coercion
// =============================================================================

#[test]
fn coercion_converts_top_level_strings() {
    let validator = object([("id", number()), ("active", boolean())])
        .compile_to_validator_with_coercion();
    assert_eq!(
        validator.parse(&json!({"id": "7", "active": "true"})).unwrap(),
        json!({"id": 7, "active": true})
    );
    assert_eq!(
        validator.parse(&json!({"id": "42", "active": false})).unwrap(),
        json!({"id": 42, "active": false})
    );
}

#[test]
fn coercion_rejects_non_numeric_strings() {
    let validator = object([("id", number())]).compile_to_validator_with_coercion();
    let err = validator.parse(&json!({"id": "nope"})).unwrap_err();
    assert_eq!(err.paths(), vec!["id"]);
}

#[test]
fn coercion_leaves_string_fields_alone() {
    let validator = object([("code", string()), ("n", number().optional())])
        .compile_to_validator_with_coercion();
    assert_eq!(
        validator.parse(&json!({"code": "007", "n": null})).unwrap(),
        json!({"code": "007", "n": null})
    );
    assert!(validator.parse(&json!({"code": 7})).is_err());
}

// =============================================================================
// Errors and options
// =============================================================================

#[test]
fn nested_errors_report_full_paths() {
    let validator = object([(
        "items",
        array(object([("sku", string()), ("prices", record(number()))])),
    )])
    .compile_with_options(
        ValidatorOptions::new()
            .with_path_style(PathStyle::Dotted)
            .with_array_errors(ArrayErrors::CollectAll),
    );

    let err = validator
        .parse(&json!({"items": [
            {"sku": "a", "prices": {"eu": 1}},
            {"prices": {"us": "2"}},
            {"sku": 3, "prices": {}}
        ]}))
        .unwrap_err();

    assert_eq!(
        err.issues(),
        &[
            Issue::new("items.1.sku", "Required"),
            Issue::new("items.1.prices.us", "Expected number, received string"),
            Issue::new("items.2.sku", "Expected string, received number"),
        ]
    );
}

#[test]
fn validation_error_display_is_descriptive() {
    let err = object([("id", number())])
        .compile_to_validator()
        .parse(&json!([]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation failed: root: Expected object, received array"
    );
}

#[test]
fn safe_parse_outcome_serializes() {
    let outcome = object([("id", number())])
        .compile_to_validator()
        .safe_parse(&json!({}));
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({"success": false, "issues": [{"path": "id", "message": "Required"}]})
    );
}

#[test]
fn from_messages_builds_structured_error() {
    let err = ValidationError::from_messages([
        "Property 'email': invalid address",
        "Property 'age': must be at least 18",
        "payload rejected",
    ]);
    let grouped = err.issues_by_path();
    assert_eq!(grouped["email"], vec!["invalid address"]);
    assert_eq!(grouped["root"], vec!["payload rejected"]);
}
