//! Snapshot tests for descriptor export and parse outcomes.
//!
//! Run `cargo insta review` to review and accept snapshot changes.

use serde_json::json;
use shapeform::layout::{LayoutField, TableLayout};
use shapeform::{number, object, string, FieldMeta, Schema};

// =============================================================================
// Descriptor Snapshots
// =============================================================================

#[test]
fn snapshot_object_descriptor() {
    let schema = object([
        ("id", number()),
        (
            "email",
            string()
                .with_meta(FieldMeta::new().with_label("Email"))
                .optional(),
        ),
    ])
    .with_id("id")
    .unwrap()
    .with_table_layouts([(
        "list",
        TableLayout::new()
            .field("id")
            .field(LayoutField::new("email").with_width(200)),
    )]);

    insta::assert_snapshot!(Schema::from(schema).to_json().unwrap(), @r#"
    {
      "type": "object",
      "fields": [
        {
          "name": "id",
          "schema": {
            "type": "number"
          }
        },
        {
          "name": "email",
          "schema": {
            "type": "optional",
            "inner": {
              "type": "string",
              "meta": {
                "label": "Email"
              }
            }
          }
        }
      ],
      "layouts": {
        "list": {
          "type": "table",
          "groups": [
            {
              "fields": [
                {
                  "name": "id"
                },
                {
                  "name": "email",
                  "width": 200
                }
              ]
            }
          ]
        }
      },
      "idField": "id"
    }
    "#);
}

#[test]
fn snapshot_omitted_descriptor_drops_dangling_id() {
    let schema = object([("id", number()), ("name", string())])
        .with_id("id")
        .unwrap()
        .omit(["id"])
        .passthrough();

    insta::assert_snapshot!(Schema::from(schema).to_json().unwrap(), @r#"
    {
      "type": "object",
      "fields": [
        {
          "name": "name",
          "schema": {
            "type": "string"
          }
        }
      ],
      "passthrough": true
    }
    "#);
}

// =============================================================================
// Parse Outcome Snapshots
// =============================================================================

#[test]
fn snapshot_failed_parse_outcome() {
    let outcome = object([("email", string())])
        .compile_to_validator()
        .safe_parse(&json!({"email": 5}));

    insta::assert_json_snapshot!(outcome, @r#"
    {
      "success": false,
      "issues": [
        {
          "path": "email",
          "message": "Expected string, received number"
        }
      ]
    }
    "#);
}
