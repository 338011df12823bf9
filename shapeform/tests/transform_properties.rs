//! Property-based tests for the shape transformation engine.

use proptest::prelude::*;
use proptest::{collection, sample};
use serde_json::{json, Map, Value};
use shapeform::layout::{FormLayout, LayoutGroup, TableLayout};
use shapeform::{number, object, string, ObjectSchema};
use std::collections::BTreeSet;

const POOL: [&str; 8] = ["id", "name", "email", "age", "city", "zip", "note", "tags"];

// =============================================================================
// Strategies
// =============================================================================

/// A distinct, non-empty subset of the field name pool, in pool order.
fn arb_keys() -> impl Strategy<Value = Vec<&'static str>> {
    sample::subsequence(POOL.to_vec(), 1..=POOL.len())
}

fn arb_subset() -> impl Strategy<Value = Vec<&'static str>> {
    sample::subsequence(POOL.to_vec(), 0..=POOL.len())
}

fn string_object(keys: &[&str]) -> ObjectSchema {
    object(keys.iter().map(|k| (*k, string())))
}

fn sample_value(keys: &[&str]) -> Value {
    let map: Map<String, Value> = keys
        .iter()
        .map(|k| (k.to_string(), json!(format!("v-{k}"))))
        .collect();
    Value::Object(map)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn omit_then_extend_key_algebra(
        keys in arb_keys(),
        omitted in arb_subset(),
        added in arb_subset(),
    ) {
        let schema = string_object(&keys)
            .omit(&omitted)
            .extend(added.iter().map(|k| (*k, number())));

        let expected: BTreeSet<&str> = keys
            .iter()
            .filter(|k| !omitted.contains(k))
            .chain(added.iter())
            .copied()
            .collect();
        let actual: BTreeSet<&str> = schema.keys().into_iter().collect();
        prop_assert_eq!(actual, expected);

        for k in &added {
            prop_assert_eq!(
                schema.field(k).map(|s| s.schema_type()),
                Some(shapeform::SchemaType::Number)
            );
        }
    }

    #[test]
    fn omit_never_mutates_receiver(keys in arb_keys(), omitted in arb_subset()) {
        let base = string_object(&keys);
        let _ = base.omit(&omitted);
        prop_assert_eq!(base.keys(), keys);
    }

    #[test]
    fn partial_accepts_empty_and_full(keys in arb_keys()) {
        let validator = string_object(&keys).partial().compile_to_validator();
        prop_assert_eq!(validator.parse(&json!({})).unwrap(), json!({}));
        let full = sample_value(&keys);
        prop_assert_eq!(validator.parse(&full).unwrap(), full);
    }

    #[test]
    fn explicit_nulls_survive_parsing(keys in arb_keys(), nulled in arb_subset()) {
        let schema = string_object(&keys).partial();
        let mut input = sample_value(&keys);
        for k in nulled.iter().copied().filter(|k| keys.contains(k)) {
            input[k] = Value::Null;
        }

        let parsed = schema.compile_to_validator().parse(&input).unwrap();
        prop_assert_eq!(parsed, input);
    }

    #[test]
    fn parsed_output_is_restricted_to_declared_fields(
        keys in arb_keys(),
        extras in collection::btree_map("[a-z]{3,6}_x", any::<i32>(), 0..4),
    ) {
        let schema = string_object(&keys);
        let mut input = sample_value(&keys);
        for (k, v) in &extras {
            input[k.as_str()] = json!(v);
        }

        let stripped = schema.compile_to_validator().parse(&input).unwrap();
        prop_assert_eq!(stripped, sample_value(&keys));

        let kept = schema.passthrough().compile_to_validator().parse(&input).unwrap();
        prop_assert_eq!(&kept, &input);

        let numeric = schema.catchall(number()).compile_to_validator().parse(&input).unwrap();
        prop_assert_eq!(&numeric, &input);
    }

    #[test]
    fn catchall_rejects_mistyped_extra(keys in arb_keys(), extra in "[a-z]{3,6}_x") {
        let mut input = sample_value(&keys);
        input[extra.as_str()] = json!("not a number");
        let validator = string_object(&keys).catchall(number()).compile_to_validator();
        let err = validator.parse(&input).unwrap_err();
        prop_assert_eq!(err.paths(), vec![extra.as_str()]);
    }

    #[test]
    fn layouts_reference_only_remaining_keys_after_omit(
        keys in arb_keys(),
        omitted in arb_subset(),
        split in 0usize..8,
    ) {
        let (left, right) = keys.split_at(split.min(keys.len()));
        let form = FormLayout::new()
            .group(left.iter().fold(LayoutGroup::titled("Left"), |g, k| g.field(*k)))
            .group(right.iter().fold(LayoutGroup::titled("Right"), |g, k| g.field(*k)));
        let table = keys.iter().fold(TableLayout::new(), |t, k| t.field(*k));

        let schema = string_object(&keys)
            .with_form_layouts([("form", form)])
            .with_table_layouts([("table", table)])
            .omit(&omitted);

        prop_assert!(schema.dangling_layout_fields().is_empty());
        for (_, layout) in schema.layouts() {
            for field in layout.fields() {
                prop_assert!(!omitted.contains(&field.name.as_str()));
            }
        }
        prop_assert_eq!(schema.layout("form").unwrap().groups.len(), 2);
    }
}
