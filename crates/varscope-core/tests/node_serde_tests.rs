#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::{json, Value};
use std::collections::BTreeMap;
use varscope_core::diff::diff;
use varscope_core::inspect::inspect;
use varscope_core::inspect_record;
use varscope_core::node::Node;

struct Order {
    id: u32,
    customer: Option<Box<String>>,
    lines: BTreeMap<String, f64>,
    note: String,
}

inspect_record!(Order { id, customer, lines } hidden { note });

fn order() -> Order {
    let mut lines = BTreeMap::new();
    lines.insert("apples".to_string(), 2.5);
    lines.insert("pears".to_string(), 1.0);
    Order {
        id: 7,
        customer: Some(Box::new("ann".to_string())),
        lines,
        note: "internal".to_string(),
    }
}

#[test]
fn test_json_shape_of_record() {
    let value: Value = serde_json::to_value(inspect("order", &order(), 5)).unwrap();

    assert_eq!(value["name"], json!("order"));
    assert_eq!(value["metatype"], json!("struct"));
    assert!(value.get("address").is_none());
    assert!(value.get("len").is_none());

    let fields = &value["value"];
    assert_eq!(fields["id"]["metatype"], json!("uint"));
    assert_eq!(fields["id"]["value"], json!(7));
    assert_eq!(fields["note"], json!("#UNEXPORTED#"));

    let lines = &fields["lines"];
    assert_eq!(lines["metatype"], json!("map"));
    assert_eq!(lines["len"], json!(2));
    assert!(lines["address"].is_string());
    assert_eq!(lines["value"][0]["key"]["value"], json!("apples"));
    assert_eq!(lines["value"][0]["value"]["value"], json!(2.5));

    let customer = &fields["customer"];
    assert_eq!(customer["metatype"], json!("ptr"));
    assert_eq!(customer["value"]["metatype"], json!("string"));
    assert_eq!(customer["value"]["len"], json!(3));
    assert!(customer["value"]["address"].is_string());
}

#[test]
fn test_unchanged_marker_serializes_bare() {
    let o = order();
    let pruned = diff(inspect("order", &o, 5), &inspect("order", &o, 5));
    let value: Value = serde_json::to_value(&pruned.tree).unwrap();

    assert_eq!(
        value["value"]["id"],
        json!({"metatype": "unchanged", "value": null})
    );
}

#[test]
fn test_stored_snapshot_decodes_to_same_tree() {
    let tree = inspect("order", &order(), 5);
    let text = tree.to_json_pretty().unwrap();

    let decoded: Node = serde_json::from_str(&text).unwrap();

    assert_eq!(decoded, tree);
}

#[test]
fn test_pruned_snapshot_decodes() {
    let mut o = order();
    let before = inspect("order", &o, 5);
    o.id = 8;
    let pruned = diff(inspect("order", &o, 5), &before);

    let text = pruned.tree.to_json_pretty().unwrap();
    let decoded: Node = serde_json::from_str(&text).unwrap();

    assert_eq!(decoded, pruned.tree);
}

#[test]
fn test_unknown_metatype_is_rejected() {
    let result: Result<Node, _> = serde_json::from_value(json!({
        "type": "i32", "metatype": "quaternion", "value": 1
    }));
    assert!(result.is_err());
}

#[test]
fn test_non_finite_floats_survive_storage() {
    let readings = vec![1.25, f64::INFINITY, f64::NEG_INFINITY, f64::NAN];
    let tree = inspect("readings", &readings, 5);

    let value: Value = serde_json::to_value(&tree).unwrap();
    assert_eq!(value["value"][1]["value"], json!("+Inf"));
    assert_eq!(value["value"][3]["value"], json!("NaN"));

    let decoded: Node = serde_json::from_str(&tree.to_json_pretty().unwrap()).unwrap();
    assert_eq!(decoded, tree);
}

#[test]
fn test_repeated_nan_is_pruned() {
    let pruned = diff(inspect("f", &f64::NAN, 5), &inspect("f", &f64::NAN, 5));
    assert!(pruned.unchanged);
}
