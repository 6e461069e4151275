//! Decoding stored snapshots back into [`Node`] trees.
//!
//! `NodeValue` is untagged on the wire, so a payload is only meaningful next
//! to its `metatype`. Decoding goes through [`RawNode`], which keeps the
//! payload as plain JSON until the metatype is known.

use super::model::{FieldSlot, Metatype, Node, NodeValue, Pair};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub(crate) struct RawNode {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    type_name: Option<String>,
    #[serde(default)]
    metatype: Option<Metatype>,
    #[serde(default)]
    address: Option<String>,
    #[serde(rename = "len", default)]
    length: Option<usize>,
    #[serde(rename = "cap", default)]
    capacity: Option<usize>,
    #[serde(default)]
    value: Value,
}

impl TryFrom<RawNode> for Node {
    type Error = String;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let value = match raw.metatype {
            None | Some(Metatype::Nil) | Some(Metatype::Unchanged) => NodeValue::Null,
            Some(Metatype::Ptr) => match raw.value {
                Value::String(text) => NodeValue::Text(text),
                other => NodeValue::Node(Box::new(decode::<Node>(other, "ptr")?)),
            },
            Some(Metatype::Array) | Some(Metatype::Slice) => {
                NodeValue::List(decode::<Vec<Node>>(raw.value, "sequence")?)
            }
            Some(Metatype::Map) => NodeValue::Pairs(decode::<Vec<Pair>>(raw.value, "map")?),
            Some(Metatype::Struct) => {
                NodeValue::Fields(decode::<BTreeMap<String, FieldSlot>>(raw.value, "struct")?)
            }
            Some(metatype) => scalar(raw.value, metatype)?,
        };

        Ok(Node {
            name: raw.name,
            type_name: raw.type_name,
            metatype: raw.metatype,
            address: raw.address,
            length: raw.length,
            capacity: raw.capacity,
            value,
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Result<T, String> {
    serde_json::from_value(value).map_err(|e| format!("malformed {} value: {}", what, e))
}

fn scalar(value: Value, metatype: Metatype) -> Result<NodeValue, String> {
    match value {
        Value::Null => Ok(NodeValue::Null),
        Value::Bool(b) => Ok(NodeValue::Bool(b)),
        Value::String(text) => Ok(NodeValue::Text(text)),
        Value::Number(n) => {
            // Unsigned metatypes keep u64 even for small values so that a
            // decoded tree compares equal to a freshly inspected one.
            if metatype == Metatype::Uint {
                if let Some(u) = n.as_u64() {
                    return Ok(NodeValue::Uint(u));
                }
            }
            if metatype != Metatype::Float {
                if let Some(i) = n.as_i64() {
                    return Ok(NodeValue::Int(i));
                }
                if let Some(u) = n.as_u64() {
                    return Ok(NodeValue::Uint(u));
                }
            }
            n.as_f64()
                .map(NodeValue::Float)
                .ok_or_else(|| format!("unrepresentable number {}", n))
        }
        other => Err(format!(
            "{} node cannot carry a composite value: {}",
            metatype, other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uint_stays_unsigned() {
        let node: Node = serde_json::from_value(json!({
            "type": "u8", "metatype": "uint", "value": 7
        }))
        .unwrap();
        assert_eq!(node.value, NodeValue::Uint(7));
    }

    #[test]
    fn test_whole_float_stays_float() {
        let node: Node = serde_json::from_value(json!({
            "type": "f64", "metatype": "float", "value": 2.0
        }))
        .unwrap();
        assert_eq!(node.value, NodeValue::Float(2.0));
    }

    #[test]
    fn test_null_pointer_decodes_as_text() {
        let node: Node = serde_json::from_value(json!({
            "type": "Option<Box<i32>>", "metatype": "ptr", "value": "#NULL#"
        }))
        .unwrap();
        assert!(node.is_null_pointer());
    }

    #[test]
    fn test_struct_with_unexported_field() {
        let node: Node = serde_json::from_value(json!({
            "type": "Account",
            "metatype": "struct",
            "value": {
                "owner": {"type": "String", "metatype": "string", "len": 3, "value": "ann"},
                "pin": "#UNEXPORTED#"
            }
        }))
        .unwrap();
        let NodeValue::Fields(fields) = &node.value else {
            panic!("expected fields, got {:?}", node.value);
        };
        assert!(fields["owner"].as_node().is_some());
        assert_eq!(fields["pin"], FieldSlot::unexported());
    }

    #[test]
    fn test_composite_scalar_rejected() {
        let result: Result<Node, _> = serde_json::from_value(json!({
            "type": "i32", "metatype": "int", "value": [1, 2]
        }));
        assert!(result.is_err());
    }
}
