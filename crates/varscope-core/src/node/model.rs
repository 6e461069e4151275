//! Snapshot tree types.
//!
//! A [`Node`] describes one value encountered during a walk. Its `metatype`
//! fixes the shape of `value`; see [`NodeValue`] for the correspondence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value of a pointer node whose reference is nil.
pub const NULL_PLACEHOLDER: &str = "#NULL#";
/// Value of a node standing in for an already-entered referent.
pub const VISITED_PLACEHOLDER: &str = "#VISITED#";
/// Value of a node emitted past the depth limit.
pub const DEPTH_PLACEHOLDER: &str = "#DEPTH_EXCEEDED#";
/// Value of a record field the value refused to expose.
pub const UNEXPORTED_PLACEHOLDER: &str = "#UNEXPORTED#";
pub const COMPLEX_PLACEHOLDER: &str = "#COMPLEX#";
pub const INTERFACE_PLACEHOLDER: &str = "#INTERFACE#";
pub const FUNCTION_PLACEHOLDER: &str = "#FUNCTION#";
pub const CHANNEL_PLACEHOLDER: &str = "#CHANNEL#";

/// Type name recorded on untyped nil nodes.
pub const NIL_TYPE_NAME: &str = "nil";
/// Type name recorded on depth-exceeded nodes.
pub const DEPTH_TYPE_NAME: &str = "depth";

/// Shape category of a node's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metatype {
    Nil,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Complex,
    #[serde(rename = "unsafeptr")]
    UnsafePtr,
    Ptr,
    Visited,
    Depth,
    Array,
    Slice,
    Map,
    Struct,
    Function,
    Chan,
    Interface,
    Unknown,
    Unchanged,
}

impl Metatype {
    /// Wire name, as it appears in serialized snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metatype::Nil => "nil",
            Metatype::Bool => "bool",
            Metatype::Int => "int",
            Metatype::Uint => "uint",
            Metatype::Float => "float",
            Metatype::String => "string",
            Metatype::Complex => "complex",
            Metatype::UnsafePtr => "unsafeptr",
            Metatype::Ptr => "ptr",
            Metatype::Visited => "visited",
            Metatype::Depth => "depth",
            Metatype::Array => "array",
            Metatype::Slice => "slice",
            Metatype::Map => "map",
            Metatype::Struct => "struct",
            Metatype::Function => "function",
            Metatype::Chan => "chan",
            Metatype::Interface => "interface",
            Metatype::Unknown => "unknown",
            Metatype::Unchanged => "unchanged",
        }
    }

    /// Sequences, maps and records: the shapes whose storage location is
    /// recorded when they appear as a child.
    pub fn is_reference_bearing(&self) -> bool {
        matches!(
            self,
            Metatype::Array | Metatype::Slice | Metatype::Map | Metatype::Struct
        )
    }
}

impl fmt::Display for Metatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One key/value entry of a `map` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub key: Node,
    pub value: Node,
}

/// A record field: either a nested node or a placeholder string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSlot {
    Node(Node),
    Placeholder(String),
}

impl FieldSlot {
    pub fn unexported() -> Self {
        FieldSlot::Placeholder(UNEXPORTED_PLACEHOLDER.to_string())
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            FieldSlot::Node(node) => Some(node),
            FieldSlot::Placeholder(_) => None,
        }
    }
}

/// Payload of a node.
///
/// | metatype | variant |
/// |---|---|
/// | nil, unchanged | `Null` |
/// | bool / int / uint / float | `Bool` / `Int` / `Uint` / `Float` |
/// | string, placeholders, unknown | `Text` |
/// | ptr | `Node` or `Text("#NULL#")` |
/// | array, slice | `List` |
/// | map | `Pairs` |
/// | struct | `Fields` |
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum NodeValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Node(Box<Node>),
    List(Vec<Node>),
    Pairs(Vec<Pair>),
    Fields(BTreeMap<String, FieldSlot>),
}

/// Coarse classification of a [`NodeValue`], used by the differ to reject
/// pairs whose payloads cannot be compared element-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Nil,
    Nested,
    List,
    Pairs,
    Fields,
    Scalar,
}

impl NodeValue {
    pub fn shape(&self) -> ValueShape {
        match self {
            NodeValue::Null => ValueShape::Nil,
            NodeValue::Node(_) => ValueShape::Nested,
            NodeValue::List(_) => ValueShape::List,
            NodeValue::Pairs(_) => ValueShape::Pairs,
            NodeValue::Fields(_) => ValueShape::Fields,
            NodeValue::Bool(_)
            | NodeValue::Int(_)
            | NodeValue::Uint(_)
            | NodeValue::Float(_)
            | NodeValue::Text(_) => ValueShape::Scalar,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            NodeValue::Node(node) => Some(node),
            _ => None,
        }
    }
}

/// A snapshot tree node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "super::wire::RawNode")]
pub struct Node {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub metatype: Option<Metatype>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "len", skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(rename = "cap", skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    pub value: NodeValue,
}

impl Node {
    /// Untyped node with no metatype. Only exists transiently while a walk
    /// fills it in.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Node of the given type and shape with no address, length or name.
    pub fn typed(type_name: impl Into<String>, metatype: Metatype, value: NodeValue) -> Self {
        Self {
            type_name: Some(type_name.into()),
            metatype: Some(metatype),
            value,
            ..Self::default()
        }
    }

    pub fn nil() -> Self {
        Self::typed(NIL_TYPE_NAME, Metatype::Nil, NodeValue::Null)
    }

    pub fn depth_exceeded() -> Self {
        Self::typed(
            DEPTH_TYPE_NAME,
            Metatype::Depth,
            NodeValue::Text(DEPTH_PLACEHOLDER.to_string()),
        )
    }

    /// Stand-in for a referent that was already entered during this walk.
    pub fn visited(type_name: impl Into<String>, address: impl Into<String>) -> Self {
        Self::typed(
            type_name,
            Metatype::Visited,
            NodeValue::Text(VISITED_PLACEHOLDER.to_string()),
        )
        .with_address(address)
    }

    /// Pruning marker produced by the differ.
    pub fn unchanged() -> Self {
        Self {
            metatype: Some(Metatype::Unchanged),
            ..Self::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_unchanged(&self) -> bool {
        self.metatype == Some(Metatype::Unchanged)
    }

    pub fn is_null_pointer(&self) -> bool {
        self.metatype == Some(Metatype::Ptr) && self.value.as_text() == Some(NULL_PLACEHOLDER)
    }

    /// Serialize as indented JSON, the form records are stored in.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error; with the types in this
    /// module that only happens for map keys that are not strings, which
    /// `Node` never produces.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Iterate over this node and every nested node, depth first.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Depth-first iterator over a node and everything below it.
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        match &node.value {
            NodeValue::Node(child) => self.stack.push(child),
            NodeValue::List(children) => self.stack.extend(children.iter().rev()),
            NodeValue::Pairs(pairs) => {
                for pair in pairs.iter().rev() {
                    self.stack.push(&pair.value);
                    self.stack.push(&pair.key);
                }
            }
            NodeValue::Fields(fields) => {
                self.stack
                    .extend(fields.values().rev().filter_map(FieldSlot::as_node));
            }
            _ => {}
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_has_no_metatype() {
        let node = Node::blank();
        assert!(node.metatype.is_none());
        assert_eq!(node.value, NodeValue::Null);
    }

    #[test]
    fn test_metatype_wire_names_match_serde() {
        for metatype in [Metatype::UnsafePtr, Metatype::Ptr, Metatype::Chan, Metatype::Struct] {
            let json = serde_json::to_value(metatype).unwrap();
            assert_eq!(json, serde_json::json!(metatype.as_str()));
        }
    }

    #[test]
    fn test_descendants_visits_every_node() {
        let mut fields = BTreeMap::new();
        fields.insert(
            "a".to_string(),
            FieldSlot::Node(Node::typed("i64", Metatype::Int, NodeValue::Int(1))),
        );
        fields.insert("b".to_string(), FieldSlot::unexported());
        let record = Node::typed("R", Metatype::Struct, NodeValue::Fields(fields));
        let list = Node::typed(
            "Vec<R>",
            Metatype::Slice,
            NodeValue::List(vec![record.clone(), record]),
        );

        assert_eq!(list.descendants().count(), 5);
    }

    #[test]
    fn test_null_pointer_detection() {
        let null = Node::typed(
            "Option<Box<i32>>",
            Metatype::Ptr,
            NodeValue::Text(NULL_PLACEHOLDER.to_string()),
        );
        assert!(null.is_null_pointer());
        assert!(!Node::nil().is_null_pointer());
    }
}
