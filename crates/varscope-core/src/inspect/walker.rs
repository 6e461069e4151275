//! Value graph walker.
//!
//! Turns [`Shape`] descriptions into [`Node`] trees, bounded by a maximum
//! depth and protected against reference cycles by a per-walk cache.

use crate::config::Config;
use crate::inspect::{Field, Identity, Inspect, Shape};
use crate::node::{
    FieldSlot, Metatype, Node, NodeValue, Pair, CHANNEL_PLACEHOLDER, COMPLEX_PLACEHOLDER,
    FUNCTION_PLACEHOLDER, INTERFACE_PLACEHOLDER, NULL_PLACEHOLDER,
};
use std::collections::{BTreeMap, HashSet};

/// Produces snapshot trees up to a fixed depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Introspector {
    max_depth: usize,
}

impl Default for Introspector {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Introspector {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_depth)
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Snapshot `value` under `name`.
    ///
    /// Never fails: anything that cannot be decomposed is recorded as a
    /// placeholder. Each call starts with an empty cycle cache.
    pub fn inspect(&self, name: &str, value: &dyn Inspect) -> Node {
        let mut walk = Walk {
            max_depth: self.max_depth,
            entered: HashSet::new(),
            detached: false,
        };
        walk.value(value, 0).with_name(name)
    }
}

/// Snapshot `value` under `name` with the given depth limit.
pub fn inspect(name: &str, value: &dyn Inspect, max_depth: usize) -> Node {
    Introspector::new(max_depth).inspect(name, value)
}

/// State of a single walk.
struct Walk {
    max_depth: usize,
    // Referents already entered, keyed by address and type name so that a
    // record and its first field (same address, different type) stay distinct.
    entered: HashSet<(Identity, String)>,
    // Set while walking a temporary copy, whose addresses are meaningless.
    detached: bool,
}

impl Walk {
    fn value(&mut self, value: &dyn Inspect, depth: usize) -> Node {
        if depth > self.max_depth {
            return Node::depth_exceeded();
        }
        let type_name = value.type_name();
        value.describe(&mut |shape: Shape<'_>| self.build(&type_name, shape, depth))
    }

    /// Walk a sequence element, record field or map value, recording its
    /// storage address when it is reference-bearing.
    fn child(&mut self, value: &dyn Inspect, depth: usize) -> Node {
        let node = self.value(value, depth);
        match node.metatype {
            Some(metatype) if metatype.is_reference_bearing() && !self.detached => {
                node.with_address(Identity::of(value).to_string())
            }
            _ => node,
        }
    }

    fn referent(&mut self, target: &dyn Inspect, depth: usize) -> Node {
        let identity = Identity::of(target);
        let key = (identity, target.type_name().into_owned());
        if self.entered.contains(&key) {
            return Node::visited(key.1, identity.to_string());
        }
        let next = depth + 1;
        if next <= self.max_depth {
            self.entered.insert(key);
        }
        let detached = std::mem::replace(&mut self.detached, false);
        let node = self.value(target, next);
        self.detached = detached;
        node.with_address(identity.to_string())
    }

    fn build(&mut self, type_name: &str, shape: Shape<'_>, depth: usize) -> Node {
        let next = depth + 1;
        match shape {
            Shape::Nil => Node::nil(),
            Shape::Bool(b) => Node::typed(type_name, Metatype::Bool, NodeValue::Bool(b)),
            Shape::Int(i) => Node::typed(type_name, Metatype::Int, NodeValue::Int(i)),
            Shape::Uint(u) => Node::typed(type_name, Metatype::Uint, NodeValue::Uint(u)),
            Shape::Float(f) if f.is_finite() => {
                Node::typed(type_name, Metatype::Float, NodeValue::Float(f))
            }
            Shape::Float(f) => placeholder(type_name, Metatype::Float, non_finite(f)),
            Shape::Str(text) => {
                let mut node = Node::typed(
                    type_name,
                    Metatype::String,
                    NodeValue::Text(text.to_string()),
                );
                node.length = Some(text.len());
                node
            }
            Shape::Complex => placeholder(type_name, Metatype::Complex, COMPLEX_PLACEHOLDER),
            Shape::UnsafePointer(address) => Node::typed(
                type_name,
                Metatype::UnsafePtr,
                NodeValue::Text(format!("{:#x}", address)),
            ),
            Shape::Detached(copy) => {
                let detached = std::mem::replace(&mut self.detached, true);
                let node =
                    copy.describe(&mut |shape: Shape<'_>| self.build(type_name, shape, depth));
                self.detached = detached;
                node
            }
            Shape::Pointer(None) => placeholder(type_name, Metatype::Ptr, NULL_PLACEHOLDER),
            Shape::Pointer(Some(target)) => {
                let referent = self.referent(target, depth);
                Node::typed(type_name, Metatype::Ptr, NodeValue::Node(Box::new(referent)))
            }
            Shape::Array(elements) => {
                let len = elements.len();
                self.sequence(type_name, Metatype::Array, elements, len, next)
            }
            Shape::Slice { elements, capacity } => {
                self.sequence(type_name, Metatype::Slice, elements, capacity, next)
            }
            Shape::Map(entries) => {
                let len = entries.len();
                let pairs = entries
                    .into_iter()
                    .map(|(key, value)| Pair {
                        key: self.value(key, next),
                        value: self.child(value, next),
                    })
                    .collect();
                let mut node = Node::typed(type_name, Metatype::Map, NodeValue::Pairs(pairs));
                node.length = Some(len);
                node
            }
            Shape::Record(fields) => {
                let slots = self.fields(fields, next);
                Node::typed(type_name, Metatype::Struct, NodeValue::Fields(slots))
            }
            Shape::Function => placeholder(type_name, Metatype::Function, FUNCTION_PLACEHOLDER),
            Shape::Channel => placeholder(type_name, Metatype::Chan, CHANNEL_PLACEHOLDER),
            Shape::Dynamic => placeholder(type_name, Metatype::Interface, INTERFACE_PLACEHOLDER),
            Shape::Unknown(text) => Node::typed(type_name, Metatype::Unknown, NodeValue::Text(text)),
        }
    }

    fn sequence(
        &mut self,
        type_name: &str,
        metatype: Metatype,
        elements: Vec<&dyn Inspect>,
        capacity: usize,
        depth: usize,
    ) -> Node {
        let len = elements.len();
        let children = elements
            .into_iter()
            .map(|element| self.child(element, depth))
            .collect();
        let mut node = Node::typed(type_name, metatype, NodeValue::List(children));
        node.length = Some(len);
        node.capacity = Some(capacity);
        node
    }

    fn fields(&mut self, fields: Vec<Field<'_>>, depth: usize) -> BTreeMap<String, FieldSlot> {
        fields
            .into_iter()
            .map(|field| {
                let slot = match field.value {
                    Some(value) => FieldSlot::Node(self.child(value, depth)),
                    None => FieldSlot::unexported(),
                };
                (field.name.into_owned(), slot)
            })
            .collect()
    }
}

/// JSON has no infinities or NaN, so these are stored as text.
fn non_finite(f: f64) -> &'static str {
    if f.is_nan() {
        "NaN"
    } else if f.is_sign_positive() {
        "+Inf"
    } else {
        "-Inf"
    }
}

fn placeholder(type_name: &str, metatype: Metatype, text: &str) -> Node {
    Node::typed(type_name, metatype, NodeValue::Text(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{DEPTH_PLACEHOLDER, VISITED_PLACEHOLDER};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_root_carries_name() {
        let node = inspect("answer", &42i32, 5);
        assert_eq!(node.name.as_deref(), Some("answer"));
        assert_eq!(node.metatype, Some(Metatype::Int));
        assert_eq!(node.value, NodeValue::Int(42));
        assert!(node.address.is_none());
    }

    #[test]
    fn test_zero_depth_still_walks_root() {
        let node = inspect("xs", &vec![1u8], 0);
        let NodeValue::List(children) = &node.value else {
            panic!("expected list, got {:?}", node.value);
        };
        assert_eq!(children[0].value.as_text(), Some(DEPTH_PLACEHOLDER));
    }

    #[test]
    fn test_self_reference_is_visited() {
        struct Cell {
            next: RefCell<Option<Rc<Cell>>>,
        }
        crate::inspect_record!(Cell { next });

        let cell = Rc::new(Cell {
            next: RefCell::new(None),
        });
        *cell.next.borrow_mut() = Some(Rc::clone(&cell));

        let node = inspect("cell", &cell, 10);
        let visited = node
            .descendants()
            .find(|n| n.metatype == Some(Metatype::Visited))
            .expect("cycle should produce a visited node");
        assert_eq!(visited.value.as_text(), Some(VISITED_PLACEHOLDER));

        let referent = node.value.as_node().unwrap();
        assert_eq!(visited.address, referent.address);

        // break the cycle so the test does not leak
        cell.next.borrow_mut().take();
    }

    #[test]
    fn test_sibling_references_to_same_value_share_identity() {
        let shared = 7i64;
        let pair = vec![&shared, &shared];
        let node = inspect("pair", &pair, 5);
        let NodeValue::List(children) = &node.value else {
            panic!("expected list");
        };
        assert_eq!(children[0].metatype, Some(Metatype::Ptr));
        assert_eq!(
            children[1].value.as_node().and_then(|n| n.metatype),
            Some(Metatype::Visited)
        );
    }
}
