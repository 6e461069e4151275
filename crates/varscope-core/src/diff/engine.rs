//! Pairwise node comparison with in-place pruning of the newer tree.

use crate::node::{FieldSlot, Metatype, Node, NodeValue};

/// Outcome of [`diff`].
#[derive(Debug, Clone, PartialEq)]
pub struct Pruned {
    /// The newer tree with matched descendants replaced by `unchanged` nodes.
    pub tree: Node,
    /// Whether the newer tree is identical to the previous one.
    pub unchanged: bool,
}

impl Pruned {
    /// Number of `unchanged` markers in the pruned tree.
    pub fn pruned_count(&self) -> usize {
        self.tree.descendants().filter(|n| n.is_unchanged()).count()
    }
}

/// Compare `current` against `previous` and prune what matched.
///
/// The root itself is never replaced, even when the trees are identical;
/// `unchanged` reports that instead.
pub fn diff(mut current: Node, previous: &Node) -> Pruned {
    if current.name != previous.name {
        return Pruned {
            tree: current,
            unchanged: false,
        };
    }
    let unchanged = compare(&mut current, previous);
    Pruned {
        tree: current,
        unchanged,
    }
}

/// Returns whether the two nodes match, replacing matched children of
/// `current` with `unchanged` nodes along the way.
fn compare(current: &mut Node, previous: &Node) -> bool {
    if current.metatype != previous.metatype || current.type_name != previous.type_name {
        return false;
    }
    if current.value.shape() != previous.value.shape() {
        return false;
    }
    if current.address != previous.address {
        return false;
    }

    match (current.metatype, &mut current.value, &previous.value) {
        // Nil pointers carry text and never match.
        (Some(Metatype::Ptr), NodeValue::Node(cur), NodeValue::Node(prev)) => compare(cur, prev),
        (Some(Metatype::Ptr), _, _) => false,
        (Some(Metatype::Array | Metatype::Slice), NodeValue::List(cur), NodeValue::List(prev)) => {
            let mut same = true;
            for (c, p) in cur.iter_mut().zip(prev) {
                same &= prune(c, p);
            }
            same && cur.len() == prev.len()
        }
        (Some(Metatype::Map), NodeValue::Pairs(cur), NodeValue::Pairs(prev)) => {
            let mut same = true;
            for (c, p) in cur.iter_mut().zip(prev) {
                same &= prune(&mut c.key, &p.key);
                same &= prune(&mut c.value, &p.value);
            }
            same && cur.len() == prev.len()
        }
        (Some(Metatype::Struct), NodeValue::Fields(cur), NodeValue::Fields(prev)) => {
            let mut same = true;
            for (name, slot) in cur.iter_mut() {
                same &= match (slot, prev.get(name)) {
                    (FieldSlot::Node(c), Some(FieldSlot::Node(p))) => prune(c, p),
                    (FieldSlot::Placeholder(c), Some(FieldSlot::Placeholder(p))) => *c == *p,
                    _ => false,
                };
            }
            same && cur.len() == prev.len()
        }
        (Some(Metatype::Array | Metatype::Slice | Metatype::Map | Metatype::Struct), _, _) => {
            false
        }
        (_, cur, prev) => *cur == *prev,
    }
}

/// Compare a child pair and replace the child with an `unchanged` node on a
/// match.
fn prune(current: &mut Node, previous: &Node) -> bool {
    let same = compare(current, previous);
    if same {
        *current = Node::unchanged();
    }
    same
}
