//! Property tests for pruning idempotence and the depth bound.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use std::collections::BTreeMap;
use varscope_core::diff::diff;
use varscope_core::inspect::inspect;
use varscope_core::inspect_record;
use varscope_core::node::{FieldSlot, Metatype, Node, NodeValue};

struct Link {
    value: i64,
    next: Option<Box<Link>>,
}

inspect_record!(Link { value, next });

fn chain(len: usize) -> Link {
    let mut link = Link {
        value: 0,
        next: None,
    };
    for i in 1..len {
        link = Link {
            value: i as i64,
            next: Some(Box::new(link)),
        };
    }
    link
}

/// Every node paired with its distance from the root.
fn levels(node: &Node, level: usize, out: &mut Vec<(usize, Metatype)>) {
    if let Some(metatype) = node.metatype {
        out.push((level, metatype));
    }
    match &node.value {
        NodeValue::Node(child) => levels(child, level + 1, out),
        NodeValue::List(children) => {
            for child in children {
                levels(child, level + 1, out);
            }
        }
        NodeValue::Pairs(pairs) => {
            for pair in pairs {
                levels(&pair.key, level + 1, out);
                levels(&pair.value, level + 1, out);
            }
        }
        NodeValue::Fields(fields) => {
            for child in fields.values().filter_map(FieldSlot::as_node) {
                levels(child, level + 1, out);
            }
        }
        _ => {}
    }
}

fn direct_children(node: &Node) -> Vec<&Node> {
    match &node.value {
        NodeValue::Node(child) => vec![child.as_ref()],
        NodeValue::List(children) => children.iter().collect(),
        NodeValue::Pairs(pairs) => pairs.iter().flat_map(|p| [&p.key, &p.value]).collect(),
        NodeValue::Fields(fields) => fields.values().filter_map(FieldSlot::as_node).collect(),
        _ => Vec::new(),
    }
}

proptest! {
    #[test]
    fn nested_sequences_diff_idempotent(grid in prop::collection::vec(
        prop::collection::vec(any::<i32>(), 0..6), 0..6)) {
        let pruned = diff(inspect("grid", &grid, 5), &inspect("grid", &grid, 5));
        prop_assert!(pruned.unchanged);
        prop_assert!(direct_children(&pruned.tree).iter().all(|n| n.is_unchanged()));
    }

    #[test]
    fn maps_of_records_diff_idempotent(map in prop::collection::btree_map(
        "[a-z]{1,6}", (any::<bool>(), "[ -~]{0,12}"), 0..8)) {
        let map: BTreeMap<String, (bool, String)> = map;
        let pruned = diff(inspect("m", &map, 5), &inspect("m", &map, 5));
        prop_assert!(pruned.unchanged);
        prop_assert!(direct_children(&pruned.tree).iter().all(|n| n.is_unchanged()));
    }

    #[test]
    fn chain_never_exceeds_depth_bound(len in 1usize..12, max_depth in 0usize..8) {
        let link = chain(len);
        let tree = inspect("chain", &link, max_depth);

        let mut seen = Vec::new();
        levels(&tree, 0, &mut seen);

        for (level, metatype) in &seen {
            prop_assert!(*level <= max_depth + 1);
            prop_assert_eq!(*level == max_depth + 1, *metatype == Metatype::Depth);
        }

        // Without a limit the deepest fields sit at level 2 * len - 1.
        let truncated = 2 * len - 1 > max_depth;
        prop_assert_eq!(truncated, seen.iter().any(|(_, m)| *m == Metatype::Depth));
    }
}
