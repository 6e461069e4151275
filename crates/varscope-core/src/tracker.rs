//! Per-variable snapshot history.
//!
//! A [`Tracker`] remembers the last full snapshot taken under each name so
//! that every later observation can be pruned against it.

use crate::diff::{diff, Pruned};
use crate::inspect::{Inspect, Introspector};
use crate::node::Node;
use crate::{log_op_end, log_op_start};
use std::collections::HashMap;
use std::time::Instant;

/// Inspects values and prunes each snapshot against the previous one taken
/// under the same name.
#[derive(Debug, Default)]
pub struct Tracker {
    introspector: Introspector,
    history: HashMap<String, Node>,
}

impl Tracker {
    pub fn new(introspector: Introspector) -> Self {
        Self {
            introspector,
            history: HashMap::new(),
        }
    }

    /// Snapshot `value` under `name` and prune it against the last snapshot
    /// of that name.
    ///
    /// The first observation of a name returns the full tree with
    /// `unchanged == false`. The unpruned tree is kept for the next call.
    pub fn observe(&mut self, name: &str, value: &dyn Inspect) -> Pruned {
        let start = Instant::now();
        log_op_start!("observe", var_name = name);

        let fresh = self.introspector.inspect(name, value);
        let pruned = match self.history.get(name) {
            Some(previous) => diff(fresh.clone(), previous),
            None => Pruned {
                tree: fresh.clone(),
                unchanged: false,
            },
        };
        self.history.insert(name.to_string(), fresh);

        log_op_end!(
            "observe",
            duration_ms = start.elapsed().as_millis() as u64,
            var_name = name,
            unchanged = pruned.unchanged,
            pruned = pruned.pruned_count()
        );
        pruned
    }

    /// Drop the history for `name`; its next observation is treated as the
    /// first. Returns whether any history existed.
    pub fn forget(&mut self, name: &str) -> bool {
        self.history.remove(name).is_some()
    }

    /// Last unpruned snapshot taken under `name`.
    pub fn last(&self, name: &str) -> Option<&Node> {
        self.history.get(name)
    }

    /// Number of names with history.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn introspector(&self) -> &Introspector {
        &self.introspector
    }
}
