//! Search tree nodes.
//!
//! Nodes live in an arena (see [`tree`](super::tree)) and point at each
//! other by index: a non-owning parent back-reference for backpropagation
//! and one child slot per action in the vocabulary. An empty slot is an
//! unexpanded action.

use serde::{Deserialize, Serialize};

use crate::core::ACTION_COUNT;

/// Index into the search tree's node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// One decision point in the lookahead tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchNode {
    /// Parent node (NONE for the root).
    pub parent: NodeId,

    /// Index of the action that led here from the parent.
    pub action_index: u8,

    /// Depth in the tree (root = 0).
    pub depth: u16,

    /// Backpropagations through this node.
    pub visits: u32,

    /// Sum of all backpropagated results.
    pub value_sum: f64,

    /// Smallest result ever backpropagated through this node.
    pub lo: f64,

    /// Largest result ever backpropagated through this node.
    pub hi: f64,

    /// Child slot per action; NONE means unexpanded.
    pub children: [NodeId; ACTION_COUNT],
}

impl SearchNode {
    /// Create a new node reached from `parent` by action `action_index`.
    #[must_use]
    pub fn new(parent: NodeId, action_index: u8, depth: u16) -> Self {
        Self {
            parent,
            action_index,
            depth,
            visits: 0,
            value_sum: 0.0,
            lo: f64::INFINITY,
            hi: f64::NEG_INFINITY,
            children: [NodeId::NONE; ACTION_COUNT],
        }
    }

    /// Create a root node.
    #[must_use]
    pub fn root() -> Self {
        Self::new(NodeId::NONE, 0, 0)
    }

    /// Check whether every child slot is filled.
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.children.iter().all(|c| !c.is_none())
    }

    /// Indices of unexpanded child slots.
    pub fn unexpanded_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
    }

    /// Fold one simulation result into this node's statistics.
    ///
    /// Visit count, value sum, and bounds move together; callers never see
    /// a partial update.
    pub fn record(&mut self, result: f64) {
        self.visits += 1;
        self.value_sum += result;
        if result < self.lo {
            self.lo = result;
        }
        if result > self.hi {
            self.hi = result;
        }
    }

    /// Mean backpropagated value, with the division guarded by epsilon.
    #[must_use]
    pub fn mean(&self, epsilon: f64) -> f64 {
        self.value_sum / (self.visits as f64 + epsilon)
    }

    /// Mean value mapped into [0, 1] through this node's own observed
    /// bounds. Degenerate bounds leave the mean untouched.
    #[must_use]
    pub fn normalized_mean(&self, epsilon: f64) -> f64 {
        normalise(self.mean(epsilon), self.lo, self.hi)
    }
}

/// Map `value` into [0, 1] relative to [min, max]; identity when the range
/// is empty or inverted.
#[must_use]
pub(crate) fn normalise(value: f64, min: f64, max: f64) -> f64 {
    if min < max {
        (value - min) / (max - min)
    } else {
        value
    }
}

/// Perturb `value` by a relative epsilon-bounded amount to break exact
/// ties. `r` is a uniform draw from [0, 1).
#[must_use]
pub(crate) fn noise(value: f64, epsilon: f64, r: f64) -> f64 {
    (value + epsilon) * (1.0 + epsilon * (r - 0.5))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(5);
        assert_eq!(id.raw(), 5);
        assert!(!id.is_none());
        assert!(NodeId::NONE.is_none());
    }

    #[test]
    fn test_root_node() {
        let node = SearchNode::root();

        assert!(node.parent.is_none());
        assert_eq!(node.depth, 0);
        assert_eq!(node.visits, 0);
        assert!(!node.is_fully_expanded());
        assert_eq!(node.unexpanded_slots().count(), ACTION_COUNT);
    }

    #[test]
    fn test_expansion_state() {
        let mut node = SearchNode::root();

        for i in 0..ACTION_COUNT {
            assert!(!node.is_fully_expanded());
            node.children[i] = NodeId::new(i as u32 + 1);
        }
        assert!(node.is_fully_expanded());
        assert_eq!(node.unexpanded_slots().count(), 0);
    }

    #[test]
    fn test_record_updates_everything_together() {
        let mut node = SearchNode::root();

        node.record(0.5);
        assert_eq!(node.visits, 1);
        assert_eq!(node.value_sum, 0.5);
        assert_eq!(node.lo, 0.5);
        assert_eq!(node.hi, 0.5);

        node.record(-0.25);
        assert_eq!(node.visits, 2);
        assert_eq!(node.value_sum, 0.25);
        assert_eq!(node.lo, -0.25);
        assert_eq!(node.hi, 0.5);
    }

    #[test]
    fn test_normalized_mean() {
        let mut node = SearchNode::root();
        node.record(0.0);
        node.record(1.0);

        // Mean 0.5 inside bounds [0, 1] stays 0.5 (up to the epsilon guard).
        let norm = node.normalized_mean(1e-6);
        assert!((norm - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_normalise_degenerate_range_is_identity() {
        assert_eq!(normalise(0.7, 1.0, 1.0), 0.7);
        assert_eq!(normalise(0.7, 2.0, 1.0), 0.7);
        assert_eq!(normalise(5.0, 0.0, 10.0), 0.5);
    }

    #[test]
    fn test_noise_breaks_exact_ties() {
        let a = noise(1.0, 1e-6, 0.1);
        let b = noise(1.0, 1e-6, 0.9);
        assert_ne!(a, b);
        // Perturbation stays tiny.
        assert!((a - 1.0).abs() < 1e-4);
        assert!((b - 1.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_bounds_are_monotonic(results in prop::collection::vec(-1.0f64..1.0, 1..50)) {
            let mut node = SearchNode::root();
            let mut prev_lo = f64::INFINITY;
            let mut prev_hi = f64::NEG_INFINITY;

            for (i, &r) in results.iter().enumerate() {
                node.record(r);
                prop_assert!(node.lo <= prev_lo);
                prop_assert!(node.hi >= prev_hi);
                prop_assert!(node.lo <= node.hi);
                prop_assert_eq!(node.visits as usize, i + 1);
                prev_lo = node.lo;
                prev_hi = node.hi;
            }
        }
    }
}
