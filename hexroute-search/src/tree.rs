//! Search tree storage
//!
//! Uses arena allocation: every node is stored once and refers to its parent
//! by index. Parents never point at children, so the whole arena can be
//! dropped or reset in one go between relaxation rounds.

use hexroute_core::{Color, Configuration, Fill, Shape};
use serde::{Deserialize, Serialize};

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// Dominance key: two nodes with the same key are interchangeable for the
/// rest of the search, whatever their turn or fuel
pub type StateKey<C> = (C, Option<Shape>, Option<Color>, Option<Fill>);

/// One step of a candidate route
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step<C> {
    /// Turn in which the unit arrives here
    pub turn: u32,
    pub cell: C,
    /// Direction taken to arrive (None for the root)
    pub arrived_by: Option<u8>,
    /// Parent node (None for the root)
    pub parent: Option<NodeId>,
    /// Configuration after arriving
    pub config: Configuration,
    /// Cost of the last edge
    pub cost: u32,
    /// Cumulative cost from the root
    pub metric: u32,
    /// `metric` plus the distance estimate to the target
    pub metric_bound: u32,
}

impl<C: Copy> Step<C> {
    /// Starting node of a search
    pub fn root(cell: C, config: Configuration, metric_bound: u32) -> Self {
        Self {
            turn: 0,
            cell,
            arrived_by: None,
            parent: None,
            config,
            cost: 0,
            metric: 0,
            metric_bound,
        }
    }

    pub fn key(&self) -> StateKey<C> {
        (self.cell, self.config.shape, self.config.color, self.config.fill)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

// ============================================================================
// SEARCH TREE
// ============================================================================

/// Arena of search nodes
#[derive(Clone, Debug)]
pub struct SearchTree<C> {
    nodes: Vec<Step<C>>,
}

impl<C: Copy + PartialEq> SearchTree<C> {
    /// Create a tree holding only `root`
    pub fn new(root: Step<C>) -> Self {
        Self { nodes: vec![root] }
    }

    /// Drop every node and start again from `root`
    pub fn reset(&mut self, root: Step<C>) {
        self.nodes.clear();
        self.nodes.push(root);
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> &Step<C> {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Store a node and return its id
    pub fn push(&mut self, step: Step<C>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(step);
        id
    }

    /// `id` and its ancestors, leaf first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, C> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    /// Does `cell` appear on the chain from `id` back to the root?
    pub fn on_chain(&self, id: NodeId, cell: C) -> bool {
        self.ancestors(id).any(|(_, step)| step.cell == cell)
    }

    /// Sum of edge costs from the root to `id`
    pub fn path_metric(&self, id: NodeId) -> u32 {
        self.ancestors(id).fold(0, |sum: u32, (_, step)| sum.saturating_add(step.cost))
    }
}

/// Iterator over a node's parent chain
pub struct Ancestors<'a, C> {
    tree: &'a SearchTree<C>,
    next: Option<NodeId>,
}

impl<'a, C: Copy + PartialEq> Iterator for Ancestors<'a, C> {
    type Item = (NodeId, &'a Step<C>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let step = self.tree.get(id);
        self.next = step.parent;
        Some((id, step))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn child(parent: NodeId, tree: &SearchTree<i32>, cell: i32, cost: u32) -> Step<i32> {
        let p = tree.get(parent);
        Step {
            turn: p.turn,
            cell,
            arrived_by: Some(0),
            parent: Some(parent),
            config: p.config,
            cost,
            metric: p.metric + cost,
            metric_bound: p.metric + cost,
        }
    }

    #[test]
    fn test_tree_creation() {
        let tree = SearchTree::new(Step::root(0, Configuration::new(5), 12));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId::ROOT);
        assert!(tree.get(NodeId::ROOT).is_root());
        assert_eq!(tree.get(NodeId::ROOT).metric_bound, 12);
    }

    #[test]
    fn test_parent_chain() {
        let mut tree = SearchTree::new(Step::root(0, Configuration::new(5), 0));
        let a = tree.push(child(NodeId::ROOT, &tree, 1, 2));
        let b = tree.push(child(a, &tree, 2, 3));

        let chain: Vec<NodeId> = tree.ancestors(b).map(|(id, _)| id).collect();
        assert_eq!(chain, vec![b, a, NodeId::ROOT]);
        assert!(tree.on_chain(b, 1));
        assert!(!tree.on_chain(a, 2));
        assert_eq!(tree.path_metric(b), 5);
        assert_eq!(tree.path_metric(b), tree.get(b).metric);
    }

    #[test]
    fn test_reset() {
        let mut tree = SearchTree::new(Step::root(0, Configuration::new(5), 0));
        tree.push(child(NodeId::ROOT, &tree, 1, 1));
        tree.reset(Step::root(7, Configuration::new(5), 3));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(NodeId::ROOT).cell, 7);
    }
}
