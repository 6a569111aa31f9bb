//! Turning terminal nodes into routes

use serde::Serialize;

use crate::tree::{NodeId, SearchTree};

/// One move along a route
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Leg<C> {
    pub direction: u8,
    pub cell: C,
    /// Node that recorded this move
    pub node: NodeId,
}

/// Route from the search origin to a terminal node
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Path<C> {
    pub origin: C,
    pub legs: Vec<Leg<C>>,
}

impl<C: Copy + PartialEq> Path<C> {
    /// Walk parent links from `id` and reverse them
    pub fn from_node(tree: &SearchTree<C>, id: NodeId) -> Self {
        let mut legs = Vec::new();
        let mut origin = tree.get(id).cell;

        for (node, step) in tree.ancestors(id) {
            match step.arrived_by {
                Some(direction) => legs.push(Leg {
                    direction,
                    cell: step.cell,
                    node,
                }),
                None => origin = step.cell,
            }
        }

        legs.reverse();
        Self { origin, legs }
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn destination(&self) -> C {
        self.legs.last().map_or(self.origin, |leg| leg.cell)
    }

    /// Every cell visited, origin included
    pub fn cells(&self) -> Vec<C> {
        std::iter::once(self.origin)
            .chain(self.legs.iter().map(|leg| leg.cell))
            .collect()
    }

    /// Sum of the edge costs recorded along the route
    pub fn edge_cost_sum(&self, tree: &SearchTree<C>) -> u32 {
        self.legs.iter().fold(0, |sum: u32, leg| sum.saturating_add(tree.get(leg.node).cost))
    }
}

/// A terminal route with its cost, as returned by a search
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedPath<C> {
    /// 0 for the cheapest route
    pub rank: usize,
    pub node: NodeId,
    /// Total cost stored on the terminal node
    pub metric: u32,
    /// Turn in which the route arrives
    pub turns: u32,
    pub path: Path<C>,
}
