//! HEXROUTE Search - Multi-turn affinity routing
//!
//! This crate provides the route search:
//! - Arena-allocated search tree with parent-only links
//! - Anytime best-first search with bound relaxation
//! - Turn rollover when a step would overdraw the fuel budget
//! - Cooperative cancellation when a unit's target changes
//! - Path materialization and ranking

pub mod engine;
pub mod path;
pub mod ticket;
pub mod tree;

use hexroute_core::{HexGrid, Unit};
use serde::{Deserialize, Serialize};

pub use engine::{find_paths, SearchResult, SearchStatus};
pub use path::{Leg, Path, RankedPath};
pub use ticket::{TargetGeneration, Ticket};
pub use tree::{NodeId, SearchTree, StateKey, Step};

/// Default cap on relaxation rounds
pub const DEFAULT_MAX_ROUNDS: u32 = 64;

/// Search configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// How far past the best known bound a branch may drift
    /// (None = one worst-case step for the unit)
    pub window: Option<u32>,
    /// Bound increase between rounds (None = one worst-case step)
    pub relax_increment: Option<u32>,
    /// Give up after this many rounds (None = keep relaxing)
    pub max_rounds: Option<u32>,
    /// Stop a round after this many expansions (None = no limit)
    pub max_expansions: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            window: None,
            relax_increment: None,
            max_rounds: Some(DEFAULT_MAX_ROUNDS),
            max_expansions: None,
        }
    }
}

impl SearchConfig {
    /// Config with an explicit search window
    pub fn with_window(mut self, window: u32) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_relax_increment(mut self, increment: u32) -> Self {
        self.relax_increment = Some(increment);
        self
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    /// Remove the round cap; only safe when the target is known reachable
    pub fn unbounded(mut self) -> Self {
        self.max_rounds = None;
        self
    }

    pub fn with_max_expansions(mut self, expansions: usize) -> Self {
        self.max_expansions = Some(expansions);
        self
    }
}

// ============================================================================
// BATCH SEARCH
// ============================================================================

/// One unit's routing request
#[derive(Clone, Debug)]
pub struct RouteRequest<C> {
    pub unit: Unit<C>,
    pub target: C,
    pub ticket: Ticket,
}

impl<C> RouteRequest<C> {
    /// Request that can never be cancelled
    pub fn new(unit: Unit<C>, target: C) -> Self {
        Self {
            unit,
            target,
            ticket: Ticket::detached(),
        }
    }
}

/// Route several independent units over the same grid
///
/// Each search owns its own state; the grid is only read. With the `parallel`
/// feature the searches run on the rayon pool.
pub fn find_paths_many<G>(
    grid: &G,
    requests: &[RouteRequest<G::Cell>],
    config: &SearchConfig,
) -> Vec<SearchResult<G::Cell>>
where
    G: HexGrid + Sync,
    G::Cell: Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        requests
            .par_iter()
            .map(|r| find_paths(grid, &r.unit, r.target, config, &r.ticket))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        requests
            .iter()
            .map(|r| find_paths(grid, &r.unit, r.target, config, &r.ticket))
            .collect()
    }
}
