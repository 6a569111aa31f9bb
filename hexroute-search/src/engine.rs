//! Anytime best-first route search
//!
//! Finds cheap routes for a unit over (cell, configuration, turn) states.
//! A pass explores nodes in order of `metric_bound` and abandons anything
//! whose bound drifts more than `window` past the best known bound. If a pass
//! ends without reaching the target, the bound is raised and the pass rerun.
//!
//! The ordering key charges the worst-case step cost for every remaining hex,
//! so it can overestimate. Returned routes are feasible and correctly costed,
//! but not always the cheapest that exist.
//!
//! ## Architecture
//! - Level 1: find_paths (relaxation loop)
//! - Level 2: Round::run (one bounded best-first pass)
//! - Level 3: Round::expand (successors, dominance and pruning)

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use hexroute_core::{step, HexGrid, Unit, SIDES};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::path::{Path, RankedPath};
use crate::ticket::Ticket;
use crate::tree::{NodeId, SearchTree, StateKey, Step};
use crate::SearchConfig;

// ============================================================================
// SEARCH RESULT
// ============================================================================

/// How a search ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    /// At least one route reached the target
    Found,
    /// The target changed mid-search; any routes are stale
    Aborted,
    /// The round cap was hit before any route was found
    Exhausted,
    /// A pass pruned nothing on cost and still found no route
    Unreachable,
    /// Target is the origin or occupied; nothing was expanded
    Skipped,
}

/// Result of a route search
#[derive(Debug)]
pub struct SearchResult<C> {
    pub status: SearchStatus,
    pub target: C,
    /// Node arena of the last round
    pub tree: SearchTree<C>,
    /// Terminal nodes, cheapest first
    pub done: Vec<NodeId>,
    /// Passes run, including the successful one
    pub rounds: u32,
    /// Nodes expanded over all rounds
    pub expanded: usize,
    /// Cost bound in force when the search stopped
    pub best_bound: u32,
}

impl<C: Copy + PartialEq> SearchResult<C> {
    pub fn is_found(&self) -> bool {
        self.status == SearchStatus::Found
    }

    /// Every terminal route, cheapest first
    pub fn paths(&self) -> Vec<RankedPath<C>> {
        self.done
            .iter()
            .enumerate()
            .map(|(rank, &id)| self.ranked(rank, id))
            .collect()
    }

    /// Cheapest route, if any
    pub fn best(&self) -> Option<RankedPath<C>> {
        self.done.first().map(|&id| self.ranked(0, id))
    }

    fn ranked(&self, rank: usize, id: NodeId) -> RankedPath<C> {
        let step = self.tree.get(id);
        RankedPath {
            rank,
            node: id,
            metric: step.metric,
            turns: step.turn,
            path: Path::from_node(&self.tree, id),
        }
    }
}

// ============================================================================
// RELAXATION LOOP (Level 1)
// ============================================================================

/// Search for routes taking `unit` to `target`
///
/// Never fails: blocked edges and unaffordable steps are pruned, and every
/// other outcome is reported through `SearchResult::status`. The caller should
/// set `SearchConfig::max_rounds` unless it knows the target is reachable.
pub fn find_paths<G: HexGrid>(
    grid: &G,
    unit: &Unit<G::Cell>,
    target: G::Cell,
    config: &SearchConfig,
    ticket: &Ticket,
) -> SearchResult<G::Cell> {
    let worst = unit.worst_step_cost();
    let window = config.window.unwrap_or(worst);
    let increment = config.relax_increment.unwrap_or(worst).max(1);
    let mut bound = grid.radial_distance(unit.cell, target).saturating_mul(worst);

    let root = Step::root(unit.cell, unit.config, bound);
    let mut round = Round::new(grid, unit, target, window, config.max_expansions, root);

    if target == unit.cell || grid.is_occupied(target) {
        tracing::debug!("Skipping search: target {:?} is the origin or occupied", target);
        return round.finish(SearchStatus::Skipped, 0, 0);
    }

    let mut rounds = 0;
    let mut expanded = 0;

    let status = loop {
        if ticket.is_stale() {
            break SearchStatus::Aborted;
        }
        if config.max_rounds.is_some_and(|cap| rounds >= cap) {
            tracing::warn!("No route to {:?} within {} rounds (bound={})", target, rounds, bound);
            break SearchStatus::Exhausted;
        }

        rounds += 1;
        let outcome = round.run(bound, ticket);
        expanded += round.expanded;

        match outcome {
            RoundOutcome::Found => {
                tracing::debug!(
                    "Found {} route(s) to {:?} in round {} ({} expanded)",
                    round.done.len(),
                    target,
                    rounds,
                    expanded
                );
                break SearchStatus::Found;
            }
            RoundOutcome::Aborted => {
                tracing::debug!("Search for {:?} aborted in round {}: target changed", target, rounds);
                break SearchStatus::Aborted;
            }
            RoundOutcome::Saturated => {
                tracing::debug!("Target {:?} unreachable: round {} pruned nothing", target, rounds);
                break SearchStatus::Unreachable;
            }
            RoundOutcome::Pruned => {
                tracing::debug!(
                    "Round {}: no route within bound={}, relaxing by {}",
                    rounds,
                    bound,
                    increment
                );
                bound = bound.saturating_add(increment);
            }
        }
    };

    round.finish(status, rounds, expanded)
}

// ============================================================================
// SINGLE PASS (Level 2)
// ============================================================================

enum RoundOutcome {
    Found,
    Aborted,
    /// Nothing was cut off by the bound, so relaxing cannot help
    Saturated,
    /// Some branches were cut off by the bound
    Pruned,
}

/// Open-set entry: ordered by bound, then insertion order
type OpenEntry = Reverse<(u32, u64, NodeId)>;

struct Round<'g, G: HexGrid> {
    grid: &'g G,
    unit: &'g Unit<G::Cell>,
    target: G::Cell,
    window: u32,
    worst: u32,
    max_expansions: Option<usize>,
    root: Step<G::Cell>,

    tree: SearchTree<G::Cell>,
    open: BinaryHeap<OpenEntry>,
    /// Live open node (and its queue position) per state
    open_index: FxHashMap<StateKey<G::Cell>, (NodeId, u64)>,
    closed: FxHashSet<StateKey<G::Cell>>,
    done: Vec<NodeId>,

    best_bound: u32,
    next_seq: u64,
    expanded: usize,
    pruned: bool,
}

impl<'g, G: HexGrid> Round<'g, G> {
    fn new(
        grid: &'g G,
        unit: &'g Unit<G::Cell>,
        target: G::Cell,
        window: u32,
        max_expansions: Option<usize>,
        root: Step<G::Cell>,
    ) -> Self {
        Self {
            grid,
            unit,
            target,
            window,
            worst: unit.worst_step_cost(),
            max_expansions,
            root,
            tree: SearchTree::new(root),
            open: BinaryHeap::new(),
            open_index: FxHashMap::default(),
            closed: FxHashSet::default(),
            done: Vec::new(),
            best_bound: root.metric_bound,
            next_seq: 0,
            expanded: 0,
            pruned: false,
        }
    }

    fn reset(&mut self, bound: u32) {
        self.tree.reset(self.root);
        self.open.clear();
        self.open_index.clear();
        self.closed.clear();
        self.done.clear();
        self.best_bound = bound;
        self.next_seq = 0;
        self.expanded = 0;
        self.pruned = false;
    }

    fn limit(&self) -> u32 {
        self.best_bound.saturating_add(self.window)
    }

    /// One bounded best-first pass from the root
    fn run(&mut self, bound: u32, ticket: &Ticket) -> RoundOutcome {
        self.reset(bound);
        self.enqueue(self.root.key(), NodeId::ROOT, self.root.metric_bound, None);

        while let Some(Reverse((metric_bound, _, id))) = self.open.pop() {
            if ticket.is_stale() {
                return RoundOutcome::Aborted;
            }

            let node = *self.tree.get(id);
            let key = node.key();

            // Skip entries superseded by a cheaper node for the same state
            if self.open_index.get(&key).map(|&(live, _)| live) != Some(id) {
                continue;
            }
            self.open_index.remove(&key);

            // The bound may have tightened since this node was queued
            if metric_bound > self.limit() {
                self.pruned = true;
                continue;
            }
            if self.max_expansions.is_some_and(|cap| self.expanded >= cap) {
                self.pruned = true;
                break;
            }

            self.closed.insert(key);
            self.expanded += 1;
            self.expand(id, &node);
        }

        if !self.done.is_empty() {
            RoundOutcome::Found
        } else if self.pruned {
            RoundOutcome::Pruned
        } else {
            RoundOutcome::Saturated
        }
    }

    // ========================================================================
    // EXPANSION (Level 3)
    // ========================================================================

    fn expand(&mut self, id: NodeId, node: &Step<G::Cell>) {
        for direction in 0..SIDES as u8 {
            // Occupied, blocked or unaffordable even after a new turn
            let Some(transit) = step(self.grid, node.cell, direction, self.unit, &node.config) else {
                continue;
            };

            let metric = node.metric.saturating_add(transit.cost);
            let remaining = self.grid.radial_distance(transit.to, self.target).saturating_mul(self.worst);
            let metric_bound = metric.saturating_add(remaining);

            if metric_bound > self.limit() {
                self.pruned = true;
                continue;
            }
            if self.tree.on_chain(id, transit.to) {
                continue;
            }

            let candidate = Step {
                turn: node.turn + u32::from(transit.rolled_over),
                cell: transit.to,
                arrived_by: Some(direction),
                parent: Some(id),
                config: transit.config,
                cost: transit.cost,
                metric,
                metric_bound,
            };
            let key = candidate.key();

            if self.closed.contains(&key) {
                continue;
            }

            if transit.to == self.target {
                self.record_terminal(candidate);
                continue;
            }

            // Keep only the cheaper of two open nodes for the same state
            let seq = match self.open_index.get(&key) {
                Some(&(existing, seq)) => {
                    if metric >= self.tree.get(existing).metric {
                        continue;
                    }
                    Some(seq)
                }
                None => None,
            };

            let child = self.tree.push(candidate);
            self.enqueue(key, child, metric_bound, seq);
        }
    }

    /// Queue `id`; a replacement reuses the queue position of the node it replaces
    fn enqueue(&mut self, key: StateKey<G::Cell>, id: NodeId, metric_bound: u32, seq: Option<u64>) {
        let seq = match seq {
            Some(seq) => seq,
            None => {
                self.next_seq += 1;
                self.next_seq
            }
        };
        self.open_index.insert(key, (id, seq));
        self.open.push(Reverse((metric_bound, seq, id)));
    }

    fn record_terminal(&mut self, step: Step<G::Cell>) {
        let metric = step.metric;
        let id = self.tree.push(step);
        self.done.push(id);

        // Only ever tighten: a terminal inside the window may sit above the bound
        self.best_bound = self.best_bound.min(metric);
    }

    fn finish(self, status: SearchStatus, rounds: u32, expanded: usize) -> SearchResult<G::Cell> {
        let Round {
            target,
            tree,
            mut done,
            best_bound,
            ..
        } = self;

        done.sort_by_key(|&id| {
            let step = tree.get(id);
            (step.metric, step.turn, id)
        });

        SearchResult {
            status,
            target,
            tree,
            done,
            rounds,
            expanded,
            best_bound,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::TargetGeneration;
    use hexroute_core::{AffinityPattern, Color, Configuration, Fill, Hex, HexMap, Shape, Slot};

    const SLOT: Slot = Slot {
        shape: Shape::Circle,
        color: Color::Red,
        fill: Fill::Solid,
    };

    fn uniform_map(radius: u16) -> HexMap {
        let mut map = HexMap::new(radius);
        let pattern = AffinityPattern::uniform(SLOT.shape, SLOT.color, SLOT.fill);
        for hex in map.hexes() {
            map.bind_pattern(hex, &pattern, 0).unwrap();
        }
        map
    }

    fn matched_unit(fuel: i32) -> Unit<Hex> {
        Unit::new(Hex::ORIGIN, 10).with_config(Configuration::matching(SLOT, fuel))
    }

    fn capped() -> SearchConfig {
        SearchConfig::default().with_max_rounds(8)
    }

    #[test]
    fn test_single_step_costs_baseline() {
        let map = uniform_map(1);
        let unit = matched_unit(10);
        let target = Hex::new(1, 0);

        let result = find_paths(&map, &unit, target, &capped(), &Ticket::detached());
        assert_eq!(result.status, SearchStatus::Found);

        let best = result.best().unwrap();
        assert_eq!(best.metric, 1);
        assert_eq!(best.turns, 0);
        assert_eq!(best.path.cells(), vec![Hex::ORIGIN, target]);
        assert_eq!(result.tree.get(best.node).config.fuel, 9);
    }

    #[test]
    fn test_rollover_on_empty_tank() {
        let map = uniform_map(1);
        let unit = matched_unit(0);

        let result = find_paths(&map, &unit, Hex::new(0, 1), &capped(), &Ticket::detached());
        let best = result.best().unwrap();
        let step = result.tree.get(best.node);
        assert_eq!(step.turn, 1);
        assert_eq!(step.config.shape, None);
        assert_eq!(step.config.fuel, 9);
        assert_eq!(best.metric, 1);
    }

    #[test]
    fn test_target_is_origin() {
        let map = uniform_map(1);
        let result = find_paths(&map, &matched_unit(10), Hex::ORIGIN, &capped(), &Ticket::detached());
        assert_eq!(result.status, SearchStatus::Skipped);
        assert!(result.paths().is_empty());
    }

    #[test]
    fn test_occupied_target() {
        let mut map = uniform_map(2);
        map.set_occupied(Hex::new(2, 0), true).unwrap();
        let result = find_paths(&map, &matched_unit(10), Hex::new(2, 0), &capped(), &Ticket::detached());
        assert_eq!(result.status, SearchStatus::Skipped);
        assert_eq!(result.expanded, 0);
        assert!(result.done.is_empty());
    }

    #[test]
    fn test_stale_ticket_aborts() {
        let map = uniform_map(2);
        let generation = TargetGeneration::new();
        let ticket = generation.ticket();
        generation.retarget();

        let result = find_paths(&map, &matched_unit(10), Hex::new(2, 0), &capped(), &ticket);
        assert_eq!(result.status, SearchStatus::Aborted);
        assert!(result.done.is_empty());
    }

    #[test]
    fn test_metric_matches_edge_sum() {
        let map = uniform_map(3);
        let unit = Unit::new(Hex::ORIGIN, 6).with_capacity(2);
        let result = find_paths(&map, &unit, Hex::new(3, -1), &capped(), &Ticket::detached());
        assert!(result.is_found());
        for ranked in result.paths() {
            assert_eq!(ranked.path.edge_cost_sum(&result.tree), ranked.metric);
            assert_eq!(result.tree.path_metric(ranked.node), ranked.metric);
        }
    }

    #[test]
    fn test_paths_ranked_by_metric() {
        let map = uniform_map(2);
        let result = find_paths(&map, &matched_unit(10), Hex::new(0, 2), &capped(), &Ticket::detached());
        let metrics: Vec<u32> = result.paths().iter().map(|p| p.metric).collect();
        assert!(!metrics.is_empty());
        assert!(metrics.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(metrics[0], 2);
    }

    #[test]
    fn test_oversized_unit_does_not_overflow() {
        let map = uniform_map(2);
        let unit = Unit::new(Hex::ORIGIN, 10).with_capacity(2_000_000_000);
        assert_eq!(unit.worst_step_cost(), u32::MAX);

        let result = find_paths(&map, &unit, Hex::new(2, 0), &capped(), &Ticket::detached());
        assert_eq!(result.status, SearchStatus::Found);
        assert_eq!(result.rounds, 1);

        // Unset tags on the first edge, then matching edges
        let best = result.best().unwrap();
        assert_eq!(best.metric, 4 + 1);
        assert_eq!(best.path.len(), 2);
    }

    #[test]
    fn test_relaxation_finds_route_in_later_round() {
        // Every tag differs on the far side of the target edge: 6 * 1 + 1 = 7,
        // above the initial bound of one worst-case step (4)
        let mut map = uniform_map(2);
        let target = Hex::new(1, 0);
        let odd = AffinityPattern::uniform(Shape::Square, Color::Blue, Fill::Outline);
        map.bind_pattern(target, &odd, 0).unwrap();
        let unit = Unit::new(Hex::ORIGIN, 10);

        let config = capped().with_window(0);
        let result = find_paths(&map, &unit, target, &config, &Ticket::detached());
        assert_eq!(result.status, SearchStatus::Found);
        assert_eq!(result.rounds, 2);
        let best = result.best().unwrap();
        assert_eq!(best.metric, 7);
        assert_eq!(best.path.cells(), vec![Hex::ORIGIN, target]);

        // Bound 4, 5, 6 fail; 7 admits the direct edge
        let slow = config.with_relax_increment(1);
        let result = find_paths(&map, &unit, target, &slow, &Ticket::detached());
        assert_eq!(result.status, SearchStatus::Found);
        assert_eq!(result.rounds, 4);
        assert_eq!(result.best().unwrap().metric, 7);
    }

    #[test]
    fn test_terminal_above_bound_does_not_loosen_it() {
        let mut map = uniform_map(2);
        let target = Hex::new(1, 0);
        let odd = AffinityPattern::uniform(Shape::Square, Color::Blue, Fill::Outline);
        map.bind_pattern(target, &odd, 0).unwrap();

        // Bound 4, window 10: the direct edge (7) lands inside the window
        let config = capped().with_window(10);
        let result = find_paths(&map, &Unit::new(Hex::ORIGIN, 10), target, &config, &Ticket::detached());
        assert_eq!(result.rounds, 1);
        assert_eq!(result.best().unwrap().metric, 7);
        assert_eq!(result.best_bound, 4);
    }

    #[test]
    fn test_open_entry_replaced_only_by_cheaper() {
        let map = uniform_map(2);
        let unit = matched_unit(10);
        let root = Step::root(Hex::ORIGIN, unit.config, 0);
        let mut round = Round::new(&map, &unit, Hex::new(-2, 0), 1000, None, root);

        let parent = |round: &mut Round<'_, HexMap>, cell: Hex, metric: u32| {
            round.tree.push(Step {
                turn: 0,
                cell,
                arrived_by: Hex::ORIGIN.direction_to(cell),
                parent: Some(NodeId::ROOT),
                config: unit.config,
                cost: metric,
                metric,
                metric_bound: metric,
            })
        };
        let costly = parent(&mut round, Hex::new(1, 0), 5);
        let cheap = parent(&mut round, Hex::new(0, 1), 3);
        let equal = parent(&mut round, Hex::new(2, 0), 3);

        // (1,1) neighbors all three parents
        let shared = Hex::new(1, 1);
        let key = (shared, Some(SLOT.shape), Some(SLOT.color), Some(SLOT.fill));

        let node = *round.tree.get(costly);
        round.expand(costly, &node);
        let (first, seq) = round.open_index[&key];
        assert_eq!(round.tree.get(first).metric, 6);

        // Strictly cheaper: replaces the entry and keeps its queue position
        let node = *round.tree.get(cheap);
        round.expand(cheap, &node);
        let (second, second_seq) = round.open_index[&key];
        assert_ne!(second, first);
        assert_eq!(second_seq, seq);
        assert_eq!(round.tree.get(second).metric, 4);
        assert_eq!(round.tree.get(second).parent, Some(cheap));

        // Equal metric: discarded
        let node = *round.tree.get(equal);
        round.expand(equal, &node);
        assert_eq!(round.open_index[&key], (second, seq));
    }

    #[test]
    fn test_walled_in_target() {
        let mut map = uniform_map(3);
        let target = Hex::new(3, 0);
        for d in 0..6u8 {
            let wall = target.neighbor(d);
            if map.contains(wall) {
                map.set_occupied(wall, true).unwrap();
            }
        }
        let result = find_paths(&map, &matched_unit(10), target, &capped(), &Ticket::detached());
        assert!(result.done.is_empty());
        assert!(matches!(
            result.status,
            SearchStatus::Unreachable | SearchStatus::Exhausted
        ));
        assert!(result.rounds <= 8);
    }
}
