//! Edge cost model
//!
//! Crossing an edge costs one unit of reconfiguration work for each attribute
//! where the unit disagrees with the outbound side, and one more where the two
//! facing sides disagree. Work is weighted by the unit's load and size.

use crate::board::{opposite, SIDES};
use crate::grid::HexGrid;
use crate::unit::{Configuration, Unit};

/// Cost paid on every step, even with nothing to reconfigure
pub const BASELINE_COST: u32 = 1;

/// Number of tagged attributes on a pattern slot
pub const AFFINITY_ATTRIBUTES: u32 = 3;

/// Cost of crossing from `from` in `direction`
///
/// `to` defaults to the neighbor in that direction. Returns `None` when the
/// edge cannot be crossed because either side has no pattern. On success
/// `draft` takes the tags of the arrival side; `current` is left alone.
pub fn transit_cost<G: HexGrid>(
    grid: &G,
    from: G::Cell,
    direction: u8,
    to: Option<G::Cell>,
    unit: &Unit<G::Cell>,
    current: &Configuration,
    draft: &mut Configuration,
) -> Option<u32> {
    let to = match to {
        Some(cell) => cell,
        None => grid.neighbor(from, direction)?,
    };
    let outbound = grid.pattern(from)?.slot(direction);
    let inbound = grid.pattern(to)?.slot(opposite(direction));

    let work = attribute_work(current.shape, outbound.shape, inbound.shape)
        + attribute_work(current.color, outbound.color, inbound.color)
        + attribute_work(current.fill, outbound.fill, inbound.fill);

    draft.shape = Some(inbound.shape);
    draft.color = Some(inbound.color);
    draft.fill = Some(inbound.fill);

    Some(work.saturating_mul(unit.step_weight()).saturating_add(BASELINE_COST))
}

fn attribute_work<T: PartialEq>(current: Option<T>, outbound: T, inbound: T) -> u32 {
    let mut work = 0;
    if current.as_ref() != Some(&outbound) {
        work += 1;
    }
    if outbound != inbound {
        work += 1;
    }
    work
}

// ============================================================================
// TRANSIT (cost + fuel)
// ============================================================================

/// Outcome of a single affordable step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transit<C> {
    pub to: C,
    pub cost: u32,
    /// Configuration on arrival, fuel already paid
    pub config: Configuration,
    /// The step could only be paid by starting a new turn
    pub rolled_over: bool,
}

/// Pay for one step out of `current`, rolling into a new turn if needed
///
/// A new turn refills the tank to `max_fuel` and clears the shape tag.
/// Returns `None` if the edge is blocked, occupied, or costs more than a full
/// tank.
pub fn step<G: HexGrid>(
    grid: &G,
    from: G::Cell,
    direction: u8,
    unit: &Unit<G::Cell>,
    current: &Configuration,
) -> Option<Transit<G::Cell>> {
    let to = grid.neighbor(from, direction)?;
    if grid.is_occupied(to) {
        return None;
    }

    let mut draft = *current;
    let cost = transit_cost(grid, from, direction, Some(to), unit, current, &mut draft)?;

    // More than any tank can hold
    let spend = i32::try_from(cost).ok()?;

    let mut rolled_over = false;
    draft.fuel = current.fuel.saturating_sub(spend);
    if draft.fuel < 0 {
        rolled_over = true;
        draft.shape = None;
        draft.fuel = unit.max_fuel.saturating_sub(spend);
        if draft.fuel < 0 {
            return None;
        }
    }

    Some(Transit {
        to,
        cost,
        config: draft,
        rolled_over,
    })
}

/// One-ply lookahead: what each direction would cost the unit right now
pub fn lookahead<G: HexGrid>(grid: &G, unit: &Unit<G::Cell>) -> [Option<Transit<G::Cell>>; SIDES] {
    std::array::from_fn(|d| step(grid, unit.cell, d as u8, unit, &unit.config))
}
