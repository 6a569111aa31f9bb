//! Mobile units and their transient configuration

use serde::{Deserialize, Serialize};

use crate::cost::{AFFINITY_ATTRIBUTES, BASELINE_COST};
use crate::pattern::{Color, Fill, Shape, Slot};

/// Transient state a unit carries between cells
///
/// Each tag is `None` until the unit first crosses an edge that sets it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Configuration {
    pub shape: Option<Shape>,
    pub color: Option<Color>,
    pub fill: Option<Fill>,
    /// Fuel left in the current turn
    pub fuel: i32,
}

impl Configuration {
    /// Unset tags with `fuel` remaining
    pub fn new(fuel: i32) -> Self {
        Self {
            fuel,
            ..Default::default()
        }
    }

    /// Tags already matching `slot`
    pub fn matching(slot: Slot, fuel: i32) -> Self {
        Self {
            shape: Some(slot.shape),
            color: Some(slot.color),
            fill: Some(slot.fill),
            fuel,
        }
    }

    /// The tag triple, without fuel
    pub fn affinity(&self) -> (Option<Shape>, Option<Color>, Option<Fill>) {
        (self.shape, self.color, self.fill)
    }
}

/// A unit that can be routed across the grid
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit<C> {
    pub cell: C,
    pub config: Configuration,
    /// Cargo currently carried
    pub load: u32,
    /// Most cargo the unit can ever carry
    pub capacity: u32,
    /// Fixed size class
    pub size: u32,
    /// Fuel granted at the start of every turn
    pub max_fuel: i32,
}

impl<C> Unit<C> {
    /// Empty size-1 unit with a full tank and no tags set
    pub fn new(cell: C, max_fuel: i32) -> Self {
        Self {
            cell,
            config: Configuration::new(max_fuel),
            load: 0,
            capacity: 0,
            size: 1,
            max_fuel,
        }
    }

    pub fn with_load(mut self, load: u32) -> Self {
        self.load = load;
        self.capacity = self.capacity.max(load);
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity.max(self.load);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_config(mut self, config: Configuration) -> Self {
        self.config = config;
        self
    }

    /// Cost of one unit of reconfiguration work at the current load
    pub fn step_weight(&self) -> u32 {
        self.load.saturating_add(self.size)
    }

    /// Edge cost if every attribute mismatches at full capacity
    ///
    /// Saturates at `u32::MAX` for oversized units.
    pub fn worst_step_cost(&self) -> u32 {
        AFFINITY_ATTRIBUTES
            .saturating_mul(self.size.saturating_add(self.capacity.max(self.load)))
            .saturating_add(BASELINE_COST)
    }

    /// Apply a finished move
    pub fn commit(&mut self, cell: C, config: Configuration) {
        self.cell = cell;
        self.config = config;
    }
}
