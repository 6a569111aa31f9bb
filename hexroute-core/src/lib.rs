//! HEXROUTE Core - Grid model and edge costs
//!
//! This crate provides the data the router searches over:
//! - Board geometry (hex grid with axial coordinates)
//! - Affinity patterns and the rotation-deduplicated pattern catalog
//! - The grid interface and a concrete hexagonal map
//! - Units, configurations and the edge cost model

pub mod board;
pub mod pattern;
pub mod grid;
pub mod map;
pub mod unit;
pub mod cost;

// Re-exports for convenient access
pub use board::{Hex, DIRECTIONS, DIRECTION_NAMES, SIDES, opposite};
pub use pattern::{
    AffinityPattern, CatalogError, CatalogSpec, Color, Fill, PatternCatalog, Shape, Slot,
    distinct_arrangements, rotate,
};
pub use grid::HexGrid;
pub use map::{CellState, HexMap, MapError};
pub use unit::{Configuration, Unit};
pub use cost::{lookahead, step, transit_cost, Transit, AFFINITY_ATTRIBUTES, BASELINE_COST};
