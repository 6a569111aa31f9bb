//! Navigation interface the router needs from a grid

use std::fmt::Debug;
use std::hash::Hash;

use crate::pattern::AffinityPattern;

/// A hex grid the router can search
///
/// Searches only read the grid. Anything that changes occupancy or patterns
/// must not run while a search holds a reference to it.
pub trait HexGrid {
    /// Opaque cell handle
    type Cell: Copy + Eq + Hash + Debug;

    /// Adjacent cell in `direction` (0-5), if it exists
    fn neighbor(&self, cell: Self::Cell, direction: u8) -> Option<Self::Cell>;

    /// Another unit stands on `cell`
    fn is_occupied(&self, cell: Self::Cell) -> bool;

    /// Step distance between two cells, ignoring obstacles
    fn radial_distance(&self, a: Self::Cell, b: Self::Cell) -> u32;

    /// Pattern bound to `cell`, if any
    fn pattern(&self, cell: Self::Cell) -> Option<&AffinityPattern>;
}
