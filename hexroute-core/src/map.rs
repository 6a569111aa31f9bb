//! Hexagonal map with bound patterns and occupancy

use rand::Rng;
use rustc_hash::FxHashMap;

use crate::board::{spiral, Hex, SIDES};
use crate::grid::HexGrid;
use crate::pattern::{AffinityPattern, PatternCatalog};

/// Error mutating a map
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("hex {0:?} is not on the map")]
    OffGrid(Hex),
}

/// What the map knows about one cell
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellState {
    /// Bound pattern, already rotated into place
    pub pattern: Option<AffinityPattern>,
    pub occupied: bool,
}

/// Hexagon-shaped map of `radius` rings around the origin
#[derive(Clone, Debug)]
pub struct HexMap {
    radius: u16,
    /// Board: hex -> cell state (every on-map hex has an entry)
    cells: FxHashMap<Hex, CellState>,
}

impl HexMap {
    /// Map with no patterns and nothing occupied
    pub fn new(radius: u16) -> Self {
        let cells = spiral(Hex::ORIGIN, radius)
            .into_iter()
            .map(|hex| (hex, CellState::default()))
            .collect();
        Self { radius, cells }
    }

    pub fn radius(&self) -> u16 {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.cells.contains_key(&hex)
    }

    pub fn cell(&self, hex: Hex) -> Option<&CellState> {
        self.cells.get(&hex)
    }

    /// Every hex on the map, center first
    pub fn hexes(&self) -> Vec<Hex> {
        spiral(Hex::ORIGIN, self.radius)
    }

    fn cell_mut(&mut self, hex: Hex) -> Result<&mut CellState, MapError> {
        self.cells.get_mut(&hex).ok_or(MapError::OffGrid(hex))
    }

    /// Bind `pattern` to `hex`, turned by `rotation` sides
    pub fn bind_pattern(
        &mut self,
        hex: Hex,
        pattern: &AffinityPattern,
        rotation: usize,
    ) -> Result<(), MapError> {
        self.cell_mut(hex)?.pattern = Some(pattern.rotated(rotation % SIDES));
        Ok(())
    }

    /// Remove the pattern from `hex`, making it impassable (planets)
    pub fn clear_pattern(&mut self, hex: Hex) -> Result<(), MapError> {
        self.cell_mut(hex)?.pattern = None;
        Ok(())
    }

    pub fn set_occupied(&mut self, hex: Hex, occupied: bool) -> Result<(), MapError> {
        self.cell_mut(hex)?.occupied = occupied;
        Ok(())
    }

    /// Bind a random catalog entry at a random rotation to every cell
    ///
    /// Returns the number of cells bound.
    pub fn populate<R: Rng>(&mut self, catalog: &PatternCatalog, rng: &mut R) -> usize {
        let mut bound = 0;
        for hex in self.hexes() {
            let Some(pattern) = catalog.choose(rng) else {
                break;
            };
            let rotation = rng.gen_range(0..SIDES);
            if let Some(cell) = self.cells.get_mut(&hex) {
                cell.pattern = Some(pattern.rotated(rotation));
                bound += 1;
            }
        }
        bound
    }
}

impl HexGrid for HexMap {
    type Cell = Hex;

    fn neighbor(&self, cell: Hex, direction: u8) -> Option<Hex> {
        let next = cell.neighbor(direction);
        self.contains(next).then_some(next)
    }

    fn is_occupied(&self, cell: Hex) -> bool {
        self.cells.get(&cell).is_some_and(|c| c.occupied)
    }

    fn radial_distance(&self, a: Hex, b: Hex) -> u32 {
        a.distance_to(b) as u32
    }

    fn pattern(&self, cell: Hex) -> Option<&AffinityPattern> {
        self.cells.get(&cell).and_then(|c| c.pattern.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{Color, Fill, Shape};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_map_shape() {
        let map = HexMap::new(2);
        assert_eq!(map.len(), 19);
        assert!(map.contains(Hex::new(2, -2)));
        assert!(!map.contains(Hex::new(2, 1)));
        assert_eq!(map.neighbor(Hex::new(2, 0), 2), None);
        assert_eq!(map.neighbor(Hex::ORIGIN, 0), Some(Hex::new(0, -1)));
    }

    #[test]
    fn test_bind_rotates() {
        let mut map = HexMap::new(1);
        let pattern = AffinityPattern::new(
            [Shape::Circle, Shape::Square, Shape::Triangle, Shape::Circle, Shape::Square, Shape::Triangle],
            [Color::Red; SIDES],
            [Fill::Solid; SIDES],
        );
        map.bind_pattern(Hex::ORIGIN, &pattern, 1).unwrap();
        assert_eq!(map.pattern(Hex::ORIGIN).unwrap().shape[0], Shape::Square);

        map.clear_pattern(Hex::ORIGIN).unwrap();
        assert!(map.pattern(Hex::ORIGIN).is_none());
    }

    #[test]
    fn test_off_grid_errors() {
        let mut map = HexMap::new(1);
        let far = Hex::new(5, 5);
        let pattern = AffinityPattern::uniform(Shape::Circle, Color::Red, Fill::Solid);
        assert_eq!(map.bind_pattern(far, &pattern, 0), Err(MapError::OffGrid(far)));
        assert_eq!(map.set_occupied(far, true), Err(MapError::OffGrid(far)));
        assert!(!map.is_occupied(far));
    }

    #[test]
    fn test_populate() {
        let catalog = PatternCatalog::seeded(3).unwrap();
        let mut map = HexMap::new(3);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        assert_eq!(map.populate(&catalog, &mut rng), 37);
        assert!(map.hexes().iter().all(|&h| map.pattern(h).is_some()));
    }
}
