//! Hex board geometry with axial coordinates

use serde::{Deserialize, Serialize};

/// Number of sides of a hex cell (and of an affinity pattern)
pub const SIDES: usize = 6;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i16,
    pub r: i16,
}

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i16, r: i16) -> Self {
        Self { q, r }
    }

    /// Check if this hex lies within `radius` of the center
    pub fn within(&self, radius: i16) -> bool {
        self.distance_to_center() <= radius
    }

    /// Distance from center (0,0)
    pub fn distance_to_center(&self) -> i16 {
        (self.q.abs() + self.r.abs() + (self.q + self.r).abs()) / 2
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i16 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        (dq + dr + ds) / 2
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: u8) -> Hex {
        let (dq, dr) = DIRECTIONS[direction as usize % SIDES];
        Hex::new(self.q + dq, self.r + dr)
    }

    /// Direction (0-5) leading from this hex to an adjacent one
    pub fn direction_to(&self, other: Hex) -> Option<u8> {
        (0..SIDES as u8).find(|&d| self.neighbor(d) == other)
    }
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const DIRECTIONS: [(i16, i16); SIDES] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

/// Short direction labels, indexed like DIRECTIONS
pub const DIRECTION_NAMES: [&str; SIDES] = ["N", "NE", "SE", "S", "SW", "NW"];

/// Direction pointing back along `direction`
pub fn opposite(direction: u8) -> u8 {
    (direction + 3) % SIDES as u8
}

/// All hexes at exactly `distance` from `center`
pub fn ring(center: Hex, distance: u16) -> Vec<Hex> {
    if distance == 0 {
        return vec![center];
    }
    let distance = distance as i16;
    let mut out = Vec::with_capacity(SIDES * distance as usize);
    // Start at the SW corner and walk each side
    let (sq, sr) = DIRECTIONS[4];
    let mut current = Hex::new(center.q + sq * distance, center.r + sr * distance);
    for side in 0..SIDES {
        for _ in 0..distance {
            out.push(current);
            current = current.neighbor(side as u8);
        }
    }
    out
}

/// All hexes within `radius` of `center`, ring by ring from the center out
pub fn spiral(center: Hex, radius: u16) -> Vec<Hex> {
    (0..=radius).flat_map(|d| ring(center, d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within() {
        assert!(Hex::new(0, 0).within(4));
        assert!(Hex::new(4, 0).within(4));
        assert!(Hex::new(0, -4).within(4));
        assert!(!Hex::new(5, 0).within(4));
        assert!(!Hex::new(3, 3).within(4)); // q + r = 6 > 4
    }

    #[test]
    fn test_distance() {
        assert_eq!(Hex::new(0, 0).distance_to_center(), 0);
        assert_eq!(Hex::new(1, 0).distance_to_center(), 1);
        assert_eq!(Hex::new(2, 2).distance_to_center(), 4);
        assert_eq!(Hex::new(-2, 1).distance_to(Hex::new(1, -1)), 3);
    }

    #[test]
    fn test_opposite_neighbors_cancel() {
        let hex = Hex::new(2, -1);
        for d in 0..6u8 {
            assert_eq!(hex.neighbor(d).neighbor(opposite(d)), hex);
            assert_eq!(hex.direction_to(hex.neighbor(d)), Some(d));
        }
        assert_eq!(hex.direction_to(hex), None);
    }

    #[test]
    fn test_ring_and_spiral() {
        let center = Hex::new(1, 1);
        assert_eq!(ring(center, 0), vec![center]);

        let r2 = ring(center, 2);
        assert_eq!(r2.len(), 12);
        assert!(r2.iter().all(|h| h.distance_to(center) == 2));

        // 1 + 6 + 12 + 18
        assert_eq!(spiral(Hex::ORIGIN, 3).len(), 37);
    }
}
