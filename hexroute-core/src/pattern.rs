//! Affinity patterns and the pattern catalog
//!
//! A pattern gives every side of a hex a shape, a color and a fill. The catalog
//! enumerates each sub-attribute family up to rotation and combines the
//! families into concrete pattern instances.

use std::fmt::Debug;
use std::hash::Hash;

use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::SIDES;

// ============================================================================
// SYMBOLS
// ============================================================================

/// A tag that can occupy one slot of a pattern family
pub trait Symbol: Copy + Ord + Hash + Debug {
    /// Single-character code used in catalog keys
    fn code(self) -> char;
}

/// Shape tag on a hex side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shape {
    Circle,
    Square,
    Triangle,
}

/// Color tag on a hex side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
}

/// Fill mode on a hex side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Fill {
    Outline,
    Solid,
}

impl Symbol for Shape {
    fn code(self) -> char {
        match self {
            Shape::Circle => 'C',
            Shape::Square => 'S',
            Shape::Triangle => 'T',
        }
    }
}

impl Symbol for Color {
    fn code(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Green => 'g',
            Color::Blue => 'b',
        }
    }
}

impl Symbol for Fill {
    fn code(self) -> char {
        match self {
            Fill::Outline => 'o',
            Fill::Solid => 'f',
        }
    }
}

// ============================================================================
// ROTATION
// ============================================================================

/// Cyclic left rotation by `n` positions
pub fn rotate<T: Copy>(seq: &[T; SIDES], n: usize) -> [T; SIDES] {
    std::array::from_fn(|i| seq[(i + n) % SIDES])
}

/// True if `a` equals some rotation of `b` (including `b` itself)
pub fn is_rotation_of<T: Copy + PartialEq>(a: &[T; SIDES], b: &[T; SIDES]) -> bool {
    (0..SIDES).any(|n| rotate(b, n) == *a)
}

/// Every arrangement of `multiset` into the six slots, one per rotation class
///
/// Chooses symbols without replacement from the sorted multiset, skipping a
/// symbol equal to the one just tried at the same depth so indistinguishable
/// duplicates are not arranged twice. A completed arrangement is kept only if
/// it is not a rotation of one already kept.
pub fn distinct_arrangements<T: Symbol>(multiset: &[T; SIDES]) -> Vec<[T; SIDES]> {
    let mut pool = *multiset;
    pool.sort();

    let mut used = [false; SIDES];
    let mut current = Vec::with_capacity(SIDES);
    let mut out = Vec::new();
    arrange(&pool, &mut used, &mut current, &mut out);
    out
}

fn arrange<T: Symbol>(
    pool: &[T; SIDES],
    used: &mut [bool; SIDES],
    current: &mut Vec<T>,
    out: &mut Vec<[T; SIDES]>,
) {
    if current.len() == SIDES {
        let candidate: [T; SIDES] = std::array::from_fn(|i| current[i]);
        if !out.iter().any(|kept| is_rotation_of(&candidate, kept)) {
            out.push(candidate);
        }
        return;
    }

    let mut previous: Option<T> = None;
    for i in 0..SIDES {
        if used[i] || previous == Some(pool[i]) {
            continue;
        }
        previous = Some(pool[i]);

        used[i] = true;
        current.push(pool[i]);
        arrange(pool, used, current, out);
        current.pop();
        used[i] = false;
    }
}

fn encode<T: Symbol>(seq: &[T; SIDES]) -> String {
    seq.iter().map(|s| s.code()).collect()
}

// ============================================================================
// PATTERN
// ============================================================================

/// The three tags found on one side of a patterned hex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub shape: Shape,
    pub color: Color,
    pub fill: Fill,
}

/// Six-sided affinity pattern, one slot per direction
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AffinityPattern {
    pub shape: [Shape; SIDES],
    pub color: [Color; SIDES],
    pub fill: [Fill; SIDES],
}

impl AffinityPattern {
    pub fn new(shape: [Shape; SIDES], color: [Color; SIDES], fill: [Fill; SIDES]) -> Self {
        Self { shape, color, fill }
    }

    /// Same slot on every side
    pub fn uniform(shape: Shape, color: Color, fill: Fill) -> Self {
        Self {
            shape: [shape; SIDES],
            color: [color; SIDES],
            fill: [fill; SIDES],
        }
    }

    /// Slot facing `direction` (0-5)
    pub fn slot(&self, direction: u8) -> Slot {
        let d = direction as usize % SIDES;
        Slot {
            shape: self.shape[d],
            color: self.color[d],
            fill: self.fill[d],
        }
    }

    /// All three families rotated together by `n`
    pub fn rotated(&self, n: usize) -> Self {
        Self {
            shape: rotate(&self.shape, n),
            color: rotate(&self.color, n),
            fill: rotate(&self.fill, n),
        }
    }

    /// Catalog key: shape, color and fill codes concatenated
    pub fn key(&self) -> String {
        let mut key = encode(&self.shape);
        key.push_str(&encode(&self.color));
        key.push_str(&encode(&self.fill));
        key
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Error building a pattern catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("{family} multiset must have {expected} symbols, got {len}")]
    WrongSlotCount {
        family: &'static str,
        expected: usize,
        len: usize,
    },

    #[error("{family} multiset produced no rotation classes")]
    NoRotationClasses { family: &'static str },
}

/// Seeding multisets for the three pattern families
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSpec {
    pub shapes: Vec<Shape>,
    pub colors: Vec<Color>,
    pub fills: Vec<Fill>,
}

impl Default for CatalogSpec {
    /// Two of each shape and color, three of each fill
    fn default() -> Self {
        use Color::*;
        use Fill::*;
        use Shape::*;
        Self {
            shapes: vec![Circle, Circle, Square, Square, Triangle, Triangle],
            colors: vec![Red, Red, Green, Green, Blue, Blue],
            fills: vec![Outline, Outline, Outline, Solid, Solid, Solid],
        }
    }
}

/// Immutable set of affinity patterns, built once at startup
#[derive(Clone, Debug)]
pub struct PatternCatalog {
    shape_classes: Vec<[Shape; SIDES]>,
    color_classes: Vec<[Color; SIDES]>,
    fill_classes: Vec<[Fill; SIDES]>,
    entries: Vec<AffinityPattern>,
}

impl PatternCatalog {
    /// Enumerate every family and combine them into pattern instances
    ///
    /// Each component of an instance is rotated by its own random offset
    /// before the three are combined.
    pub fn build<R: Rng>(spec: &CatalogSpec, rng: &mut R) -> Result<Self, CatalogError> {
        let shape_classes = family_classes("shape", &spec.shapes)?;
        let color_classes = family_classes("color", &spec.colors)?;
        let fill_classes = family_classes("fill", &spec.fills)?;

        let capacity = shape_classes.len() * color_classes.len() * fill_classes.len();
        let mut entries = Vec::with_capacity(capacity);
        let mut seen: FxHashSet<String> = FxHashSet::default();

        for shape in &shape_classes {
            for color in &color_classes {
                for fill in &fill_classes {
                    let pattern = AffinityPattern::new(
                        rotate(shape, rng.gen_range(0..SIDES)),
                        rotate(color, rng.gen_range(0..SIDES)),
                        rotate(fill, rng.gen_range(0..SIDES)),
                    );
                    if seen.insert(pattern.key()) {
                        entries.push(pattern);
                    }
                }
            }
        }

        Ok(Self {
            shape_classes,
            color_classes,
            fill_classes,
            entries,
        })
    }

    /// Standard catalog with a fixed seed
    pub fn seeded(seed: u64) -> Result<Self, CatalogError> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self::build(&CatalogSpec::default(), &mut rng)
    }

    pub fn entries(&self) -> &[AffinityPattern] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&AffinityPattern> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look an instance up by its key
    pub fn find(&self, key: &str) -> Option<&AffinityPattern> {
        self.entries.iter().find(|p| p.key() == key)
    }

    /// Uniformly random instance
    pub fn choose<R: Rng>(&self, rng: &mut R) -> Option<&AffinityPattern> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries.get(rng.gen_range(0..self.entries.len()))
    }

    pub fn shape_classes(&self) -> &[[Shape; SIDES]] {
        &self.shape_classes
    }

    pub fn color_classes(&self) -> &[[Color; SIDES]] {
        &self.color_classes
    }

    pub fn fill_classes(&self) -> &[[Fill; SIDES]] {
        &self.fill_classes
    }
}

fn family_classes<T: Symbol>(
    family: &'static str,
    multiset: &[T],
) -> Result<Vec<[T; SIDES]>, CatalogError> {
    let multiset: &[T; SIDES] = multiset.try_into().map_err(|_| CatalogError::WrongSlotCount {
        family,
        expected: SIDES,
        len: multiset.len(),
    })?;

    let classes = distinct_arrangements(multiset);
    if classes.is_empty() {
        return Err(CatalogError::NoRotationClasses { family });
    }
    Ok(classes)
}
