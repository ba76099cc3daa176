//! This sub-module contains the basic value types for the hex coordinate
//! system and the plane it maps onto. See the parent module documentation
//! for more info on the two coordinate systems.

use derive_more::{
    Add, AddAssign, Display, Div, DivAssign, From, Into, Mul, MulAssign, Neg,
    Sub, SubAssign, Sum,
};
use serde::{Deserialize, Serialize};
use std::ops;
use strum::{EnumIter, IntoEnumIterator};

/// A position on the hex lattice, in axial coordinates. `q` grows to the
/// east and `r` grows to the southeast, so consecutive rows are staggered by
/// half a hex. A third cube coordinate `s` exists but is fully determined by
/// the other two (`q + r + s = 0` for every valid position), so we only
/// store `q` and `r` and derive `s` on access. That keeps the memory
/// footprint down and means the cube invariant can never drift.
///
/// Hex values are plain lattice addresses: they know nothing about hex size
/// or plane positions. [HexPlane](crate::HexPlane) is the sole translator
/// between the lattice and the continuous plane.
///
/// The display form `(q, r)` is injective over the lattice, so it doubles as
/// a canonical key form in external apps that can't use structured keys.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.q", "self.r")]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The derived third cube coordinate. Since `q + r + s = 0` for all
    /// valid positions, this is always `-q - r`.
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// Get the position of the adjacent hex in a particular direction
    pub fn adjacent(self, direction: HexDirection) -> Hex {
        self + direction.to_vector()
    }

    /// Get an iterator of the positions directly adjacent to this one, in
    /// clockwise order starting east. The iterator always contains exactly
    /// 6 values.
    pub fn adjacents(self) -> impl Iterator<Item = Hex> {
        HexDirection::iter().map(move |direction| self.adjacent(direction))
    }

    /// Calculate the path distance between two hexes, meaning the number of
    /// hops it takes to get from one to the other. 0 if the positions are
    /// equal, 1 if they are adjacent, 2 if there is 1 hex between them, etc.
    pub fn distance_to(self, other: Hex) -> usize {
        // https://www.redblobgames.com/grids/hexagons/#distances
        ((self.q - other.q).abs()
            + (self.r - other.r).abs()
            + (self.s() - other.s()).abs()) as usize
            // Two adjacent hex centers are always separated by two cube
            // edges, hence the /2
            / 2
    }
}

/// The 6 directions in which a hex touches its neighbors. For any given hex,
/// a direction can represent two useful things:
///
/// - Direction from its center to the midpoint of one of its sides
/// - Direction to a neighboring hex's center
#[derive(
    Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HexDirection {
    /// East
    E,
    /// Southeast
    SE,
    /// Southwest
    SW,
    /// West
    W,
    /// Northwest
    NW,
    /// Northeast
    NE,
}

impl HexDirection {
    /// All 6 directions, in clockwise order around the compass starting at
    /// east. This ordering is a stable part of the API: neighbor queries
    /// everywhere in this crate yield values in this order.
    pub const CLOCKWISE: [Self; 6] =
        [Self::E, Self::SE, Self::SW, Self::W, Self::NW, Self::NE];

    /// Get the direction at the given index in the clockwise ordering.
    /// Panics if the index isn't in `[0, 6)`: that's a bug in the caller,
    /// so we reject it rather than clamp.
    pub fn from_clockwise_index(index: usize) -> Self {
        Self::CLOCKWISE[index]
    }

    /// Get the index of this direction within the clockwise ordering
    pub fn clockwise_index(self) -> usize {
        Self::CLOCKWISE
            .iter()
            .position(|direction| self == *direction)
            .unwrap()
    }

    /// Get the direction that is directly opposite this one
    pub fn opposite(self) -> Self {
        Self::CLOCKWISE[(self.clockwise_index() + 3) % 6]
    }

    /// Get the offset that moves a position one hex in this direction. Each
    /// component of the returned value is one of `0`, `1`, or `-1`.
    pub fn to_vector(self) -> Hex {
        match self {
            Self::E => Hex::new(1, 0),
            Self::SE => Hex::new(0, 1),
            Self::SW => Hex::new(-1, 1),
            Self::W => Hex::new(-1, 0),
            Self::NW => Hex::new(0, -1),
            Self::NE => Hex::new(1, -1),
        }
    }
}

/// A 2D point in plane space. See module-level docs in [crate::grid] for a
/// description of what plane space means.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    PartialOrd,
    From,
    Into,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    Sum,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.x", "self.y")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<nalgebra::Point2<f64>> for Point2 {
    fn from(other: nalgebra::Point2<f64>) -> Self {
        Self {
            x: other.x,
            y: other.y,
        }
    }
}

/// An axis-aligned rectangle in plane space, defined by its top-left corner
/// (minimum x and y; y grows downward in plane space) plus a width and
/// height.
#[derive(
    Copy, Clone, Debug, Default, Display, PartialEq, Serialize, Deserialize,
)]
#[display(fmt = "[{} {}x{}]", "self.origin", "self.width", "self.height")]
pub struct Rect {
    pub origin: Point2,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(origin: Point2, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// The corner with the maximum x and y
    pub fn far_corner(self) -> Point2 {
        self.origin + Point2::new(self.width, self.height)
    }

    /// Check whether two rectangles overlap. Overlap is strict: rectangles
    /// that merely share an edge or corner don't intersect.
    pub fn intersects(self, other: Rect) -> bool {
        let self_far = self.far_corner();
        let other_far = other.far_corner();
        self.origin.x < other_far.x
            && other.origin.x < self_far.x
            && self.origin.y < other_far.y
            && other.origin.y < self_far.y
    }
}

// Translate a rectangle, leaving its size untouched
impl ops::Add<Point2> for Rect {
    type Output = Self;

    fn add(self, rhs: Point2) -> Self {
        Self {
            origin: self.origin + rhs,
            ..self
        }
    }
}
