use crate::grid::unit::{Hex, HexDirection};
use anyhow::anyhow;
use fnv::FnvBuildHasher;
use indexmap::IndexMap;
use std::{
    collections::{HashMap, HashSet},
    ops::RangeInclusive,
};

/// A set of hex positions
pub type HexSet = HashSet<Hex, FnvBuildHasher>;
/// A map of hex positions to some `T`
pub type HexMap<T> = HashMap<Hex, T, FnvBuildHasher>;
/// An ORDERED map of hex positions to some `T`. This has some extra memory
/// overhead, so we should only use it when we actually need the ordering.
pub type HexIndexMap<T> = IndexMap<Hex, T, FnvBuildHasher>;

/// The lookup contract shared by every container that associates a hex
/// position with a payload. The geometry engine never calls into a store;
/// callers compose the two themselves, e.g. by feeding
/// [HexPlane::visible](crate::HexPlane::visible) output into [Self::get_many].
///
/// Misses are values, not errors: looking up a position outside the store
/// (or one never written) yields `None`, so callers can range-check cheaply.
pub trait HexStore<T> {
    /// Get the payload stored at the given position, or `None` if the
    /// position is outside the store or holds nothing.
    fn get(&self, hex: Hex) -> Option<&T>;

    /// Store a payload at the given position, returning the payload that was
    /// previously there (if any).
    fn insert(&mut self, hex: Hex, value: T) -> Option<T>;

    /// Look up a batch of positions at once. The output is parallel to the
    /// input: one entry per requested position, in the same order.
    fn get_many(
        &self,
        hexes: impl IntoIterator<Item = Hex>,
    ) -> Vec<Option<&T>> {
        hexes.into_iter().map(|hex| self.get(hex)).collect()
    }

    /// Get the payloads of all 6 positions adjacent to the given one, in
    /// clockwise order starting east.
    fn neighbor_values(&self, hex: Hex) -> [Option<&T>; 6] {
        HexDirection::CLOCKWISE
            .map(|direction| self.get(hex.adjacent(direction)))
    }

    /// Get the payload of the single adjacent position in the given
    /// direction.
    fn neighbor_value(&self, hex: Hex, direction: HexDirection) -> Option<&T> {
        self.get(hex.adjacent(direction))
    }
}

/// An array-backed store over a rectangular axial region. The region is
/// fixed at construction as two inclusive coordinate ranges; lookups inside
/// it are plain index math, and lookups outside it yield `None`. Use this
/// when the populated area is known up front and mostly full.
#[derive(Clone, Debug)]
pub struct DenseHexGrid<T> {
    q_range: RangeInclusive<i32>,
    r_range: RangeInclusive<i32>,
    /// Row-major: all of row `r_min`, then row `r_min + 1`, etc.
    values: Vec<Option<T>>,
}

impl<T> DenseHexGrid<T> {
    /// Create an empty grid covering the given inclusive coordinate ranges.
    /// Returns an error if either range is empty.
    pub fn new(
        q_range: RangeInclusive<i32>,
        r_range: RangeInclusive<i32>,
    ) -> anyhow::Result<Self> {
        if q_range.is_empty() || r_range.is_empty() {
            return Err(anyhow!(
                "invalid grid region q={:?} r={:?}; both ranges must be non-empty",
                q_range,
                r_range
            ));
        }
        let len = q_range.clone().count() * r_range.clone().count();
        let mut values = Vec::with_capacity(len);
        values.resize_with(len, || None);
        Ok(Self {
            q_range,
            r_range,
            values,
        })
    }

    /// The inclusive `q` range this grid covers
    pub fn q_range(&self) -> RangeInclusive<i32> {
        self.q_range.clone()
    }

    /// The inclusive `r` range this grid covers
    pub fn r_range(&self) -> RangeInclusive<i32> {
        self.r_range.clone()
    }

    /// Number of positions that currently hold a payload
    pub fn len(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|value| value.is_none())
    }

    /// Iterate over all populated positions and their payloads, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Hex, &T)> {
        let q_len = self.q_range.clone().count();
        let q_min = *self.q_range.start();
        let r_min = *self.r_range.start();
        self.values.iter().enumerate().filter_map(move |(i, value)| {
            let hex = Hex::new(
                q_min + (i % q_len) as i32,
                r_min + (i / q_len) as i32,
            );
            value.as_ref().map(|value| (hex, value))
        })
    }

    /// Map a position to its backing index, or `None` if it falls outside
    /// the grid region
    fn index(&self, hex: Hex) -> Option<usize> {
        if self.q_range.contains(&hex.q) && self.r_range.contains(&hex.r) {
            let q_len = self.q_range.clone().count();
            let col = (hex.q - self.q_range.start()) as usize;
            let row = (hex.r - self.r_range.start()) as usize;
            Some(row * q_len + col)
        } else {
            None
        }
    }
}

impl<T> HexStore<T> for DenseHexGrid<T> {
    fn get(&self, hex: Hex) -> Option<&T> {
        self.index(hex).and_then(|i| self.values[i].as_ref())
    }

    fn insert(&mut self, hex: Hex, value: T) -> Option<T> {
        // Writing outside the region is a caller bug, unlike reads
        let i = self.index(hex).unwrap_or_else(|| {
            panic!(
                "position {} is outside grid region q={:?} r={:?}",
                hex, self.q_range, self.r_range
            )
        });
        self.values[i].replace(value)
    }
}

/// A hashmap-backed store with no fixed region. Lookups hash instead of
/// indexing, in exchange for an unbounded, sparse domain. Iteration order is
/// insertion order, so it's deterministic.
#[derive(Clone, Debug)]
pub struct SparseHexGrid<T> {
    values: HexIndexMap<T>,
}

impl<T> SparseHexGrid<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of positions that currently hold a payload
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all populated positions and their payloads, in insertion
    /// order
    pub fn iter(&self) -> impl Iterator<Item = (Hex, &T)> {
        self.values.iter().map(|(hex, value)| (*hex, value))
    }
}

impl<T> Default for SparseHexGrid<T> {
    fn default() -> Self {
        Self {
            values: HexIndexMap::default(),
        }
    }
}

impl<T> HexStore<T> for SparseHexGrid<T> {
    fn get(&self, hex: Hex) -> Option<&T> {
        self.values.get(&hex)
    }

    fn insert(&mut self, hex: Hex, value: T) -> Option<T> {
        self.values.insert(hex, value)
    }
}
