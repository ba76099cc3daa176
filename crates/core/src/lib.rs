//! Hexplane is a coordinate-geometry engine for hexagonal grids. It maps
//! between a discrete axial hex lattice and a continuous 2D plane, and
//! answers "which hexes are visible inside this rectangle" queries, to drive
//! rendering or picking in a host application. The engine itself is purely
//! computational: no rendering, no input handling, no knowledge of what is
//! stored per hex.
//!
//! ```
//! use hexplane::{Hex, HexPlane, Point2, Rect};
//!
//! let plane = HexPlane::new(2.0).unwrap();
//!
//! // Lattice -> plane and back
//! let center = plane.center(Hex::new(3, -1));
//! assert_eq!(plane.hex_at(center), Hex::new(3, -1));
//!
//! // Which hexes could a viewport see?
//! let viewport = Rect::new(Point2::new(-5.0, -5.0), 10.0, 10.0);
//! let visible: Vec<Hex> = plane.visible(viewport).collect();
//! assert!(visible.contains(&Hex::new(0, 0)));
//! ```
//!
//! Per-hex payloads live in the storage containers ([DenseHexGrid],
//! [SparseHexGrid]), which share the [HexStore] lookup contract. The
//! geometry engine never touches storage; compose them yourself, e.g. by
//! feeding [HexPlane::visible] output into [HexStore::get_many].

mod grid;
mod plane;

pub use crate::{
    grid::{
        DenseHexGrid, Hex, HexDirection, HexIndexMap, HexMap, HexSet,
        HexStore, Point2, Rect, SparseHexGrid,
    },
    plane::HexPlane,
};
