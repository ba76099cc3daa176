use crate::grid::{Hex, Point2, Rect};
use anyhow::anyhow;
use log::{debug, trace};
use nalgebra::Matrix2;

/// A hex plane maps the integer hex lattice onto a continuous 2D plane, and
/// back. It is the sole translator between the two spaces: hexes themselves
/// are plain lattice addresses and know nothing about size or position.
///
/// A plane is constructed from a single parameter (the face-to-face width
/// of one hex), and every other geometric quantity (hex height, row
/// separation, vertex offsets, the bounding rectangle, the lattice/plane
/// basis) is derived from it once, at construction. Nothing mutates
/// afterwards, so a single plane can be shared freely across threads.
/// Planes are also cheap to create: if you need different hex dimensions,
/// just create a new one.
///
/// Aside from the two point conversions, a plane answers the polygon and
/// viewport queries a host application needs to draw or pick hexes:
/// [Self::vertices], [Self::bounding_box], and [Self::visible].
#[derive(Clone, Debug)]
pub struct HexPlane {
    /// Face-to-face diameter of one hex, the sole input parameter
    hex_width: f64,
    /// Vertex-to-vertex diameter: `(2/√3) · hex_width`
    hex_height: f64,
    /// Plane y-distance between the centers of two adjacent rows:
    /// `(√3/2) · hex_width`. Rows overlap vertically, so this is less than
    /// the hex height.
    row_separation: f64,
    /// Center-to-vertex offsets, clockwise from the northeast vertex
    vertex_offsets: [Point2; 6],
    /// Bounding rectangle of a hex centered on the plane origin
    bounding_rect: Rect,
    /// Lattice-to-plane basis: maps axial `(q, r)` to the hex's center point
    to_plane: Matrix2<f64>,
    /// Inverse basis: maps a plane point to fractional axial coordinates
    to_lattice: Matrix2<f64>,
}

impl HexPlane {
    /// Create a plane for hexes of the given face-to-face width. Returns an
    /// error if the width isn't finite and positive.
    pub fn new(hex_width: f64) -> anyhow::Result<Self> {
        if !hex_width.is_finite() || hex_width <= 0.0 {
            return Err(anyhow!(
                "invalid hex width {}; must be finite and positive",
                hex_width
            ));
        }

        let sqrt_3 = 3.0_f64.sqrt();
        let hex_height = hex_width * 2.0 / sqrt_3;
        let row_separation = hex_width * sqrt_3 / 2.0;

        // Half the hex width, and the y-distance from the center to the four
        // side vertices. The top/bottom vertices sit at twice that distance.
        let a = hex_width / 2.0;
        let b = hex_width / (2.0 * sqrt_3);
        // Clockwise from the northeast vertex
        let vertex_offsets = [
            Point2::new(a, -b),         // NE
            Point2::new(a, b),          // SE
            Point2::new(0.0, 2.0 * b),  // S
            Point2::new(-a, b),         // SW
            Point2::new(-a, -b),        // NW
            Point2::new(0.0, -2.0 * b), // N
        ];
        // Tight in x (the side vertices), tall enough in y to cover the
        // top/bottom vertices. Total height equals the hex height.
        let bounding_rect =
            Rect::new(Point2::new(-a, -2.0 * b), hex_width, 4.0 * b);

        // x = (q + r/2)·hex_width, y = r·row_separation. The r/2 term is
        // what staggers consecutive rows by half a hex.
        let to_plane =
            Matrix2::new(hex_width, hex_width / 2.0, 0.0, row_separation);
        // The basis is triangular with a nonzero diagonal, so for any valid
        // width this inversion succeeds
        let to_lattice = to_plane
            .try_inverse()
            .expect("hex basis matrix is not invertible");

        debug!(
            "created hex plane: hex_width={}, hex_height={}, row_separation={}",
            hex_width, hex_height, row_separation
        );

        Ok(Self {
            hex_width,
            hex_height,
            row_separation,
            vertex_offsets,
            bounding_rect,
            to_plane,
            to_lattice,
        })
    }

    /// Face-to-face diameter of one hex
    pub fn hex_width(&self) -> f64 {
        self.hex_width
    }

    /// Vertex-to-vertex diameter of one hex
    pub fn hex_height(&self) -> f64 {
        self.hex_height
    }

    /// Plane y-distance between the centers of two adjacent rows
    pub fn row_separation(&self) -> f64 {
        self.row_separation
    }

    /// Get the plane position of a hex's center point. Hex `(0, 0)` lands on
    /// the plane origin.
    pub fn center(&self, hex: Hex) -> Point2 {
        (self.to_plane
            * nalgebra::Point2::new(f64::from(hex.q), f64::from(hex.r)))
        .into()
    }

    /// Find the hex whose region of the plane contains the given point. This
    /// is the inverse of [Self::center], and it's lossy by design: every
    /// point maps to exactly one hex, and `plane.hex_at(plane.center(hex))`
    /// gets back `hex` exactly.
    pub fn hex_at(&self, point: Point2) -> Hex {
        let fractional =
            self.to_lattice * nalgebra::Point2::new(point.x, point.y);
        round_axial(fractional.x, fractional.y)
    }

    /// Get the plane positions of a hex's six vertices, clockwise starting
    /// from the northeast vertex. Useful for drawing or hit-testing the hex
    /// polygon.
    pub fn vertices(&self, hex: Hex) -> [Point2; 6] {
        let center = self.center(hex);
        self.vertex_offsets.map(|offset| center + offset)
    }

    /// Get the axis-aligned bounding rectangle of a hex's polygon. The
    /// rectangle is guaranteed to contain the polygon but isn't minimal
    /// under rotation; axis alignment keeps intersection tests cheap.
    pub fn bounding_box(&self, hex: Hex) -> Rect {
        self.bounding_rect + self.center(hex)
    }

    /// Enumerate every hex that may intersect the given rectangle, computed
    /// directly from the rectangle's corners, never by scanning the
    /// lattice. The result
    /// is a sound over-approximation: every hex that overlaps the rectangle
    /// is included, along with a bounded number of extra hexes just outside
    /// it (mostly along the top and bottom edges). Callers that need an
    /// exact set can post-filter with [Self::bounding_box] and
    /// [Rect::intersects], or an exact polygon test.
    pub fn visible(&self, rect: Rect) -> impl Iterator<Item = Hex> {
        // Re-parametrize the plane into a secondary integer grid (i, j)
        // whose corner-to-index mapping is axis-aligned, unlike the sheared
        // (q, r). Each hex spans two half-hex columns (two values of i) in
        // its row and a single j.
        let far = rect.far_corner();
        let i_min = (2.0 * rect.origin.x / self.hex_width).floor() as i64;
        let j_min = (rect.origin.y / self.row_separation + 1.0 / 3.0).floor()
            as i64;
        let mut i_max = (2.0 * far.x / self.hex_width).floor() as i64;
        let mut j_max =
            (far.y / self.row_separation + 1.0 / 3.0).floor() as i64;

        // A parity mismatch between the corner columns would drop a trailing
        // half-hex column
        if (i_max - i_min).rem_euclid(2) == 1 {
            i_max += 1;
        }
        // The bottom edge can clip the top tip of hexes in the next row down
        j_max += 1;

        trace!(
            "culling {}: i in [{}, {}], j in [{}, {}]",
            rect,
            i_min,
            i_max,
            j_min,
            j_max
        );

        // Step i by 2: a hex covers two adjacent half-columns, and both map
        // back to the same axial column below, so visiting every other i
        // avoids emitting each hex twice
        (i_min..=i_max).step_by(2).flat_map(move |i| {
            (j_min..=j_max).map(move |j| {
                let q = (i - j + 1).div_euclid(2);
                Hex::new(q as i32, j as i32)
            })
        })
    }
}

/// Snap fractional axial coordinates to the containing lattice hex. Rounds
/// all three cube coordinates independently, then recomputes the one whose
/// rounding deviated most from its fractional source, so the cube invariant
/// survives the snap.
/// https://www.redblobgames.com/grids/hexagons/#rounding
fn round_axial(q: f64, r: f64) -> Hex {
    let s = -q - r;
    let mut rounded_q = q.round();
    let mut rounded_r = r.round();
    let mut rounded_s = s.round();

    let dq = (rounded_q - q).abs();
    let dr = (rounded_r - r).abs();
    let ds = (rounded_s - s).abs();

    if dq > dr && dq > ds {
        rounded_q = -rounded_r - rounded_s;
    } else if dr > ds {
        rounded_r = -rounded_q - rounded_s;
    } else {
        rounded_s = -rounded_q - rounded_r;
    }

    // A nonzero sum here is a defect in the arithmetic above, not a bad
    // input
    assert_eq!(
        rounded_q + rounded_r + rounded_s,
        0.0,
        "rounded cube coordinates ({}, {}, {}) don't sum to zero",
        rounded_q,
        rounded_r,
        rounded_s
    );

    Hex::new(rounded_q as i32, rounded_r as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_new_rejects_bad_widths() {
        assert!(HexPlane::new(0.0).is_err());
        assert!(HexPlane::new(-2.0).is_err());
        assert!(HexPlane::new(f64::NAN).is_err());
        assert!(HexPlane::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_derived_quantities() {
        let plane = HexPlane::new(2.0).unwrap();
        assert_approx_eq!(plane.hex_width(), 2.0);
        assert_approx_eq!(plane.hex_height(), 4.0 / 3.0_f64.sqrt());
        assert_approx_eq!(plane.row_separation(), 3.0_f64.sqrt());
    }

    #[test]
    fn test_center() {
        let plane = HexPlane::new(2.0).unwrap();

        let origin = plane.center(Hex::ORIGIN);
        assert_approx_eq!(origin.x, 0.0);
        assert_approx_eq!(origin.y, 0.0);

        // One column east: exactly one hex width over
        let east = plane.center(Hex::new(1, 0));
        assert_approx_eq!(east.x, 2.0);
        assert_approx_eq!(east.y, 0.0);

        // One row down: staggered half a width over, one row separation down
        let southeast = plane.center(Hex::new(0, 1));
        assert_approx_eq!(southeast.x, 1.0);
        assert_approx_eq!(southeast.y, 3.0_f64.sqrt());

        let far = plane.center(Hex::new(-3, -2));
        assert_approx_eq!(far.x, -8.0);
        assert_approx_eq!(far.y, -2.0 * 3.0_f64.sqrt());
    }

    #[test]
    fn test_hex_at_near_centers() {
        let plane = HexPlane::new(2.0).unwrap();
        // Points near a center snap to that center's hex, in every direction
        for &hex in &[Hex::ORIGIN, Hex::new(4, -2), Hex::new(-7, 3)] {
            let center = plane.center(hex);
            for &(dx, dy) in &[
                (0.0, 0.0),
                (0.3, 0.0),
                (-0.3, 0.0),
                (0.0, 0.4),
                (0.0, -0.4),
                (0.25, 0.25),
                (-0.25, -0.25),
            ] {
                let nudged = center + Point2::new(dx, dy);
                assert_eq!(
                    plane.hex_at(nudged),
                    hex,
                    "point {} should snap to {}",
                    nudged,
                    hex
                );
            }
        }
    }

    #[test]
    fn test_round_axial_invariant() {
        // Sweep a dense grid of fractional coordinates; the snapped result
        // must satisfy the cube invariant everywhere (the internal assert
        // would fire otherwise) and land within one unit of the input
        for qi in -30..=30 {
            for ri in -30..=30 {
                let q = qi as f64 / 7.0;
                let r = ri as f64 / 7.0;
                let hex = round_axial(q, r);
                assert_eq!(hex.q + hex.r + hex.s(), 0);
                assert!((f64::from(hex.q) - q).abs() <= 1.0);
                assert!((f64::from(hex.r) - r).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn test_round_axial_exact() {
        // Exact lattice inputs round to themselves
        assert_eq!(round_axial(0.0, 0.0), Hex::ORIGIN);
        assert_eq!(round_axial(3.0, -5.0), Hex::new(3, -5));
        // The worst-rounded component gets recomputed from the other two
        assert_eq!(round_axial(0.9, 0.6), Hex::new(1, 1));
        assert_eq!(round_axial(0.6, 0.9), Hex::new(1, 1));
    }

    #[test]
    fn test_vertices_translation_invariance() {
        let plane = HexPlane::new(2.0).unwrap();
        let origin_vertices = plane.vertices(Hex::ORIGIN);

        // Vertices minus the center reproduce the same six offsets at any
        // position
        for &hex in &[Hex::new(1, 0), Hex::new(-5, 2), Hex::new(30, -14)] {
            let center = plane.center(hex);
            let vertices = plane.vertices(hex);
            for (vertex, origin_vertex) in
                vertices.iter().zip(origin_vertices.iter())
            {
                assert_approx_eq!(vertex.x - center.x, origin_vertex.x);
                assert_approx_eq!(vertex.y - center.y, origin_vertex.y);
            }
        }
    }

    #[test]
    fn test_vertex_positions() {
        let plane = HexPlane::new(2.0).unwrap();
        let b = 1.0 / 3.0_f64.sqrt();
        let expected = [
            (1.0, -b),       // NE
            (1.0, b),        // SE
            (0.0, 2.0 * b),  // S
            (-1.0, b),       // SW
            (-1.0, -b),      // NW
            (0.0, -2.0 * b), // N
        ];
        for (vertex, (x, y)) in
            plane.vertices(Hex::ORIGIN).iter().zip(expected)
        {
            assert_approx_eq!(vertex.x, x);
            assert_approx_eq!(vertex.y, y);
        }
    }

    #[test]
    fn test_bounding_box() {
        let plane = HexPlane::new(2.0).unwrap();

        let rect = plane.bounding_box(Hex::ORIGIN);
        assert_approx_eq!(rect.origin.x, -1.0);
        assert_approx_eq!(rect.origin.y, -2.0 / 3.0_f64.sqrt());
        assert_approx_eq!(rect.width, 2.0);
        assert_approx_eq!(rect.height, plane.hex_height());

        // The box always contains all six vertices
        for &hex in &[Hex::new(2, 1), Hex::new(-4, 3)] {
            let rect = plane.bounding_box(hex);
            let far = rect.far_corner();
            for vertex in plane.vertices(hex) {
                assert!(rect.origin.x <= vertex.x && vertex.x <= far.x);
                assert!(rect.origin.y <= vertex.y && vertex.y <= far.y);
            }
        }
    }
}
