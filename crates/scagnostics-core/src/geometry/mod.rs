//! Geometric graphs over a planar point set
//!
//! - **ConvexHull**: monotone-chain hull, extreme vertices only
//! - **Triangulation**: incremental Bowyer-Watson Delaunay triangulation
//! - **SpanningTree**: Prim's MST restricted to the triangulation edges
//!
//! All structures are index-based: edges and triangles reference positions in
//! the point slice they were built from.

pub mod delaunay;
pub mod hull;
pub mod mst;

pub use delaunay::Triangulation;
pub use hull::ConvexHull;
pub use mst::SpanningTree;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::types::Point;

/// An undirected edge between two point indices, `a < b`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub length: f64,
}

impl Edge {
    /// Create an edge between two points, ordering the endpoints
    pub fn between(points: &[Point], u: usize, v: usize) -> Self {
        let (a, b) = if u < v { (u, v) } else { (v, u) };
        Self {
            a,
            b,
            length: points[a].distance(&points[b]),
        }
    }

    /// The endpoint opposite `v`
    pub fn other(&self, v: usize) -> usize {
        if self.a == v {
            self.b
        } else {
            self.a
        }
    }

    /// Check whether `v` is an endpoint
    pub fn touches(&self, v: usize) -> bool {
        self.a == v || self.b == v
    }
}

/// Twice the signed area of triangle `abc`; positive when counter-clockwise
pub fn orient(a: &Point, b: &Point, c: &Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// In-circle determinant for a counter-clockwise triangle `abc`
///
/// Positive when `d` lies strictly inside the circumcircle, zero on it.
pub fn in_circle(a: &Point, b: &Point, c: &Point, d: &Point) -> f64 {
    let (adx, ady) = a.sub(d);
    let (bdx, bdy) = b.sub(d);
    let (cdx, cdy) = c.sub(d);

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    adx * (bdy * cd - bd * cdy) - ady * (bdx * cd - bd * cdx) + ad * (bdx * cdy - bdy * cdx)
}

/// Circumradius of triangle `abc`; infinite for a degenerate triangle
pub fn circumradius(a: &Point, b: &Point, c: &Point) -> f64 {
    let twice_area = orient(a, b, c).abs();
    if twice_area == 0.0 {
        return f64::INFINITY;
    }
    a.distance(b) * b.distance(c) * c.distance(a) / (2.0 * twice_area)
}

/// Area of triangle `abc`
pub fn triangle_area(a: &Point, b: &Point, c: &Point) -> f64 {
    orient(a, b, c).abs() / 2.0
}

/// Hull, triangulation and spanning tree of one point set
#[derive(Debug, Clone)]
pub struct Geometry {
    pub hull: ConvexHull,
    pub triangulation: Triangulation,
    pub mst: SpanningTree,
}

impl Geometry {
    /// Build all three structures for `points`
    ///
    /// Points are expected to be distinct; exact duplicates are left isolated
    /// in the triangulation and therefore in the tree.
    pub fn build(points: &[Point]) -> Self {
        let hull = ConvexHull::compute(points);
        let triangulation = Triangulation::compute(points);
        let mst = SpanningTree::compute(points.len(), triangulation.edges());

        trace!(
            points = points.len(),
            hull_vertices = hull.vertices().len(),
            triangles = triangulation.triangles().len(),
            edges = triangulation.edges().len(),
            mst_edges = mst.edges().len(),
            "built geometry"
        );

        Self {
            hull,
            triangulation,
            mst,
        }
    }

    /// Number of points the structures were built over
    pub fn num_points(&self) -> usize {
        self.triangulation.num_points()
    }
}
