//! Convex hull by Andrew's monotone chain

use serde::{Deserialize, Serialize};

use super::orient;
use crate::types::Point;

/// Convex hull of a point set
///
/// `vertices` are indices into the source slice in counter-clockwise order,
/// starting from the leftmost (then lowest) point. Collinear boundary points are
/// dropped. Degenerate inputs give short hulls: one vertex for a single
/// distinct point, two for collinear points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvexHull {
    vertices: Vec<usize>,
    area: f64,
    perimeter: f64,
}

impl ConvexHull {
    /// Compute the hull of `points`
    pub fn compute(points: &[Point]) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&i, &j| {
            points[i]
                .x
                .total_cmp(&points[j].x)
                .then(points[i].y.total_cmp(&points[j].y))
        });
        order.dedup_by(|a, b| points[*a] == points[*b]);

        if order.len() < 3 {
            return Self::from_vertices(points, order);
        }

        let mut lower: Vec<usize> = Vec::with_capacity(order.len());
        for &i in &order {
            while lower.len() >= 2
                && orient(
                    &points[lower[lower.len() - 2]],
                    &points[lower[lower.len() - 1]],
                    &points[i],
                ) <= 0.0
            {
                lower.pop();
            }
            lower.push(i);
        }

        let mut upper: Vec<usize> = Vec::with_capacity(order.len());
        for &i in order.iter().rev() {
            while upper.len() >= 2
                && orient(
                    &points[upper[upper.len() - 2]],
                    &points[upper[upper.len() - 1]],
                    &points[i],
                ) <= 0.0
            {
                upper.pop();
            }
            upper.push(i);
        }

        // Each chain ends where the other begins
        lower.pop();
        upper.pop();
        lower.extend(upper);

        // All points collinear: the chains collapse to the two extremes
        if lower.len() < 3 {
            let ends = vec![order[0], order[order.len() - 1]];
            return Self::from_vertices(points, ends);
        }

        Self::from_vertices(points, lower)
    }

    fn from_vertices(points: &[Point], vertices: Vec<usize>) -> Self {
        let (area, perimeter) = match vertices.len() {
            0 | 1 => (0.0, 0.0),
            // A segment is walked there and back
            2 => (0.0, 2.0 * points[vertices[0]].distance(&points[vertices[1]])),
            n => {
                let mut twice_area = 0.0;
                let mut perimeter = 0.0;
                for k in 0..n {
                    let p = &points[vertices[k]];
                    let q = &points[vertices[(k + 1) % n]];
                    twice_area += p.x * q.y - q.x * p.y;
                    perimeter += p.distance(q);
                }
                (twice_area.abs() / 2.0, perimeter)
            }
        };

        Self {
            vertices,
            area,
            perimeter,
        }
    }

    /// Hull vertex indices in counter-clockwise order
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Enclosed area, zero for degenerate hulls
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Boundary length
    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Whether the hull encloses a positive area
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Check if `p` lies inside or on the hull, up to `tolerance`
    ///
    /// `points` must be the slice the hull was computed from.
    pub fn contains(&self, points: &[Point], p: &Point, tolerance: f64) -> bool {
        match self.vertices.len() {
            0 => false,
            1 => points[self.vertices[0]].distance(p) <= tolerance,
            2 => {
                let a = &points[self.vertices[0]];
                let b = &points[self.vertices[1]];
                distance_to_segment(a, b, p) <= tolerance
            }
            n => (0..n).all(|k| {
                let a = &points[self.vertices[k]];
                let b = &points[self.vertices[(k + 1) % n]];
                let len = a.distance(b);
                // orient / len is the signed distance to the edge line
                orient(a, b, p) >= -tolerance * len
            }),
        }
    }
}

fn distance_to_segment(a: &Point, b: &Point, p: &Point) -> f64 {
    let (dx, dy) = b.sub(a);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return a.distance(p);
    }
    let (px, py) = p.sub(a);
    let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(&Point::new(a.x + t * dx, a.y + t * dy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&c| Point::from(c)).collect()
    }

    #[test]
    fn test_square_with_interior_point() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0), (0.5, 0.5), (1.0, 1.0), (0.0, 1.0)]);
        let hull = ConvexHull::compute(&points);

        assert_eq!(hull.vertices(), &[0, 1, 3, 4]);
        assert!((hull.area() - 1.0).abs() < 1e-12);
        assert!((hull.perimeter() - 4.0).abs() < 1e-12);
        assert!(!hull.is_degenerate());
    }

    #[test]
    fn test_collinear_boundary_points_dropped() {
        let points = pts(&[(0.0, 0.0), (0.5, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let hull = ConvexHull::compute(&points);
        assert_eq!(hull.vertices().len(), 4);
        assert!(!hull.vertices().contains(&1));
    }

    #[test]
    fn test_collinear_input() {
        let points = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let hull = ConvexHull::compute(&points);

        assert_eq!(hull.vertices(), &[0, 3]);
        assert_eq!(hull.area(), 0.0);
        assert!((hull.perimeter() - 2.0 * 18f64.sqrt()).abs() < 1e-12);
        assert!(hull.is_degenerate());
    }

    #[test]
    fn test_single_and_duplicate_points() {
        let points = pts(&[(0.3, 0.3), (0.3, 0.3)]);
        let hull = ConvexHull::compute(&points);
        assert_eq!(hull.vertices().len(), 1);
        assert_eq!(hull.perimeter(), 0.0);

        assert_eq!(ConvexHull::compute(&[]).vertices().len(), 0);
    }

    #[test]
    fn test_contains() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let hull = ConvexHull::compute(&points);

        assert!(hull.contains(&points, &Point::new(0.5, 0.5), 0.0));
        assert!(hull.contains(&points, &Point::new(1.0, 0.5), 1e-12));
        assert!(!hull.contains(&points, &Point::new(1.1, 0.5), 1e-9));
    }

    #[test]
    fn test_contains_segment() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0)]);
        let hull = ConvexHull::compute(&points);
        assert!(hull.contains(&points, &Point::new(0.5, 0.0), 1e-12));
        assert!(!hull.contains(&points, &Point::new(0.5, 0.1), 1e-3));
    }
}
