//! Common types for scagnostics-core
//!
//! Points, weighted points and the axis-aligned bounding box used for
//! normalization and binning.

use serde::{Deserialize, Serialize};

/// Relative widening applied to an axis with zero extent
pub const DEGENERATE_AXIS_EPSILON: f64 = 1e-9;

/// A 2D point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Difference vector `self - other`
    pub fn sub(&self, other: &Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }

    /// Both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A point standing for `weight` raw observations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedPoint {
    pub point: Point,
    pub weight: u64,
}

impl WeightedPoint {
    pub fn new(point: Point, weight: u64) -> Self {
        Self { point, weight }
    }
}

/// Total weight of a weighted point set
pub fn total_weight(points: &[WeightedPoint]) -> u64 {
    points.iter().map(|p| p.weight).sum()
}

/// A 2D axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl BoundingBox {
    /// Create a bounding box from min/max corners
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    /// Create an empty (invalid) bounding box
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY, f64::INFINITY],
            max: [f64::NEG_INFINITY, f64::NEG_INFINITY],
        }
    }

    /// Bounding box of a set of points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.expand_to_include(point);
        }
        bounds
    }

    /// Check if the bounding box is empty/invalid
    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    /// Expand to include a point
    pub fn expand_to_include(&mut self, point: &Point) {
        self.min[0] = self.min[0].min(point.x);
        self.min[1] = self.min[1].min(point.y);
        self.max[0] = self.max[0].max(point.x);
        self.max[1] = self.max[1].max(point.y);
    }

    /// Extent along x
    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    /// Extent along y
    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    /// Area of the box
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.width() * self.height()
    }

    /// Check if a point is contained
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.min[0]
            && point.x <= self.max[0]
            && point.y >= self.min[1]
            && point.y <= self.max[1]
    }

    /// Copy of the box where every zero-extent axis is widened symmetrically
    ///
    /// A degenerate axis gets a half-width of `DEGENERATE_AXIS_EPSILON` scaled
    /// by the magnitude of its coordinate, so its values normalize to 0.5.
    pub fn widened(&self) -> Self {
        let mut widened = *self;
        for axis in 0..2 {
            if widened.max[axis] - widened.min[axis] <= 0.0 {
                let center = widened.min[axis];
                let pad = DEGENERATE_AXIS_EPSILON * center.abs().max(1.0);
                widened.min[axis] = center - pad;
                widened.max[axis] = center + pad;
            }
        }
        widened
    }

    /// Half the extent along `axis`, finite for any finite box
    fn half_extent(&self, axis: usize) -> f64 {
        self.max[axis] * 0.5 - self.min[axis] * 0.5
    }

    /// Map a point into unit-square coordinates relative to this box
    ///
    /// Both ends are halved before subtracting, so boxes wider than
    /// `f64::MAX` still normalize. The box should be non-degenerate, see
    /// [`BoundingBox::widened`].
    pub fn normalize(&self, point: &Point) -> Point {
        Point {
            x: (point.x * 0.5 - self.min[0] * 0.5) / self.half_extent(0),
            y: (point.y * 0.5 - self.min[1] * 0.5) / self.half_extent(1),
        }
    }

    /// Inverse of [`BoundingBox::normalize`]
    pub fn denormalize(&self, point: &Point) -> Point {
        Point {
            x: 2.0 * (self.min[0] * 0.5 + point.x * self.half_extent(0)),
            y: 2.0 * (self.min[1] * 0.5 + point.y * self.half_extent(1)),
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.sub(&a), (3.0, 4.0));
    }

    #[test]
    fn test_bounds_from_points() {
        let points = [Point::new(1.0, 5.0), Point::new(-2.0, 3.0), Point::new(0.5, 9.0)];
        let bounds = BoundingBox::from_points(&points);

        assert_eq!(bounds.min, [-2.0, 3.0]);
        assert_eq!(bounds.max, [1.0, 9.0]);
        assert_eq!(bounds.area(), 18.0);
        assert!(bounds.contains_point(&Point::new(0.0, 4.0)));
        assert!(!bounds.contains_point(&Point::new(2.0, 4.0)));
    }

    #[test]
    fn test_empty_bounds() {
        let bounds = BoundingBox::from_points(&Vec::<Point>::new());
        assert!(bounds.is_empty());
        assert_eq!(bounds.area(), 0.0);
    }

    #[test]
    fn test_widened_degenerate_axis() {
        let points = [Point::new(2.0, 1.0), Point::new(2.0, 3.0)];
        let bounds = BoundingBox::from_points(&points).widened();

        assert!(bounds.width() > 0.0);
        assert_eq!(bounds.height(), 2.0);

        let normalized = bounds.normalize(&points[1]);
        assert!((normalized.x - 0.5).abs() < 1e-6);
        assert_eq!(normalized.y, 1.0);
    }

    #[test]
    fn test_normalize_wider_than_f64_max() {
        let points = [
            Point::new(-1.5e308, -1.0e308),
            Point::new(1.5e308, 1.7e308),
            Point::new(0.0, 0.35e308),
        ];
        let bounds = BoundingBox::from_points(&points);
        assert!(bounds.width().is_infinite());

        let low = bounds.normalize(&points[0]);
        let high = bounds.normalize(&points[1]);
        let mid = bounds.normalize(&points[2]);
        assert_eq!((low.x, low.y), (0.0, 0.0));
        assert_eq!((high.x, high.y), (1.0, 1.0));
        assert!((mid.x - 0.5).abs() < 1e-12);
        assert!((mid.y - 0.5).abs() < 1e-12);

        let back = bounds.denormalize(&mid);
        assert!(back.x.abs() < 1e295);
        assert!((back.y / 0.35e308 - 1.0).abs() < 1e-12);
    }
}
