//! Density grid and point-set reduction
//!
//! Every computation produces a `grid_size x grid_size` count grid over the
//! retained points. When more distinct points remain than the binning
//! threshold, the geometry stage works on one count-weighted centroid per
//! occupied cell instead of the points themselves.

use ndarray::Array2;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::config::BinningConfig;
use crate::types::{BoundingBox, Point, WeightedPoint};

/// Counts per cell over a bounding box, indexed `[[ix, iy]]`
#[derive(Debug, Clone, PartialEq)]
pub struct BinGrid {
    counts: Array2<u64>,
    bounds: BoundingBox,
}

impl BinGrid {
    /// An empty grid of `size x size` cells spanning `bounds`
    pub fn new(size: usize, bounds: BoundingBox) -> Self {
        Self {
            counts: Array2::zeros((size, size)),
            bounds,
        }
    }

    /// Cells per axis
    pub fn size(&self) -> usize {
        self.counts.nrows()
    }

    /// The count array
    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    /// Count in cell `(ix, iy)`
    pub fn get(&self, ix: usize, iy: usize) -> Option<u64> {
        self.counts.get((ix, iy)).copied()
    }

    /// Box spanned by the grid, in caller units
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    /// Number of non-empty cells
    pub fn occupied(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Center of cell `(ix, iy)` in caller units
    pub fn cell_center(&self, ix: usize, iy: usize) -> Point {
        let size = self.size() as f64;
        self.bounds.denormalize(&Point::new(
            (ix as f64 + 0.5) / size,
            (iy as f64 + 0.5) / size,
        ))
    }

    /// Counts as nested vectors, outer index `ix`
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        self.counts.outer_iter().map(|row| row.to_vec()).collect()
    }

    fn add(&mut self, ix: usize, iy: usize, weight: u64) {
        self.counts[[ix, iy]] += weight;
    }
}

#[derive(Serialize)]
struct BinGridRepr<'a> {
    grid_size: usize,
    bounds: &'a BoundingBox,
    counts: Vec<Vec<u64>>,
}

impl Serialize for BinGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BinGridRepr {
            grid_size: self.size(),
            bounds: &self.bounds,
            counts: self.to_rows(),
        }
        .serialize(serializer)
    }
}

/// Output of [`Binner::bin`]
#[derive(Debug, Clone)]
pub struct Binned {
    pub grid: BinGrid,
    /// Point set for the geometry stage
    pub points: Vec<WeightedPoint>,
    /// Whether `points` are cell representatives rather than the input
    pub replaced: bool,
}

/// Aggregates unit-square points into a fixed grid
#[derive(Debug, Clone)]
pub struct Binner {
    grid_size: usize,
    threshold: usize,
}

impl Binner {
    pub fn new(config: &BinningConfig) -> Self {
        Self {
            grid_size: config.grid_size,
            threshold: config.binning_threshold,
        }
    }

    /// Cell index along one axis; the upper boundary falls into the last cell
    fn cell(&self, v: f64) -> usize {
        let index = (v * self.grid_size as f64).floor();
        if index <= 0.0 {
            0
        } else {
            (index as usize).min(self.grid_size - 1)
        }
    }

    /// Bin `points` (unit-square coordinates); `bounds` is recorded on the grid
    pub fn bin(&self, points: &[WeightedPoint], bounds: BoundingBox) -> Binned {
        let size = self.grid_size;
        let mut grid = BinGrid::new(size, bounds);
        let mut sums = vec![(0.0f64, 0.0f64); size * size];

        for wp in points {
            let ix = self.cell(wp.point.x);
            let iy = self.cell(wp.point.y);
            grid.add(ix, iy, wp.weight);
            let w = wp.weight as f64;
            let sum = &mut sums[ix * size + iy];
            sum.0 += wp.point.x * w;
            sum.1 += wp.point.y * w;
        }

        let replaced = points.len() > self.threshold;
        let points = if replaced {
            let mut representatives = Vec::with_capacity(grid.occupied());
            for ix in 0..size {
                for iy in 0..size {
                    let count = grid.counts[[ix, iy]];
                    if count == 0 {
                        continue;
                    }
                    let (sx, sy) = sums[ix * size + iy];
                    let c = count as f64;
                    representatives.push(WeightedPoint::new(Point::new(sx / c, sy / c), count));
                }
            }
            representatives
        } else {
            points.to_vec()
        };

        debug!(
            grid_size = size,
            occupied = grid.occupied(),
            replaced,
            geometry_points = points.len(),
            "binned points"
        );

        Binned {
            grid,
            points,
            replaced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::total_weight;

    fn unit_bounds() -> BoundingBox {
        BoundingBox::new([0.0, 0.0], [1.0, 1.0])
    }

    fn binner(grid_size: usize, binning_threshold: usize) -> Binner {
        Binner::new(&BinningConfig {
            grid_size,
            binning_threshold,
        })
    }

    #[test]
    fn test_upper_boundary_in_last_cell() {
        let points = vec![
            WeightedPoint::new(Point::new(1.0, 1.0), 1),
            WeightedPoint::new(Point::new(0.0, 0.0), 2),
        ];
        let binned = binner(10, 50).bin(&points, unit_bounds());

        assert_eq!(binned.grid.get(9, 9), Some(1));
        assert_eq!(binned.grid.get(0, 0), Some(2));
        assert_eq!(binned.grid.total(), 3);
        assert!(!binned.replaced);
        assert_eq!(binned.points, points);
    }

    #[test]
    fn test_indexing_is_x_first() {
        let points = vec![WeightedPoint::new(Point::new(0.95, 0.05), 1)];
        let binned = binner(10, 50).bin(&points, unit_bounds());
        assert_eq!(binned.grid.get(9, 0), Some(1));
        assert_eq!(binned.grid.to_rows()[9][0], 1);
    }

    #[test]
    fn test_representatives_replace_points() {
        let points: Vec<WeightedPoint> = (0..100)
            .map(|i| {
                let t = i as f64 / 99.0;
                WeightedPoint::new(Point::new(t, t), 1)
            })
            .collect();
        let binned = binner(4, 50).bin(&points, unit_bounds());

        assert!(binned.replaced);
        assert_eq!(binned.points.len(), 4);
        assert_eq!(total_weight(&binned.points), 100);
        assert_eq!(binned.grid.occupied(), 4);
        for wp in &binned.points {
            assert!((wp.point.x - wp.point.y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_all_in_one_cell() {
        let points = vec![WeightedPoint::new(Point::new(0.5, 0.5), 7)];
        let binned = binner(30, 50).bin(&points, unit_bounds());

        assert_eq!(binned.grid.occupied(), 1);
        assert_eq!(binned.grid.get(15, 15), Some(7));
    }

    #[test]
    fn test_cell_center() {
        let grid = BinGrid::new(2, BoundingBox::new([0.0, 10.0], [4.0, 14.0]));
        assert_eq!(grid.cell_center(0, 1), Point::new(1.0, 13.0));
        assert_eq!(grid.size(), 2);
    }

    #[test]
    fn test_serialize_rows() {
        let points = vec![WeightedPoint::new(Point::new(0.9, 0.1), 3)];
        let binned = binner(2, 50).bin(&points, unit_bounds());
        let json = serde_json::to_value(&binned.grid).unwrap();

        assert_eq!(json["grid_size"], 2);
        assert_eq!(json["counts"], serde_json::json!([[0, 0], [3, 0]]));
    }
}
