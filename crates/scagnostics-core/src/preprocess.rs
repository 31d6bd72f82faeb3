//! Point preprocessing: validation, cleaning, normalization and outlier peeling
//!
//! The preprocessor turns two raw coordinate sequences into a set of distinct,
//! weighted points in the unit square. Non-finite pairs are dropped, exact
//! duplicates are merged and, optionally, isolated points are peeled off the
//! minimum spanning tree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OutlierConfig;
use crate::error::{validation, InvalidInputError, ScagResult};
use crate::geometry::Geometry;
use crate::types::{total_weight, BoundingBox, Point, WeightedPoint};

/// Relative slack on the outlier fence so evenly spaced points are not
/// separated by rounding noise
const FENCE_TOLERANCE: f64 = 1e-9;

/// Observation counts for one computation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointCounts {
    /// Input length
    pub total: usize,
    /// Pairs dropped for a non-finite coordinate
    pub missing: usize,
    /// Observations removed as outliers
    pub outliers: usize,
    /// Observations that reach the metric stage
    pub retained: usize,
    /// Distinct retained positions
    pub unique: usize,
}

/// Output of [`Preprocessor::prepare`]
#[derive(Debug, Clone)]
pub struct PreparedPoints {
    /// Distinct retained positions in the unit square, first-seen order
    pub points: Vec<WeightedPoint>,
    /// Bounding box of the retained observations, in caller units
    pub bounds: BoundingBox,
    /// Raw x of every retained observation
    pub retained_x: Vec<f64>,
    /// Raw y of every retained observation
    pub retained_y: Vec<f64>,
    pub counts: PointCounts,
    /// `true` at input positions removed as outliers
    pub outlier_mask: Vec<bool>,
    /// Geometry already built over `points`, when peeling produced one
    pub geometry: Option<Geometry>,
}

/// Validates and cleans raw coordinates
#[derive(Debug, Clone)]
pub struct Preprocessor {
    config: OutlierConfig,
}

/// Outcome of outlier peeling over the unique points
struct Peeled {
    /// Per unique point: still retained
    active: Vec<bool>,
    /// Geometry of the first round, over every unique point
    first_round: Option<Geometry>,
    removed_any: bool,
}

impl Preprocessor {
    pub fn new(config: &OutlierConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Validate, filter, normalize, deduplicate and peel `x`/`y`
    pub fn prepare(&self, x: &[f64], y: &[f64]) -> ScagResult<PreparedPoints> {
        validation::validate_pair(x.len(), y.len())?;
        let total = x.len();

        let finite: Vec<usize> = (0..total)
            .filter(|&i| x[i].is_finite() && y[i].is_finite())
            .collect();
        if finite.len() < 2 {
            return Err(InvalidInputError::TooFewFinitePoints {
                finite: finite.len(),
                total,
            }
            .into());
        }
        let missing = total - finite.len();

        let raw: Vec<Point> = finite.iter().map(|&i| Point::new(x[i], y[i])).collect();
        let bounds = BoundingBox::from_points(&raw).widened();
        let normalized: Vec<Point> = raw.iter().map(|p| bounds.normalize(p)).collect();
        let (unique, membership) = dedupe(&normalized);

        debug!(
            total,
            missing,
            unique = unique.len(),
            "filtered and deduplicated input"
        );

        let peeled = if self.config.remove_outliers && unique.len() >= 3 {
            self.peel(&unique)
        } else {
            Peeled {
                active: vec![true; unique.len()],
                first_round: None,
                removed_any: false,
            }
        };

        let mut outlier_mask = vec![false; total];
        if !peeled.removed_any {
            let counts = PointCounts {
                total,
                missing,
                outliers: 0,
                retained: finite.len(),
                unique: unique.len(),
            };
            let retained_x = finite.iter().map(|&i| x[i]).collect();
            let retained_y = finite.iter().map(|&i| y[i]).collect();
            return Ok(PreparedPoints {
                points: unique,
                bounds,
                retained_x,
                retained_y,
                counts,
                outlier_mask,
                geometry: peeled.first_round,
            });
        }

        let mut kept: Vec<usize> = Vec::with_capacity(finite.len());
        for (k, &i) in finite.iter().enumerate() {
            if peeled.active[membership[k]] {
                kept.push(i);
            } else {
                outlier_mask[i] = true;
            }
        }

        // Re-normalize over the retained observations only
        let raw: Vec<Point> = kept.iter().map(|&i| Point::new(x[i], y[i])).collect();
        let bounds = BoundingBox::from_points(&raw).widened();
        let normalized: Vec<Point> = raw.iter().map(|p| bounds.normalize(p)).collect();
        let (points, _) = dedupe(&normalized);

        let counts = PointCounts {
            total,
            missing,
            outliers: finite.len() - kept.len(),
            retained: kept.len(),
            unique: points.len(),
        };
        debug!(
            outliers = counts.outliers,
            retained = counts.retained,
            unique = counts.unique,
            "removed outliers"
        );

        Ok(PreparedPoints {
            points,
            bounds,
            retained_x: kept.iter().map(|&i| x[i]).collect(),
            retained_y: kept.iter().map(|&i| y[i]).collect(),
            counts,
            outlier_mask,
            geometry: None,
        })
    }

    /// Repeatedly drop points whose MST edges are all longer than the fence
    fn peel(&self, unique: &[WeightedPoint]) -> Peeled {
        let mut active = vec![true; unique.len()];
        let mut first_round = None;
        let mut removed_any = false;

        for round in 0..self.config.peel_rounds {
            let indices: Vec<usize> = (0..unique.len()).filter(|&i| active[i]).collect();
            if indices.len() < 3 {
                break;
            }
            let points: Vec<Point> = indices.iter().map(|&i| unique[i].point).collect();
            let geometry = Geometry::build(&points);

            let flagged = long_edge_points(&geometry, self.config.iqr_multiplier);
            debug!(round, flagged = flagged.len(), "outlier peeling round");

            if round == 0 {
                first_round = Some(geometry);
            }
            if flagged.is_empty() {
                break;
            }
            for local in flagged {
                active[indices[local]] = false;
            }
            removed_any = true;
        }

        if removed_any {
            let total = total_weight(unique);
            let removed: u64 = unique
                .iter()
                .zip(&active)
                .filter(|(_, &keep)| !keep)
                .map(|(p, _)| p.weight)
                .sum();
            let remaining = active.iter().filter(|&&keep| keep).count();

            if removed as f64 > self.config.max_outlier_fraction * total as f64 || remaining < 2 {
                debug!(
                    removed,
                    total,
                    remaining,
                    "outlier removal would discard too much, keeping all points"
                );
                active.iter_mut().for_each(|keep| *keep = true);
                removed_any = false;
            }
        }

        Peeled {
            active,
            first_round: if removed_any { None } else { first_round },
            removed_any,
        }
    }
}

/// Local indices of points whose incident MST edges all exceed the fence
fn long_edge_points(geometry: &Geometry, iqr_multiplier: f64) -> Vec<usize> {
    let mst = &geometry.mst;
    let Some(fence) = mst.sorted_lengths().median_fence(iqr_multiplier) else {
        return Vec::new();
    };
    let fence = fence * (1.0 + FENCE_TOLERANCE);

    (0..mst.num_points())
        .filter(|&v| {
            let incident = mst.incident(v);
            !incident.is_empty() && incident.iter().all(|&k| mst.edges()[k].length > fence)
        })
        .collect()
}

/// Merge coincident points, keeping first-occurrence order
///
/// Returns the weighted unique points and, per input point, its unique index.
pub fn dedupe(points: &[Point]) -> (Vec<WeightedPoint>, Vec<usize>) {
    let mut index: HashMap<(u64, u64), usize> = HashMap::with_capacity(points.len());
    let mut unique: Vec<WeightedPoint> = Vec::new();
    let mut membership = Vec::with_capacity(points.len());

    for point in points {
        // Adding +0.0 folds -0.0 into +0.0
        let key = ((point.x + 0.0).to_bits(), (point.y + 0.0).to_bits());
        let slot = *index.entry(key).or_insert_with(|| {
            unique.push(WeightedPoint::new(*point, 0));
            unique.len() - 1
        });
        unique[slot].weight += 1;
        membership.push(slot);
    }

    (unique, membership)
}
