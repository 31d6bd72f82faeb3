//! The scagnostics pipeline
//!
//! `compute` runs preprocess -> bin -> geometry -> prune -> measure for one
//! pair of coordinate sequences. Every call is independent and allocates only
//! call-local state.

use serde::Serialize;
use tracing::debug;

use crate::binning::{BinGrid, Binner};
use crate::config::ScagnosticsConfig;
use crate::error::{validation, ScagResult};
use crate::geometry::Geometry;
use crate::metrics::{MetricInputs, Metrics};
use crate::preprocess::{PointCounts, Preprocessor};
use crate::prune::{AlphaShape, PrunedTree};
use crate::types::Point;

/// Measures, density grid and bookkeeping of one computation
#[derive(Debug, Clone, Serialize)]
pub struct ScagnosticsResult {
    pub metrics: Metrics,
    pub bins: BinGrid,
    pub counts: PointCounts,
    /// `true` at input positions removed as outliers
    pub outliers: Vec<bool>,
}

impl ScagnosticsResult {
    /// Split into the measures and the density grid
    pub fn into_parts(self) -> (Metrics, BinGrid) {
        (self.metrics, self.bins)
    }
}

/// Scagnostics engine with a validated configuration
#[derive(Debug, Clone, Default)]
pub struct ScagnosticsEngine {
    config: ScagnosticsConfig,
}

impl ScagnosticsEngine {
    /// Create an engine, rejecting invalid configuration
    pub fn new(config: ScagnosticsConfig) -> ScagResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScagnosticsConfig {
        &self.config
    }

    /// Compute the nine measures and the density grid of `(x, y)`
    pub fn compute(&self, x: &[f64], y: &[f64]) -> ScagResult<ScagnosticsResult> {
        let prepared = Preprocessor::new(&self.config.outliers).prepare(x, y)?;
        let binned = Binner::new(&self.config.binning).bin(&prepared.points, prepared.bounds);
        let coords: Vec<Point> = binned.points.iter().map(|wp| wp.point).collect();

        let geometry = match prepared.geometry {
            Some(geometry) if !binned.replaced => {
                debug!("reusing geometry from outlier peeling");
                geometry
            }
            _ => Geometry::build(&coords),
        };

        let pruned = PrunedTree::compute(&geometry.mst, &self.config.pruning);
        let alpha = AlphaShape::compute(
            &coords,
            &geometry.triangulation,
            &geometry.mst,
            &self.config.pruning,
        );

        let metrics = Metrics::compute(&MetricInputs {
            points: &binned.points,
            hull: &geometry.hull,
            mst: &geometry.mst,
            pruned: &pruned,
            alpha: &alpha,
            retained_x: &prepared.retained_x,
            retained_y: &prepared.retained_y,
        });

        debug!(
            total = prepared.counts.total,
            retained = prepared.counts.retained,
            geometry_points = coords.len(),
            mst_edges = geometry.mst.edges().len(),
            runt_rounds = pruned.rounds(),
            "computed scagnostics"
        );

        Ok(ScagnosticsResult {
            metrics,
            bins: binned.grid,
            counts: prepared.counts,
            outliers: prepared.outlier_mask,
        })
    }

    /// Compute from row-major points, each row `[x, y]`
    pub fn compute_rows<R: AsRef<[f64]>>(&self, rows: &[R]) -> ScagResult<ScagnosticsResult> {
        let mut x = Vec::with_capacity(rows.len());
        let mut y = Vec::with_capacity(rows.len());
        for row in rows {
            let row = row.as_ref();
            validation::validate_dimensions(row.len())?;
            x.push(row[0]);
            y.push(row[1]);
        }
        self.compute(&x, &y)
    }
}

/// Compute scagnostics of `(x, y)` with the default configuration
pub fn compute(x: &[f64], y: &[f64], remove_outliers: bool) -> ScagResult<ScagnosticsResult> {
    let config = ScagnosticsConfig::default().with_remove_outliers(remove_outliers);
    ScagnosticsEngine { config }.compute(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InvalidInputError, ScagnosticsError, UnsupportedInputError};

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ScagnosticsConfig::default();
        config.binning.grid_size = 100;
        assert!(matches!(
            ScagnosticsEngine::new(config),
            Err(ScagnosticsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_too_few_points() {
        let err = compute(&[1.0], &[2.0], true).unwrap_err();
        assert_eq!(
            err,
            ScagnosticsError::InvalidInput(InvalidInputError::TooFewPoints { count: 1, min: 2 })
        );
    }

    #[test]
    fn test_compute_rows() {
        let engine = ScagnosticsEngine::default();
        let rows = vec![[0.0, 0.0], [1.0, 2.0], [2.0, 1.0], [3.0, 3.0]];
        let from_rows = engine.compute_rows(&rows).unwrap();
        let from_columns = engine
            .compute(&[0.0, 1.0, 2.0, 3.0], &[0.0, 2.0, 1.0, 3.0])
            .unwrap();
        assert_eq!(from_rows.metrics, from_columns.metrics);
    }

    #[test]
    fn test_compute_rows_wrong_width() {
        let engine = ScagnosticsEngine::default();
        let rows = vec![vec![0.0, 1.0], vec![1.0, 2.0, 3.0]];
        assert_eq!(
            engine.compute_rows(&rows).unwrap_err(),
            ScagnosticsError::UnsupportedInput(UnsupportedInputError::Dimensions { dims: 3 })
        );
    }

    #[test]
    fn test_small_triangle() {
        let result = compute(&[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0], true).unwrap();
        assert_eq!(result.counts.retained, 3);
        assert_eq!(result.bins.total(), 3);
        assert!(result.metrics.is_finite());

        let (metrics, bins) = result.into_parts();
        assert_eq!(metrics.outlying, 0.0);
        assert_eq!(bins.size(), 30);
    }
}
