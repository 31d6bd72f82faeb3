//! Scagnostics for every unordered column pair of a table
//!
//! `PairwiseScagnostics` validates the whole table up front and then yields
//! one engine result per `next()`, in `(0, 1), (0, 2), ..., (C-2, C-1)`
//! order. It is single-pass: collect the results to traverse them twice.
//!
//! # Parallel Processing
//!
//! When the `parallel` feature is enabled, `compute_all` evaluates the
//! remaining pairs on the rayon pool; results keep pair order.

use std::iter::FusedIterator;

use serde::Serialize;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use scagnostics_core::{
    ScagResult, ScagnosticsEngine, ScagnosticsError, ScagnosticsResult, UnsupportedInputError,
};

use crate::schema::Table;

/// Result for one column pair
#[derive(Debug, Clone, Serialize)]
pub struct PairResult {
    pub x_name: String,
    pub y_name: String,
    pub x_index: usize,
    pub y_index: usize,
    #[serde(flatten)]
    pub result: ScagnosticsResult,
}

/// Lazy, exact-size iterator over per-pair results
#[derive(Debug)]
pub struct PairwiseScagnostics {
    engine: ScagnosticsEngine,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    pairs: Vec<(usize, usize)>,
    next_pair: usize,
}

impl PairwiseScagnostics {
    /// Validate `table` and prepare its pairs
    ///
    /// Fails with `UnsupportedInputError` when the table has fewer than two
    /// columns, a non-numeric column, or columns of different lengths.
    pub fn new(table: Table, engine: ScagnosticsEngine) -> ScagResult<Self> {
        let columns = table.into_columns();
        if columns.len() < 2 {
            return Err(UnsupportedInputError::TooFewColumns {
                count: columns.len(),
            }
            .into());
        }

        let expected = columns[0].data.len();
        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for column in columns {
            let data = column.data.to_f64().ok_or_else(|| {
                ScagnosticsError::from(UnsupportedInputError::NonNumericColumn {
                    name: column.name.clone(),
                    dtype: column.data.dtype().to_string(),
                })
            })?;
            if data.len() != expected {
                return Err(UnsupportedInputError::RaggedColumns {
                    name: column.name,
                    len: data.len(),
                    expected,
                }
                .into());
            }
            names.push(column.name);
            values.push(data);
        }

        let count = values.len();
        let pairs: Vec<(usize, usize)> = (0..count)
            .flat_map(|i| ((i + 1)..count).map(move |j| (i, j)))
            .collect();

        debug!(columns = count, pairs = pairs.len(), "prepared pairwise scagnostics");

        Ok(Self {
            engine,
            names,
            columns: values,
            pairs,
            next_pair: 0,
        })
    }

    /// Column names in table order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    fn evaluate(&self, (i, j): (usize, usize)) -> ScagResult<PairResult> {
        let result = self.engine.compute(&self.columns[i], &self.columns[j])?;
        Ok(PairResult {
            x_name: self.names[i].clone(),
            y_name: self.names[j].clone(),
            x_index: i,
            y_index: j,
            result,
        })
    }

    /// Evaluate every remaining pair, in pair order
    #[cfg(feature = "parallel")]
    pub fn compute_all(mut self) -> Vec<ScagResult<PairResult>> {
        let remaining = std::mem::take(&mut self.pairs).split_off(self.next_pair);
        remaining
            .into_par_iter()
            .map(|pair| self.evaluate(pair))
            .collect()
    }

    /// Evaluate every remaining pair, in pair order
    #[cfg(not(feature = "parallel"))]
    pub fn compute_all(self) -> Vec<ScagResult<PairResult>> {
        self.collect()
    }
}

impl Iterator for PairwiseScagnostics {
    type Item = ScagResult<PairResult>;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = *self.pairs.get(self.next_pair)?;
        self.next_pair += 1;
        Some(self.evaluate(pair))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.pairs.len() - self.next_pair;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PairwiseScagnostics {}

impl FusedIterator for PairwiseScagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataColumn;

    fn ramp(n: usize, scale: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 * scale).collect()
    }

    #[test]
    fn test_pair_order_and_length() {
        let table = Table::from_f64_columns([
            ("a", ramp(10, 1.0)),
            ("b", ramp(10, -1.0)),
            ("c", ramp(10, 2.0)),
        ]);
        let mut pairs = PairwiseScagnostics::new(table, ScagnosticsEngine::default()).unwrap();
        assert_eq!(pairs.len(), 3);

        let first = pairs.next().unwrap().unwrap();
        assert_eq!((first.x_name.as_str(), first.y_name.as_str()), ("a", "b"));
        assert_eq!(pairs.len(), 2);

        let rest: Vec<_> = pairs.by_ref().map(|r| r.unwrap()).collect();
        let indices: Vec<_> = rest.iter().map(|r| (r.x_index, r.y_index)).collect();
        assert_eq!(indices, vec![(0, 2), (1, 2)]);
        assert!(pairs.next().is_none());
        assert_eq!(pairs.len(), 0);
    }

    #[test]
    fn test_too_few_columns() {
        let table = Table::from_f64_columns([("only", ramp(5, 1.0))]);
        let err = PairwiseScagnostics::new(table, ScagnosticsEngine::default()).unwrap_err();
        assert_eq!(
            err,
            ScagnosticsError::UnsupportedInput(UnsupportedInputError::TooFewColumns { count: 1 })
        );
    }

    #[test]
    fn test_non_numeric_column() {
        let mut table = Table::from_f64_columns([("a", ramp(2, 1.0))]);
        table.push_column("tag", DataColumn::String(vec!["u".into(), "v".into()]));
        let err = PairwiseScagnostics::new(table, ScagnosticsEngine::default()).unwrap_err();
        assert_eq!(
            err,
            ScagnosticsError::UnsupportedInput(UnsupportedInputError::NonNumericColumn {
                name: "tag".to_string(),
                dtype: "String".to_string(),
            })
        );
    }

    #[test]
    fn test_ragged_columns() {
        let table = Table::from_f64_columns([
            ("a", ramp(6, 1.0)),
            ("b", ramp(6, 1.0)),
            ("c", ramp(4, 1.0)),
        ]);
        let err = PairwiseScagnostics::new(table, ScagnosticsEngine::default()).unwrap_err();
        assert_eq!(
            err,
            ScagnosticsError::UnsupportedInput(UnsupportedInputError::RaggedColumns {
                name: "c".to_string(),
                len: 4,
                expected: 6,
            })
        );
    }

    #[test]
    fn test_integer_columns_are_numeric() {
        let mut table = Table::from_f64_columns([("a", ramp(8, 0.5))]);
        table.push_column("n", DataColumn::Int64((0..8).collect()));
        let results: Vec<_> = PairwiseScagnostics::new(table, ScagnosticsEngine::default())
            .unwrap()
            .collect();
        assert_eq!(results.len(), 1);
        let result = results[0].as_ref().unwrap();
        assert!((result.result.metrics.monotonic - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_all_after_partial_iteration() {
        let table = Table::from_f64_columns([
            ("a", ramp(12, 1.0)),
            ("b", ramp(12, 3.0)),
            ("c", ramp(12, -1.0)),
            ("d", ramp(12, 0.25)),
        ]);
        let mut pairs = PairwiseScagnostics::new(table, ScagnosticsEngine::default()).unwrap();
        pairs.next();
        pairs.next();

        let rest = pairs.compute_all();
        let indices: Vec<_> = rest
            .iter()
            .map(|r| {
                let r = r.as_ref().unwrap();
                (r.x_index, r.y_index)
            })
            .collect();
        assert_eq!(indices, vec![(0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_pair_error_is_reported_per_pair() {
        let mut a = ramp(5, 1.0);
        a[1..].fill(f64::NAN);
        let table = Table::from_f64_columns([("a", a), ("b", ramp(5, 1.0)), ("c", ramp(5, 2.0))]);
        let results: Vec<_> = PairwiseScagnostics::new(table, ScagnosticsEngine::default())
            .unwrap()
            .collect();

        assert!(results[0].is_err());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
