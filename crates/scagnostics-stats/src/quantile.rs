//! Sorted samples and index quantiles
//!
//! A `SortedSample` owns a sorted copy of the finite values of a sample and
//! answers quantile queries in O(1).

use serde::{Deserialize, Serialize};

/// A sample of finite values, sorted ascending
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortedSample {
    /// Sorted finite values
    values: Vec<f64>,
    /// Number of non-finite values that were dropped
    dropped: usize,
}

impl SortedSample {
    /// Build a sorted sample from data, dropping non-finite values
    ///
    /// Time complexity: O(n log n) for sorting
    pub fn from_data(data: &[f64]) -> Self {
        let mut values: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        let dropped = data.len() - values.len();
        values.sort_by(f64::total_cmp);

        Self { values, dropped }
    }

    /// Build from values the caller owns, avoiding a copy
    pub fn from_vec(mut values: Vec<f64>) -> Self {
        let before = values.len();
        values.retain(|x| x.is_finite());
        let dropped = before - values.len();
        values.sort_by(f64::total_cmp);

        Self { values, dropped }
    }

    /// Index quantile: `sorted[floor(p * n)]`, clamped to the last element
    ///
    /// Returns `None` for an empty sample or `p` outside [0, 1].
    pub fn quantile(&self, p: f64) -> Option<f64> {
        if self.values.is_empty() || !(0.0..=1.0).contains(&p) {
            return None;
        }
        let n = self.values.len();
        let idx = ((p * n as f64).floor() as usize).min(n - 1);
        Some(self.values[idx])
    }

    /// Get the median (index quantile at 0.5)
    pub fn median(&self) -> Option<f64> {
        self.quantile(0.5)
    }

    /// Get the interquartile range (q75 - q25)
    pub fn iqr(&self) -> Option<f64> {
        let q1 = self.quantile(0.25)?;
        let q3 = self.quantile(0.75)?;
        Some(q3 - q1)
    }

    /// Threshold `median + k * IQR`
    ///
    /// Values strictly above this are treated as long edges by the outlier
    /// peeler.
    pub fn median_fence(&self, k: f64) -> Option<f64> {
        Some(self.median()? + k * self.iqr()?)
    }

    /// Get min, quartiles and max
    pub fn five_number_summary(&self) -> Option<FiveNumberSummary> {
        Some(FiveNumberSummary {
            min: self.min()?,
            q1: self.quantile(0.25)?,
            median: self.median()?,
            q3: self.quantile(0.75)?,
            max: self.max()?,
        })
    }

    /// Smallest value
    pub fn min(&self) -> Option<f64> {
        self.values.first().copied()
    }

    /// Largest value
    pub fn max(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Sum of all values
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Number of finite values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the sample is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of non-finite values dropped on construction
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Get the sorted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Five number summary statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// Get the interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Get the range
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Upper Tukey fence (Q3 + k * IQR)
    pub fn upper_fence(&self, k: f64) -> f64 {
        self.q3 + k * self.iqr()
    }

    /// Lower Tukey fence (Q1 - k * IQR)
    pub fn lower_fence(&self, k: f64) -> f64 {
        self.q1 - k * self.iqr()
    }
}
