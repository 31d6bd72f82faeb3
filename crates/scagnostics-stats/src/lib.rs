//! scagnostics-stats - Rank and quantile primitives for scatterplot diagnostics
//!
//! This crate provides the small set of order statistics the scagnostics
//! engine is built on:
//!
//! - **SortedSample**: index quantiles, median and IQR of an edge-length sample
//! - **FiveNumberSummary**: min / quartiles / max with IQR fences
//! - **Ranks**: average (mid) ranks with tie handling
//! - **Spearman**: rank correlation between two paired samples
//!
//! # Quantile convention
//!
//! Quantiles are *index* quantiles: `q(p) = sorted[floor(p * n)]`, clamped to
//! the last element. This is cheap, never interpolates, and always returns an
//! observed value, which keeps graph thresholds tied to real edges.

pub mod quantile;
pub mod rank;

pub use quantile::*;
pub use rank::*;
