//! scagnostics-core - Graph-theoretic scatterplot diagnostics
//!
//! This crate computes the nine scagnostics of a 2D point cloud together with
//! a binned density grid of the same data.
//!
//! # Key Components
//!
//! - **Preprocessor**: validation, finite filtering, unit-square normalization,
//!   deduplication and MST-based outlier peeling
//! - **Binner**: fixed-resolution density grid and point-set reduction
//! - **Geometry**: convex hull, Delaunay triangulation and minimum spanning tree
//! - **Pruning**: runt-pruned spanning tree and alpha shape
//! - **Metrics**: outlying, skewed, clumpy, sparse, striated, convex, skinny,
//!   stringy and monotonic
//!
//! # Example
//!
//! ```
//! let x = [0.0, 1.0, 2.0, 3.0, 4.0];
//! let y = [0.0, 1.1, 1.9, 3.2, 4.0];
//! let result = scagnostics_core::compute(&x, &y, true).unwrap();
//! assert!(result.metrics.monotonic > 0.99);
//! assert_eq!(result.bins.total(), 5);
//! ```
//!
//! The engine never installs a `tracing` subscriber; stages log at `debug`
//! and geometry sizes at `trace`.

pub mod binning;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod preprocess;
pub mod prune;
pub mod types;

pub use binning::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use geometry::{ConvexHull, Edge, Geometry, SpanningTree, Triangulation};
pub use metrics::{Metric, MetricInputs, Metrics};
pub use preprocess::*;
pub use prune::*;
pub use types::*;
