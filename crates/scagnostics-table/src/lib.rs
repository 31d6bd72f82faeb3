//! scagnostics-table - Tabular input for scagnostics
//!
//! This crate turns multi-column data into per-pair scagnostics:
//!
//! - **Schema**: typed columns and an in-memory `Table`
//! - **CSV**: comma- or tab-separated files with type inference
//! - **Pairwise**: a lazy iterator computing every unordered column pair
//! - **Input**: the tagged `Pair`/`Table` input resolved at the boundary
//!
//! # Design
//!
//! All readers implement the `TableReader` trait. The core engine only ever
//! sees two numeric sequences; everything table-shaped is resolved here.

pub mod input;
pub mod pairwise;
pub mod reader;
pub mod schema;

#[cfg(feature = "csv")]
pub mod csv_reader;

pub use input::*;
pub use pairwise::*;
pub use reader::*;
pub use schema::*;
