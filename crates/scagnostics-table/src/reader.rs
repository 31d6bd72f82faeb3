//! Table reader trait and error types
//!
//! The `TableReader` trait provides a uniform interface for loading
//! tabular data from the supported file formats.

use scagnostics_core::ScagnosticsError;
use thiserror::Error;

use crate::schema::{DataColumn, Table, TableSchema};

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Errors of the table front end
#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Scagnostics(#[from] ScagnosticsError),
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Trait for reading tabular data from various formats
pub trait TableReader: Send + Sync {
    /// Read the schema (column names, types, record count)
    fn read_schema(&self) -> IoResult<TableSchema>;

    /// Read a single column by name
    fn read_column(&self, name: &str) -> IoResult<DataColumn>;

    /// Read every column, numeric columns coerced to `f64`
    fn read_table(&self) -> IoResult<Table>;

    /// Get the file path (if applicable)
    fn path(&self) -> Option<&str> {
        None
    }

    /// Get the format name
    fn format_name(&self) -> &'static str;
}

/// A boxed reader for dynamic dispatch
pub type BoxedReader = Box<dyn TableReader>;

/// Open a file and return an appropriate reader
///
/// The format is auto-detected from the file extension.
pub fn open_file(path: &str) -> IoResult<BoxedReader> {
    let extension = path
        .rsplit('.')
        .next()
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        #[cfg(feature = "csv")]
        "csv" => {
            use crate::csv_reader::CsvReader;
            Ok(Box::new(CsvReader::open(path)?))
        }

        #[cfg(feature = "csv")]
        "tsv" | "tab" => {
            use crate::csv_reader::CsvReader;
            Ok(Box::new(CsvReader::open_with_options(path, b'\t', true)?))
        }

        _ => Err(IoError::InvalidFormat(format!(
            "Unknown file extension: {}",
            extension
        ))),
    }
}

/// List supported file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    let mut extensions = Vec::new();

    #[cfg(feature = "csv")]
    {
        extensions.push("csv");
        extensions.push("tsv");
        extensions.push("tab");
    }

    extensions
}
