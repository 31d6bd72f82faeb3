//! Column types and the in-memory table

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::reader::{IoError, IoResult};

/// Schema describing the columns of a tabular source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSchema {
    /// Column descriptors in source order
    pub columns: Vec<ColumnDescriptor>,

    /// Number of records
    pub num_records: usize,
}

impl TableSchema {
    pub fn new(columns: Vec<ColumnDescriptor>, num_records: usize) -> Self {
        Self {
            columns,
            num_records,
        }
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Names of the columns that can be coerced to numbers
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.dtype.is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Descriptor for a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub dtype: ColumnType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Float64,
    Int64,
    Bool,
    String,
}

impl ColumnType {
    /// Check if this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Float64 | ColumnType::Int64)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Float64 => "Float64",
            ColumnType::Int64 => "Int64",
            ColumnType::Bool => "Bool",
            ColumnType::String => "String",
        };
        f.write_str(name)
    }
}

/// A column of data
#[derive(Debug, Clone, PartialEq)]
pub enum DataColumn {
    Float64(Vec<f64>),
    Int64(Vec<i64>),
    Bool(Vec<bool>),
    String(Vec<String>),
}

impl DataColumn {
    pub fn dtype(&self) -> ColumnType {
        match self {
            DataColumn::Float64(_) => ColumnType::Float64,
            DataColumn::Int64(_) => ColumnType::Int64,
            DataColumn::Bool(_) => ColumnType::Bool,
            DataColumn::String(_) => ColumnType::String,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DataColumn::Float64(v) => v.len(),
            DataColumn::Int64(v) => v.len(),
            DataColumn::Bool(v) => v.len(),
            DataColumn::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to f64 (for numeric types)
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        match self {
            DataColumn::Float64(v) => Some(v.clone()),
            DataColumn::Int64(v) => Some(v.iter().map(|&x| x as f64).collect()),
            DataColumn::Bool(_) | DataColumn::String(_) => None,
        }
    }
}

/// A column together with its name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColumn {
    pub name: String,
    pub data: DataColumn,
}

impl NamedColumn {
    pub fn new(name: impl Into<String>, data: DataColumn) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// An ordered collection of named columns
///
/// Columns are not required to share a length; the pairwise driver rejects
/// ragged tables when it is constructed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<NamedColumn>,
}

impl Table {
    pub fn new(columns: Vec<NamedColumn>) -> Self {
        Self { columns }
    }

    /// Build a table of `f64` columns
    pub fn from_f64_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = (S, Vec<f64>)>,
    ) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|(name, values)| NamedColumn::new(name, DataColumn::Float64(values)))
                .collect(),
        }
    }

    pub fn push_column(&mut self, name: impl Into<String>, data: DataColumn) {
        self.columns.push(NamedColumn::new(name, data));
    }

    pub fn columns(&self) -> &[NamedColumn] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<NamedColumn> {
        self.columns
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Length of the first column, or 0 for an empty table
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    pub fn column(&self, name: &str) -> Option<&DataColumn> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.data)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Keep only the named columns, in the given order
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> IoResult<Table> {
        let columns = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.columns
                    .iter()
                    .find(|c| c.name == name)
                    .cloned()
                    .ok_or_else(|| IoError::ColumnNotFound(name.to_string()))
            })
            .collect::<IoResult<Vec<_>>>()?;
        Ok(Table { columns })
    }

    /// Drop the columns that cannot be coerced to numbers
    pub fn numeric_only(self) -> Table {
        Table {
            columns: self
                .columns
                .into_iter()
                .filter(|c| c.data.dtype().is_numeric())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut table = Table::from_f64_columns([("a", vec![1.0, 2.0]), ("b", vec![3.0, 4.0])]);
        table.push_column("label", DataColumn::String(vec!["p".into(), "q".into()]));
        table.push_column("n", DataColumn::Int64(vec![5, 6]));
        table
    }

    #[test]
    fn test_schema_column_lookup() {
        let schema = TableSchema::new(
            vec![
                ColumnDescriptor::new("x", ColumnType::Float64),
                ColumnDescriptor::new("name", ColumnType::String),
                ColumnDescriptor::new("y", ColumnType::Int64),
            ],
            100,
        );

        assert_eq!(schema.column_index("x"), Some(0));
        assert_eq!(schema.column_index("z"), None);
        assert_eq!(schema.numeric_columns(), vec!["x", "y"]);
    }

    #[test]
    fn test_data_column_conversion() {
        let col = DataColumn::Int64(vec![1, 2, 3]);
        assert_eq!(col.to_f64().unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(DataColumn::Bool(vec![true]).to_f64().is_none());
    }

    #[test]
    fn test_column_type_display() {
        assert_eq!(ColumnType::String.to_string(), "String");
        assert!(ColumnType::Int64.is_numeric());
        assert!(!ColumnType::Bool.is_numeric());
    }

    #[test]
    fn test_select_orders_columns() {
        let table = sample_table();
        let selected = table.select(&["n", "a"]).unwrap();
        assert_eq!(selected.column_names(), vec!["n", "a"]);
        assert_eq!(selected.num_rows(), 2);
    }

    #[test]
    fn test_select_missing_column() {
        let table = sample_table();
        assert!(matches!(
            table.select(&["a", "zzz"]),
            Err(IoError::ColumnNotFound(name)) if name == "zzz"
        ));
    }

    #[test]
    fn test_numeric_only() {
        let table = sample_table().numeric_only();
        assert_eq!(table.column_names(), vec!["a", "b", "n"]);
    }
}
