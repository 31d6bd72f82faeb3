//! CSV file reader with type inference

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::reader::{IoError, IoResult, TableReader};
use crate::schema::{ColumnDescriptor, ColumnType, DataColumn, NamedColumn, Table, TableSchema};

/// Rows sampled for column type inference
const INFERENCE_ROWS: usize = 100;

/// CSV file reader
pub struct CsvReader {
    path: String,
    schema: TableSchema,
    delimiter: u8,
    has_header: bool,
}

impl CsvReader {
    /// Open a comma-separated file with a header row
    pub fn open(path: &str) -> IoResult<Self> {
        Self::open_with_options(path, b',', true)
    }

    /// Open a CSV file with options
    ///
    /// Without a header row, columns are named `col_0`, `col_1`, ...
    pub fn open_with_options(path: &str, delimiter: u8, has_header: bool) -> IoResult<Self> {
        if !Path::new(path).exists() {
            return Err(IoError::FileNotFound(path.to_string()));
        }

        let mut reader = Self::csv_reader(path, delimiter, has_header)?;
        let schema = Self::infer_schema(&mut reader, has_header)?;

        debug!(
            path,
            columns = schema.num_columns(),
            records = schema.num_records,
            "opened CSV"
        );

        Ok(Self {
            path: path.to_string(),
            schema,
            delimiter,
            has_header,
        })
    }

    fn csv_reader(
        path: &str,
        delimiter: u8,
        has_header: bool,
    ) -> IoResult<csv::Reader<BufReader<File>>> {
        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        Ok(csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(has_header)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file)))
    }

    fn infer_schema(
        reader: &mut csv::Reader<BufReader<File>>,
        has_header: bool,
    ) -> IoResult<TableSchema> {
        let first = reader
            .headers()
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?
            .clone();
        let headers: Vec<String> = if has_header {
            first.iter().map(|s| s.to_string()).collect()
        } else {
            (0..first.len()).map(|i| format!("col_{}", i)).collect()
        };

        let mut sample_values: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        let mut num_records = 0;

        for result in reader.records() {
            let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            if num_records < INFERENCE_ROWS {
                for (i, value) in record.iter().enumerate().take(headers.len()) {
                    sample_values[i].push(value.to_string());
                }
            }
            num_records += 1;
        }

        let columns = headers
            .into_iter()
            .zip(&sample_values)
            .map(|(name, samples)| ColumnDescriptor::new(name, infer_type(samples)))
            .collect();

        Ok(TableSchema::new(columns, num_records))
    }

    fn read_raw_columns(&self) -> IoResult<Vec<Vec<String>>> {
        let mut reader = Self::csv_reader(&self.path, self.delimiter, self.has_header)?;
        let mut columns: Vec<Vec<String>> =
            vec![Vec::with_capacity(self.schema.num_records); self.schema.num_columns()];

        for result in reader.records() {
            let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            for (column, value) in columns.iter_mut().zip(record.iter()) {
                column.push(value.to_string());
            }
        }
        Ok(columns)
    }
}

impl TableReader for CsvReader {
    fn read_schema(&self) -> IoResult<TableSchema> {
        Ok(self.schema.clone())
    }

    fn read_column(&self, name: &str) -> IoResult<DataColumn> {
        let index = self
            .schema
            .column_index(name)
            .ok_or_else(|| IoError::ColumnNotFound(name.to_string()))?;
        let mut columns = self.read_raw_columns()?;
        let values = columns.swap_remove(index);
        Ok(parse_column(&values, self.schema.columns[index].dtype))
    }

    fn read_table(&self) -> IoResult<Table> {
        let raw = self.read_raw_columns()?;
        let columns = self
            .schema
            .columns
            .iter()
            .zip(&raw)
            .map(|(desc, values)| {
                NamedColumn::new(desc.name.clone(), parse_column(values, desc.dtype))
            })
            .collect();
        Ok(Table::new(columns))
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }
}

/// Infer column type from sample values
///
/// Empty cells are ignored; a column with no non-empty samples is `String`.
fn infer_type(values: &[String]) -> ColumnType {
    let non_empty: Vec<&str> = values
        .iter()
        .map(|s| s.as_str())
        .filter(|s| !s.is_empty())
        .collect();
    if non_empty.is_empty() {
        return ColumnType::String;
    }

    if non_empty.iter().all(|s| s.parse::<i64>().is_ok()) {
        return ColumnType::Int64;
    }

    if non_empty.iter().all(|s| s.parse::<f64>().is_ok()) {
        return ColumnType::Float64;
    }

    if non_empty.iter().all(|s| {
        matches!(
            s.to_lowercase().as_str(),
            "true" | "false" | "yes" | "no"
        )
    }) {
        return ColumnType::Bool;
    }

    ColumnType::String
}

/// Parse column values; numeric columns are coerced to `f64`
///
/// Cells that do not parse become NaN, which the engine counts as missing.
fn parse_column(values: &[String], dtype: ColumnType) -> DataColumn {
    match dtype {
        ColumnType::Float64 | ColumnType::Int64 => DataColumn::Float64(
            values
                .iter()
                .map(|s| s.parse().unwrap_or(f64::NAN))
                .collect(),
        ),
        ColumnType::Bool => DataColumn::Bool(
            values
                .iter()
                .map(|s| matches!(s.to_lowercase().as_str(), "true" | "yes"))
                .collect(),
        ),
        ColumnType::String => DataColumn::String(values.to_vec()),
    }
}
