//! Tabular data held by `ParquetData` and the shapes it is rendered into.

use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;

use crate::config::DataFormat;

/// The in-memory table: every row group of a source in one record batch
pub type Table = RecordBatch;

/// Column name to the data type observed before values were coerced to strings
///
/// Entries keep source column order; lookups go through a name index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DtypeMap {
    entries: Vec<(String, DataType)>,
    index: FxHashMap<String, usize>,
}

impl DtypeMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the type of every field of a schema
    #[must_use]
    pub fn from_schema(schema: &Schema) -> Self {
        let mut dtypes = Self::new();
        for field in schema.fields() {
            dtypes.insert(field.name().clone(), field.data_type().clone());
        }
        dtypes
    }

    /// Insert or replace the type of a column
    pub fn insert(&mut self, column: impl Into<String>, data_type: DataType) {
        let column = column.into();
        match self.index.get(&column) {
            Some(&idx) => self.entries[idx].1 = data_type,
            None => {
                self.index.insert(column.clone(), self.entries.len());
                self.entries.push((column, data_type));
            }
        }
    }

    /// Type recorded for a column
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&DataType> {
        self.index.get(column).map(|&idx| &self.entries[idx].1)
    }

    /// Column names in order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(column, type)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataType)> {
        self.entries
            .iter()
            .map(|(name, data_type)| (name.as_str(), data_type))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Loaded data rendered in one of the output formats
#[derive(Debug, Clone, PartialEq)]
pub enum DataOutput {
    /// The table, unchanged
    Dataframe(Table),
    /// JSON objects, one row per line
    Records(Vec<String>),
    /// Consecutive pieces of one JSON array
    Json(Vec<String>),
}

impl DataOutput {
    /// The format this output was rendered in
    #[must_use]
    pub const fn format(&self) -> DataFormat {
        match self {
            Self::Dataframe(_) => DataFormat::Dataframe,
            Self::Records(_) => DataFormat::Records,
            Self::Json(_) => DataFormat::Json,
        }
    }

    /// Number of rows for a table, number of items otherwise
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Dataframe(table) => table.num_rows(),
            Self::Records(lines) | Self::Json(lines) => lines.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The table, if this is dataframe output
    #[must_use]
    pub const fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Dataframe(table) => Some(table),
            Self::Records(_) | Self::Json(_) => None,
        }
    }

    /// The text items, if this is records or json output
    #[must_use]
    pub fn as_lines(&self) -> Option<&[String]> {
        match self {
            Self::Dataframe(_) => None,
            Self::Records(lines) | Self::Json(lines) => Some(lines),
        }
    }
}
