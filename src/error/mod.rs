//! Error handling for `ParquetData`.

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

pub mod util;

/// Specialized error type for loading and rendering Parquet data
#[derive(Debug, thiserror::Error)]
pub enum ParquetDataError {
    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error building, casting or serializing Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error decoding options or JSON text
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A selected column is not present in the source
    #[error("Column not found: {column}")]
    ColumnNotFound { column: String },

    /// Unknown output format name
    #[error("Invalid data format '{0}', expected one of: dataframe, records, json")]
    InvalidDataFormat(String),

    /// Malformed option value
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Neither a file path nor in-memory data was given
    #[error("No input file path or data was provided")]
    MissingInput,
}

impl ParquetDataError {
    /// Create a column-not-found error
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }
}

/// Result type for `ParquetData` operations
pub type Result<T> = std::result::Result<T, ParquetDataError>;
