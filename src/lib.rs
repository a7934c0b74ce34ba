//! A Rust library for loading Parquet files as string-typed Arrow tables and
//! rendering them as a table, JSON records or JSON text.

pub mod config;
pub mod error;
pub mod loader;
pub mod parquet_data;
pub mod reader;
pub mod table;
pub mod utils;

// Re-export the most common types for easier use
pub use config::{DataFormat, ParquetDataOptions, ReadConfig};
pub use error::{ParquetDataError, Result};
pub use parquet_data::{BatchGenerator, DataBatch, InputData, ParquetData};
pub use reader::{DataSource, is_match, is_match_path, is_match_source};
pub use table::{DataOutput, DtypeMap, Table};

// Arrow types
pub use arrow::datatypes::DataType;
pub use arrow::record_batch::RecordBatch;
