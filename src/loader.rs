//! Loading sources into tables
//!
//! A Parquet file is read through the columnar reader; text is read through
//! the line-oriented JSON reader. Both return the table together with the
//! types observed before values were turned into strings.

use std::path::Path;
use std::time::Instant;

use arrow::compute::concat_batches;

use crate::config::ReadConfig;
use crate::error::Result;
use crate::table::{DtypeMap, Table};
use crate::utils::arrow::coerce_batch_to_strings;
use crate::utils::io::read_parquet;
use crate::utils::json::{data_generator, read_json_table};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// A table and the column types seen at load time
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    pub table: Table,
    pub original_dtypes: DtypeMap,
}

/// Read a Parquet file into one table
///
/// # Arguments
/// * `path` - Path to the Parquet file
/// * `selected_columns` - Columns to read; all columns when empty
/// * `read_in_string` - Convert every column to strings after reading
/// * `config` - Reader settings
///
/// # Errors
/// Fails when the file cannot be opened or decoded, or when a selected
/// column does not exist.
pub fn read_parquet_table(
    path: &Path,
    selected_columns: &[String],
    read_in_string: bool,
    config: &ReadConfig,
) -> Result<LoadedTable> {
    let (schema, batches) = read_parquet(path, selected_columns, config)?;
    let table = concat_batches(&schema, &batches)?;
    let original_dtypes = DtypeMap::from_schema(&schema);

    let table = if read_in_string {
        coerce_batch_to_strings(&table)?
    } else {
        table
    };

    Ok(LoadedTable {
        table,
        original_dtypes,
    })
}

/// Read JSON rows from text into a table of strings
pub fn read_text_table(text: &str) -> Result<LoadedTable> {
    let start = Instant::now();
    log_operation_start("Reading JSON rows from", "string input");

    let (table, original_dtypes) = read_json_table(data_generator(text.lines()))?;

    log_operation_complete("read", "string input", table.num_rows(), Some(start.elapsed()));
    Ok(LoadedTable {
        table,
        original_dtypes,
    })
}

/// Wrap an existing table, recording its schema as the original types
#[must_use]
pub fn from_table(table: Table) -> LoadedTable {
    let original_dtypes = DtypeMap::from_schema(&table.schema());
    LoadedTable {
        table,
        original_dtypes,
    }
}
