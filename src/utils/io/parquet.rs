//! Parquet file operations
//!
//! Reading a Parquet file into Arrow record batches, optionally restricted
//! to a set of top-level columns.

use std::path::Path;
use std::time::Instant;

use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchReader};
use itertools::Itertools;
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::schema::types::SchemaDescriptor;

use crate::config::ReadConfig;
use crate::error::util::safe_open_file;
use crate::error::{ParquetDataError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Create a projection mask selecting columns by name
///
/// Columns are matched against the top-level fields of `file_schema`. The mask
/// keeps source order, whatever the order of `columns`; duplicates are
/// ignored.
///
/// # Errors
/// Returns [`ParquetDataError::ColumnNotFound`] for the first name that is
/// not a field of the file.
pub fn create_projection(
    columns: &[String],
    file_schema: &Schema,
    parquet_schema: &SchemaDescriptor,
) -> Result<ProjectionMask> {
    let indices: Vec<usize> = columns
        .iter()
        .map(|name| {
            file_schema
                .index_of(name)
                .map_err(|_| ParquetDataError::column_not_found(name.as_str()))
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .sorted_unstable()
        .dedup()
        .collect_vec();

    Ok(ProjectionMask::roots(parquet_schema, indices))
}

/// Read a parquet file into Arrow record batches
///
/// # Arguments
/// * `path` - Path to the Parquet file
/// * `columns` - Columns to read; all columns when empty
/// * `config` - Reader settings
///
/// # Returns
/// The schema of the read columns and the record batches, in file order
pub fn read_parquet(
    path: &Path,
    columns: &[String],
    config: &ReadConfig,
) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let start = Instant::now();
    log_operation_start("Reading parquet file", path.display());

    let file = safe_open_file(path, "reading parquet data")?;
    let mut builder =
        ParquetRecordBatchReaderBuilder::try_new(file)?.with_batch_size(config.batch_size);

    if !columns.is_empty() {
        let mask = create_projection(columns, builder.schema(), builder.parquet_schema())?;
        builder = builder.with_projection(mask);
    }

    let reader = builder.build()?;
    let schema = reader.schema();
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    let rows = batches.iter().map(RecordBatch::num_rows).sum();
    log_operation_complete("read", path.display(), rows, Some(start.elapsed()));
    Ok((schema, batches))
}
