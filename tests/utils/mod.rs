//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BinaryArray, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

/// Number of rows in [`sample_batch`]
pub const SAMPLE_ROWS: usize = 5;

/// A small table covering the common column types
#[must_use]
pub fn sample_batch() -> RecordBatch {
    RecordBatch::try_from_iter(vec![
        ("id", Arc::new(Int64Array::from(vec![1, 2, 3, 4, 5])) as ArrayRef),
        (
            "name",
            Arc::new(StringArray::from(vec![
                Some("alice"),
                Some("bob"),
                None,
                Some("dana"),
                Some("émile"),
            ])) as ArrayRef,
        ),
        (
            "score",
            Arc::new(Float64Array::from(vec![0.5, 1.25, 2.0, 3.5, 4.75])) as ArrayRef,
        ),
        (
            "active",
            Arc::new(BooleanArray::from(vec![true, false, true, true, false])) as ArrayRef,
        ),
        (
            "payload",
            Arc::new(BinaryArray::from(vec![
                Some(b"a".as_ref()),
                Some(b"bb".as_ref()),
                Some(b"ccc".as_ref()),
                None,
                Some(b"e".as_ref()),
            ])) as ArrayRef,
        ),
    ])
    .expect("valid sample batch")
}

/// Write a batch to `dir/name` with at most `row_group_size` rows per row group
pub fn write_parquet(dir: &Path, name: &str, batch: &RecordBatch, row_group_size: usize) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("create parquet file");
    let props = WriterProperties::builder()
        .set_max_row_group_size(row_group_size)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props)).expect("writer");
    writer.write(batch).expect("write batch");
    writer.close().expect("close writer");
    path
}

/// Write [`sample_batch`] split over several row groups
pub fn write_sample(dir: &Path) -> PathBuf {
    write_parquet(dir, "sample.parquet", &sample_batch(), 2)
}

/// Read a `Utf8` column of a batch into owned values
pub fn string_column(batch: &RecordBatch, name: &str) -> Vec<Option<String>> {
    let idx = batch.schema().index_of(name).expect("column exists");
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("string column")
        .iter()
        .map(|v| v.map(str::to_string))
        .collect()
}
