//! Arrow utility functions for coercing columns to strings
//!
//! Every loaded column ends up as a nullable `Utf8` array so that later
//! profiling sees the values as written, not as the reader typed them. Nulls
//! stay null.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, StringArray};
use arrow::compute::{can_cast_types, cast};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::display::{ArrayFormatter, FormatOptions};

use crate::error::Result;

/// Convert any Arrow array to a `Utf8` array
///
/// Binary data is decoded as UTF-8 with invalid sequences replaced and
/// surrounding whitespace trimmed. Types
/// that Arrow cannot cast to strings (structs, maps and the like) are
/// rendered with Arrow's display formatter.
pub fn array_to_strings(array: &ArrayRef) -> Result<ArrayRef> {
    let converted = match array.data_type() {
        DataType::Utf8 => Arc::clone(array),
        DataType::LargeUtf8 | DataType::Utf8View => cast(array, &DataType::Utf8)?,
        DataType::Binary => decode_binary(array.as_binary::<i32>().iter()),
        DataType::LargeBinary => decode_binary(array.as_binary::<i64>().iter()),
        DataType::BinaryView => decode_binary(array.as_binary_view().iter()),
        DataType::FixedSizeBinary(_) => decode_binary(array.as_fixed_size_binary().iter()),
        data_type if can_cast_types(data_type, &DataType::Utf8) => cast(array, &DataType::Utf8)?,
        _ => format_array(array)?,
    };
    Ok(converted)
}

fn decode_binary<'a>(values: impl Iterator<Item = Option<&'a [u8]>>) -> ArrayRef {
    let strings: StringArray = values
        .map(|value| value.map(|bytes| String::from_utf8_lossy(bytes).trim().to_owned()))
        .collect();
    Arc::new(strings)
}

fn format_array(array: &ArrayRef) -> Result<ArrayRef> {
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
    let strings: StringArray = (0..array.len())
        .map(|i| array.is_valid(i).then(|| formatter.value(i).to_string()))
        .collect();
    Ok(Arc::new(strings))
}

/// Convert every column of a record batch to `Utf8`
///
/// Field names, order and schema metadata are kept; every field becomes
/// nullable.
pub fn coerce_batch_to_strings(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|field| Field::new(field.name(), DataType::Utf8, true))
        .collect();
    let columns = batch
        .columns()
        .iter()
        .map(array_to_strings)
        .collect::<Result<Vec<_>>>()?;

    let string_schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));
    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    Ok(RecordBatch::try_new_with_options(
        string_schema,
        columns,
        &options,
    )?)
}
