//! Line-oriented JSON reading for text input
//!
//! Text handed to an adapter holds rows, not binary columnar data. Each line
//! is parsed as JSON: an object is one row, an array contributes each of its
//! object elements as rows, and anything else is skipped. Nested objects are
//! flattened into `parent.child` columns.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::table::{DtypeMap, Table};
use crate::utils::logging::log_warning;

/// Separator used when flattening nested object keys
pub const NESTED_KEY_SEPARATOR: &str = ".";

/// Yield the non-blank lines of a text, trimmed of surrounding whitespace
pub fn data_generator<'a, I>(lines: I) -> impl Iterator<Item = &'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// Type observed for a JSON column, widened as rows are added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JsonKind {
    Null,
    Boolean,
    Int64,
    Float64,
    Utf8,
}

impl JsonKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Int64,
            Value::Number(_) => Self::Float64,
            Value::String(_) | Value::Array(_) | Value::Object(_) => Self::Utf8,
        }
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Null, kind) | (kind, Self::Null) => kind,
            (a, b) if a == b => a,
            (Self::Int64, Self::Float64) | (Self::Float64, Self::Int64) => Self::Float64,
            _ => Self::Utf8,
        }
    }

    const fn data_type(self) -> DataType {
        match self {
            Self::Null => DataType::Null,
            Self::Boolean => DataType::Boolean,
            Self::Int64 => DataType::Int64,
            Self::Float64 => DataType::Float64,
            Self::Utf8 => DataType::Utf8,
        }
    }
}

struct ColumnBuilder {
    name: String,
    kind: JsonKind,
    values: Vec<Option<String>>,
}

/// Accumulates flattened JSON rows into string columns
#[derive(Default)]
struct TableBuilder {
    columns: Vec<ColumnBuilder>,
    index: FxHashMap<String, usize>,
    rows: usize,
}

impl TableBuilder {
    fn push_row(&mut self, row: &Map<String, Value>) {
        let mut flat = Vec::with_capacity(row.len());
        flatten_object(row, None, &mut flat);

        for (name, value) in flat {
            let rows = self.rows;
            let idx = *self.index.entry(name.clone()).or_insert_with(|| {
                self.columns.push(ColumnBuilder {
                    name,
                    kind: JsonKind::Null,
                    values: vec![None; rows],
                });
                self.columns.len() - 1
            });

            let column = &mut self.columns[idx];
            column.kind = column.kind.merge(JsonKind::of(value));
            // A repeated key after flattening keeps the last value
            column.values.truncate(rows);
            column.values.push(value_to_string(value));
        }

        self.rows += 1;
        for column in &mut self.columns {
            column.values.resize(self.rows, None);
        }
    }

    fn finish(self) -> Result<(Table, DtypeMap)> {
        let mut dtypes = DtypeMap::new();
        let mut fields = Vec::with_capacity(self.columns.len());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(self.columns.len());

        for column in self.columns {
            dtypes.insert(column.name.clone(), column.kind.data_type());
            fields.push(Field::new(column.name, DataType::Utf8, true));
            arrays.push(Arc::new(StringArray::from(column.values)));
        }

        let options = RecordBatchOptions::new().with_row_count(Some(self.rows));
        let table =
            RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;
        Ok((table, dtypes))
    }
}

fn flatten_object<'a>(
    object: &'a Map<String, Value>,
    prefix: Option<&str>,
    out: &mut Vec<(String, &'a Value)>,
) {
    for (key, value) in object {
        let name = match prefix {
            Some(prefix) => format!("{prefix}{NESTED_KEY_SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => {
                flatten_object(nested, Some(name.as_str()), out);
            }
            _ => out.push((name, value)),
        }
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read JSON rows into a table of string columns
///
/// Columns appear in the order their keys are first seen; a row without a
/// key gets a null. The returned map records the JSON type seen per column:
/// integers and floats widen to `Float64`, any other mix becomes `Utf8`.
pub fn read_json_table<'a, I>(lines: I) -> Result<(Table, DtypeMap)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut builder = TableBuilder::default();
    let mut skipped = 0usize;

    for line in lines {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(row)) => builder.push_row(&row),
            Ok(Value::Array(items)) => {
                for item in &items {
                    match item {
                        Value::Object(row) => builder.push_row(row),
                        _ => skipped += 1,
                    }
                }
            }
            Ok(_) | Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        log_warning(
            &format!("Skipped {skipped} values that are not JSON objects"),
            Some(&"string input"),
        );
    }

    builder.finish()
}
